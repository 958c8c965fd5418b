//! CLI integration tests
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("autowriter")
}

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/drafts/{}", name)
}

/// Command with a private preset store so the user's own is never touched.
fn presets_cmd(tmp: &TempDir) -> assert_cmd::Command {
    let mut command = cmd();
    command.args(["--presets", tmp.path().join("policies.json").to_str().unwrap()]);
    command
}

#[test]
fn test_cli_normalize_file_input() {
    cmd()
        .args(["normalize", "-k", "審査", "--max-sections", "4", &get_fixture_path("raw_model_output.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("<h2>審査に関するまとめ</h2>"))
        .stdout(predicate::str::contains("<h2>金利の比較</h2>"))
        .stdout(predicate::str::contains("返済計画").not())
        .stdout(predicate::str::contains("<script>").not())
        .stdout(predicate::str::contains("<br>").not());
}

#[test]
fn test_cli_normalize_stdin_input() {
    cmd()
        .args(["normalize", "-k", "審査", "-"])
        .write_stdin("<h2>流れ</h2><p>本文</p><h2>まとめ</h2><p>旧まとめ</p>")
        .assert()
        .success()
        .stdout(predicate::str::contains("<h2>流れ</h2><p>本文</p>\n<h2>審査に関するまとめ</h2>"))
        .stdout(predicate::str::contains("旧まとめ").not());
}

#[test]
fn test_cli_normalize_markdown_frontmatter() {
    cmd()
        .args(["normalize", "-k", "審査", "-f", "markdown", "--frontmatter", &get_fixture_path("clean_article.html")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("+++"))
        .stdout(predicate::str::contains("keyword = \"審査\""));
}

#[test]
fn test_cli_normalize_text_format() {
    cmd()
        .args(["normalize", "-k", "審査", "-f", "text", &get_fixture_path("clean_article.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("- 年収"))
        .stdout(predicate::str::contains("<p>").not());
}

#[test]
fn test_cli_normalize_json_format() {
    let output = cmd()
        .args(["normalize", "-k", "審査", "--max-sections", "4", "-f", "json"])
        .arg(get_fixture_path("raw_model_output.html"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["metadata"]["keyword"], "審査");
    assert_eq!(value["section_count"], 4);
    assert!(value["content"]["html"].as_str().unwrap().contains("審査に関するまとめ"));
}

#[test]
fn test_cli_normalize_max_chars() {
    cmd()
        .args(["normalize", "-k", "審査", "--max-chars", "40", &get_fixture_path("clean_article.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("審査の基本").not())
        .stdout(predicate::str::ends_with("<h2>審査に関するまとめ</h2>\n"));
}

#[test]
fn test_cli_normalize_max_chars_keeps_closing_heading_in_budget() {
    let output = cmd()
        .args(["normalize", "-k", "審査", "--max-chars", "60", "-f", "json"])
        .arg(get_fixture_path("clean_article.html"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["visible_length"].as_u64().unwrap() <= 60);
    assert!(value["content"]["html"].as_str().unwrap().contains("<h2>審査に関するまとめ</h2>"));
}

#[test]
fn test_cli_normalize_english_locale() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("config.toml");
    std::fs::write(&config, "locale = \"en\"\n").unwrap();

    cmd()
        .args(["--config", config.to_str().unwrap(), "normalize", "-k", "Loans", "-"])
        .write_stdin("<h2>Rates</h2><p>body</p><h2>Summary</h2><p>old</p>")
        .assert()
        .success()
        .stdout(predicate::str::contains("<h2>Rates</h2><p>body</p>\n<h2>Loans: Summary</h2>"))
        .stdout(predicate::str::contains("old").not());
}

#[test]
fn test_cli_output_file() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("draft.html");

    cmd()
        .args(["normalize", "-k", "審査", "-o", output.to_str().unwrap()])
        .arg(get_fixture_path("clean_article.html"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Output written to"));

    assert!(std::fs::read_to_string(output).unwrap().contains("審査に関するまとめ"));
}

#[test]
fn test_cli_check_clean_article() {
    cmd()
        .args(["check", &get_fixture_path("clean_article.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Visible length:"))
        .stderr(predicate::str::contains("No structural warnings"));
}

#[test]
fn test_cli_check_reports_warnings() {
    cmd()
        .args(["check", &get_fixture_path("raw_model_output.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Forbidden tags present (h4/script)"))
        .stdout(predicate::str::contains("<br> is not allowed"))
        .stdout(predicate::str::contains("Section \"審査の流れ\" has no table or list"));
}

#[test]
fn test_cli_check_co_terms() {
    cmd()
        .args(["check", "--co-terms", "年収,総量規制", &get_fixture_path("clean_article.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Co-occurrence terms not found: 総量規制"));
}

#[test]
fn test_cli_check_json() {
    let output = cmd().args(["check", "--json", &get_fixture_path("raw_model_output.html")]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(!value["warnings"].as_array().unwrap().is_empty());
    assert!(value["content"].get("html").is_none());
}

#[test]
fn test_cli_invalid_file() {
    cmd()
        .args(["check", "nonexistent.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read draft"));
}

#[test]
fn test_cli_presets_default_list() {
    let tmp = TempDir::new().unwrap();
    presets_cmd(&tmp)
        .args(["presets", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* default"));
}

#[test]
fn test_cli_presets_import_select_remove() {
    let tmp = TempDir::new().unwrap();
    let policy = tmp.path().join("finance.txt");
    std::fs::write(&policy, "[本文指示]\n数字を根拠に書く").unwrap();

    presets_cmd(&tmp).args(["presets", "import", policy.to_str().unwrap()]).assert().success();
    presets_cmd(&tmp)
        .args(["presets", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* finance"))
        .stdout(predicate::str::contains("  default"));
    presets_cmd(&tmp)
        .args(["presets", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("数字を根拠に書く"));

    presets_cmd(&tmp).args(["presets", "select", "default"]).assert().success();
    presets_cmd(&tmp).args(["presets", "list"]).assert().success().stdout(predicate::str::contains("* default"));

    presets_cmd(&tmp).args(["presets", "remove", "finance"]).assert().success();
    presets_cmd(&tmp).args(["presets", "list"]).assert().success().stdout(predicate::str::contains("finance").not());
}

#[test]
fn test_cli_presets_default_cannot_be_removed() {
    let tmp = TempDir::new().unwrap();
    presets_cmd(&tmp).args(["presets", "remove", "default"]).assert().failure();
}

#[test]
fn test_cli_presets_reset() {
    let tmp = TempDir::new().unwrap();
    let policy = tmp.path().join("media.txt");
    std::fs::write(&policy, "x").unwrap();

    presets_cmd(&tmp).args(["presets", "import", policy.to_str().unwrap()]).assert().success();
    presets_cmd(&tmp).args(["presets", "reset"]).assert().success();
    presets_cmd(&tmp)
        .args(["presets", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("media").not())
        .stdout(predicate::str::contains("* default"));
}

#[test]
fn test_cli_publish_dry_run() {
    let output = cmd()
        .args(["publish", "--dry-run", "-k", "審査", "-t", "審査ガイド", "--slug", "shinsa-guide"])
        .arg(get_fixture_path("clean_article.html"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["title"], "審査ガイド");
    assert_eq!(value["status"], "draft");
    assert_eq!(value["slug"], "shinsa-guide");
    assert!(value.get("date_gmt").is_none());
    assert!(value.get("categories").is_none());
}

#[test]
fn test_cli_publish_dry_run_scheduled() {
    cmd()
        .args(["publish", "--dry-run", "-k", "審査", "-t", "Guide", "--status", "future"])
        .args(["--schedule", "2026-11-01T09:00:00+09:00"])
        .arg(get_fixture_path("clean_article.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"date_gmt\": \"2026-11-01T00:00:00\""))
        .stdout(predicate::str::contains("\"slug\": \"guide\""));
}

#[test]
fn test_cli_publish_future_requires_schedule() {
    cmd()
        .args(["publish", "--dry-run", "-k", "審査", "-t", "Guide", "--status", "future"])
        .arg(get_fixture_path("clean_article.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("schedule"));
}

#[test]
fn test_cli_write_requires_api_key() {
    let tmp = TempDir::new().unwrap();
    presets_cmd(&tmp)
        .args(["--config", tmp.path().join("config.toml").to_str().unwrap()])
        .args(["write", "カードローン 審査"])
        .env_remove("GEMINI_API_KEY")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No Gemini API key"));
}

#[test]
fn test_cli_malformed_config() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("config.toml");
    std::fs::write(&config, "[gemini\n").unwrap();

    cmd()
        .args(["--config", config.to_str().unwrap(), "categories"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load settings"));
}

#[test]
fn test_cli_invalid_max_attempts() {
    cmd().args(["write", "審査", "--max-attempts", "5"]).assert().failure();
}

#[test]
fn test_cli_completions() {
    cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("autowriter"));
}

#[test]
fn test_cli_verbose() {
    cmd()
        .args(["-v", "check", &get_fixture_path("clean_article.html")])
        .assert()
        .success()
        .stderr(predicate::str::contains("Autowriter"));
}
