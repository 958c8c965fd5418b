//! URL slugs for posts.

use regex::Regex;
use std::sync::LazyLock;
use time::OffsetDateTime;

static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").expect("valid slug pattern"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static DASH_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").expect("valid dash pattern"));

const MAX_SLUG_CHARS: usize = 50;

/// Builds an ASCII slug from a title or keyword.
///
/// Text with no ASCII letters or digits (most Japanese titles) yields
/// `post-{unix seconds}`.
pub fn generate_permalink(text: &str) -> String {
    let slug = slugify(text);
    if slug.is_empty() { fallback_slug() } else { slug }
}

fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase().replace('&', " and ").replace('+', " plus ");
    let cleaned = UNSAFE_CHARS.replace_all(&lowered, "");
    let dashed = WHITESPACE.replace_all(&cleaned, "-");
    let slug = DASH_RUNS.replace_all(&dashed, "-").trim_matches('-').to_string();

    if slug.len() <= MAX_SLUG_CHARS {
        return slug;
    }

    let mut out = String::new();
    for part in slug.split('-').filter(|p| !p.is_empty()) {
        let extra = if out.is_empty() { part.len() } else { part.len() + 1 };
        if out.len() + extra > MAX_SLUG_CHARS {
            break;
        }
        if !out.is_empty() {
            out.push('-');
        }
        out.push_str(part);
    }

    if out.is_empty() { slug[..MAX_SLUG_CHARS].to_string() } else { out }
}

fn fallback_slug() -> String {
    format!("post-{}", OffsetDateTime::now_utc().unix_timestamp())
}
