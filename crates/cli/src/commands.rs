use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, bail};
use autowriter_core::{
    BannedTerms, Category, CoTerms, DraftMetadata, GeminiClient, JsonConfig, LengthConfig, MarkdownConfig,
    OutputFormat, Pipeline, PipelineContext, PostOptions, PostPayload, PresetStore, SectionBudget, Settings,
    StructuralWarning, TextConfig, WordPressClient, convert_to_json, convert_to_markdown, convert_to_text,
    enforce_single_trailing_summary, fetch_source, missing_co_terms, parse_schedule, sanitize, trim_to_visible_length,
    validate, visible_length, wordpress::select_categories,
};
use clap::CommandFactory;
use clap_complete::Shell;
use owo_colors::OwoColorize;

use crate::echo;
use crate::{Cli, DraftOutputArgs, GenerationArgs, LengthArgs, PostArgs, PresetAction};

/// Paths and flags shared by every subcommand.
pub struct Env {
    config: Option<PathBuf>,
    presets_path: PathBuf,
    verbose: bool,
}

impl Env {
    pub fn new(config: Option<PathBuf>, presets: Option<PathBuf>, verbose: bool) -> Self {
        Self { config, presets_path: presets.unwrap_or_else(PresetStore::default_path), verbose }
    }

    fn settings(&self) -> anyhow::Result<Settings> {
        let path = Settings::resolve_path(self.config.as_deref());
        Settings::load(&path).with_context(|| format!("Failed to load settings from {}", path.display()))
    }

    fn presets(&self) -> PresetStore {
        PresetStore::load(&self.presets_path)
    }
}

fn gemini(settings: &Settings) -> anyhow::Result<GeminiClient> {
    let api_key = settings.api_key().context("No Gemini API key: set gemini.api_key or GEMINI_API_KEY")?;
    Ok(GeminiClient::new(api_key)?)
}

fn wordpress(settings: &Settings, site: Option<&str>) -> anyhow::Result<(WordPressClient, Vec<Category>)> {
    let (name, site) = settings.site(site)?;
    let client = WordPressClient::from_site(site).with_context(|| format!("Invalid settings for site {}", name))?;
    Ok((client, Category::from_map(&site.categories)))
}

fn policy_text(env: &Env, args: &GenerationArgs) -> anyhow::Result<String> {
    if let Some(source) = &args.policy {
        return fetch_source(source).with_context(|| format!("Failed to read policy: {}", source));
    }
    let store = env.presets();
    match &args.preset {
        Some(name) => store.get(name).map(str::to_string).with_context(|| format!("Unknown preset: {}", name)),
        None => Ok(store.active_text().to_string()),
    }
}

fn context(env: &Env, settings: &Settings, args: &GenerationArgs) -> anyhow::Result<PipelineContext> {
    let mut ctx = PipelineContext::new(args.keyword.trim());
    ctx.extra = args.extra.clone();
    ctx.co_terms = CoTerms::parse(&args.co_terms);
    ctx.banned = BannedTerms::parse(&args.banned);
    ctx.sections = SectionBudget { min_count: args.min_sections, max_count: args.max_sections };
    ctx.model = args.model.unwrap_or(settings.gemini.model);
    ctx.locale = settings.locale();
    ctx.policy_text = policy_text(env, args)?;
    Ok(ctx)
}

fn read_input(env: &Env, input: &str) -> anyhow::Result<String> {
    let html = fetch_source(input).with_context(|| format!("Failed to read draft: {}", input))?;
    if env.verbose {
        eprintln!("  {} {}", "Size:".dimmed(), echo::format_size(html.len()).bright_white());
    }
    Ok(html)
}

fn emit(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn render_draft(
    html: &str, metadata: &DraftMetadata, warnings: &[StructuralWarning], args: &DraftOutputArgs,
) -> anyhow::Result<String> {
    let output = match args.format {
        OutputFormat::Html => html.to_string(),
        OutputFormat::Text => {
            let config =
                TextConfig { preserve_paragraphs: true, include_header: metadata.title.is_some(), line_width: 0 };
            convert_to_text(html, metadata, &config)
        }
        OutputFormat::Markdown => {
            let config = MarkdownConfig { include_frontmatter: args.frontmatter, include_title_heading: false };
            convert_to_markdown(html, metadata, &config)
        }
        OutputFormat::Json => {
            let config = JsonConfig { include_html: true, include_markdown: true, include_text: true, pretty: true };
            convert_to_json(html, metadata, warnings, &config).context("Failed to convert to JSON")?
        }
    };
    Ok(if output.ends_with('\n') { output } else { format!("{}\n", output) })
}

fn print_warnings(warnings: &[StructuralWarning]) {
    if warnings.is_empty() {
        echo::print_success("No structural warnings");
    }
    for warning in warnings {
        echo::print_warning(&warning.to_string());
    }
}

async fn resolve_categories(
    client: &WordPressClient, configured: Vec<Category>, names: &[String],
) -> anyhow::Result<Vec<u64>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let available = if configured.is_empty() { client.categories().await } else { configured };
    Ok(select_categories(&available, names)?)
}

fn post_options(title: &str, excerpt: &str, post: &PostArgs, categories: Vec<u64>) -> anyhow::Result<PostOptions> {
    let schedule = post.schedule.as_deref().map(parse_schedule).transpose()?;
    Ok(PostOptions {
        title: title.to_string(),
        excerpt: excerpt.to_string(),
        slug: post.slug.clone(),
        status: post.status,
        schedule,
        categories,
    })
}

async fn send(client: &WordPressClient, payload: &PostPayload) -> anyhow::Result<()> {
    let published = client.publish(payload).await.context("Failed to publish post")?;
    echo::print_success(&format!("Published post {} ({})", published.id, published.status));
    if !published.link.is_empty() {
        eprintln!("  {} {}", "Link:".dimmed(), published.link.bright_white().underline());
    }
    Ok(())
}

pub async fn outline(env: &Env, args: &GenerationArgs, output: Option<&Path>) -> anyhow::Result<()> {
    let settings = env.settings()?;
    let generator = gemini(&settings)?;
    let pipeline = Pipeline::new(&generator)?;
    let mut ctx = context(env, &settings, args)?;

    if env.verbose {
        echo::print_step(1, 1, &format!("Generating outline for {}", ctx.keyword.bright_white()));
    }
    let outline = pipeline.generate_outline(&mut ctx).await.context("Failed to generate outline")?;

    let content = format!(
        "① Readers\n{}\n\n② Needs\n{}\n\n③ Structure\n{}\n",
        outline.readers,
        outline.needs,
        outline.structure.trim_end()
    );
    emit(output, &content)
}

pub async fn write(
    env: &Env, args: &GenerationArgs, length: &LengthArgs, draft: &DraftOutputArgs, publish: Option<&PostArgs>,
) -> anyhow::Result<()> {
    let settings = env.settings()?;
    let generator = gemini(&settings)?;
    let pipeline = Pipeline::new(&generator)?;
    let mut ctx = context(env, &settings, args)?;
    ctx.length = LengthConfig {
        min_chars: length.min_chars,
        max_chars: length.max_chars,
        strict: length.strict,
        max_attempts: usize::from(length.max_attempts),
        ..LengthConfig::default()
    };

    let total_steps = if publish.is_some() { 4 } else { 3 };
    let started = Instant::now();
    let mut timings = Vec::new();

    if env.verbose {
        echo::print_step(1, total_steps, &format!("Generating outline for {}", ctx.keyword.bright_white()));
    }
    let step = Instant::now();
    pipeline.generate_outline(&mut ctx).await.context("Failed to generate outline")?;
    timings.push(("Outline".to_string(), step.elapsed()));

    if env.verbose {
        echo::print_step(2, total_steps, "Writing article");
    }
    let step = Instant::now();
    let article = pipeline.generate_article(&mut ctx).await.context("Failed to generate article")?;
    timings.push(("Article".to_string(), step.elapsed()));

    if article.fallback_summary {
        echo::print_warning("The model wrote no closing section; a generic one was appended");
    }
    if let Some(report) = &article.length {
        echo::print_length_report(report);
    }

    let warnings = ctx.review();
    print_warnings(&warnings);

    if env.verbose {
        echo::print_step(3, total_steps, "Generating title and description");
    }
    let step = Instant::now();
    let (title, description) =
        pipeline.generate_title_and_description(&ctx).await.context("Failed to generate title")?;
    timings.push(("Metadata".to_string(), step.elapsed()));
    eprintln!("  {} {}", "Title:".dimmed(), title.bright_white());
    eprintln!("  {} {}", "Description:".dimmed(), description.bright_white());

    let metadata = DraftMetadata {
        keyword: ctx.keyword.clone(),
        title: Some(title.clone()),
        excerpt: Some(description.clone()),
        slug: None,
    };
    let rendered = render_draft(&ctx.draft, &metadata, &warnings, draft)?;
    emit(draft.output.as_deref(), &rendered)?;

    if let Some(post) = publish {
        if env.verbose {
            echo::print_step(4, total_steps, "Publishing");
        }
        let step = Instant::now();
        let (client, configured) = wordpress(&settings, post.site.as_deref())?;
        let categories = resolve_categories(&client, configured, &post.categories).await?;
        let payload = ctx.build_post(&post_options(&title, &description, post, categories)?)?;
        send(&client, &payload).await?;
        timings.push(("Publish".to_string(), step.elapsed()));
    }

    if env.verbose {
        echo::print_timing_summary(started.elapsed(), &timings);
    }
    Ok(())
}

pub fn check(env: &Env, input: &str, co_terms: &str, json: bool) -> anyhow::Result<()> {
    let html = read_input(env, input)?;
    let mut warnings = validate(&html);
    warnings.extend(missing_co_terms(&html, &CoTerms::parse(co_terms)));

    if json {
        let config = JsonConfig { pretty: true, ..JsonConfig::default() };
        let report = convert_to_json(&html, &DraftMetadata::default(), &warnings, &config)?;
        println!("{}", report);
        return Ok(());
    }

    println!("Visible length: {}", visible_length(&html));
    for warning in &warnings {
        println!("- {}", warning);
    }

    if warnings.is_empty() {
        echo::print_success("No structural warnings");
    } else {
        echo::print_warning(&format!("{} structural warning(s)", warnings.len()));
    }
    Ok(())
}

pub fn normalize(
    env: &Env, input: &str, keyword: &str, max_sections: usize, max_chars: Option<usize>, draft: &DraftOutputArgs,
) -> anyhow::Result<()> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        bail!("Keyword must not be empty");
    }

    let locale = env.settings()?.locale();
    let html = read_input(env, input)?;
    let mut content = sanitize(&html);
    if let Some(max_chars) = max_chars {
        // Leave room for the closing heading and the line break before it.
        let heading = visible_length(&enforce_single_trailing_summary("", keyword, max_sections, &locale));
        content = trim_to_visible_length(&content, max_chars.saturating_sub(heading + 1));
    }
    let normalized = enforce_single_trailing_summary(&content, keyword, max_sections, &locale);

    let warnings = validate(&normalized);
    if env.verbose {
        print_warnings(&warnings);
    }

    let metadata = DraftMetadata { keyword: keyword.to_string(), ..DraftMetadata::default() };
    let rendered = render_draft(&normalized, &metadata, &warnings, draft)?;
    emit(draft.output.as_deref(), &rendered)
}

pub async fn publish(
    env: &Env, input: &str, keyword: &str, title: &str, excerpt: &str, post: &PostArgs, dry_run: bool,
) -> anyhow::Result<()> {
    let mut ctx = PipelineContext::new(keyword.trim());
    ctx.draft = read_input(env, input)?;

    if dry_run {
        let categories = if post.categories.is_empty() {
            Vec::new()
        } else {
            let settings = env.settings()?;
            let (_, site) = settings.site(post.site.as_deref())?;
            select_categories(&Category::from_map(&site.categories), &post.categories)?
        };
        let payload = ctx.build_post(&post_options(title, excerpt, post, categories)?)?;
        println!("{}", payload.to_json_pretty()?);
        return Ok(());
    }

    let settings = env.settings()?;
    let (client, configured) = wordpress(&settings, post.site.as_deref())?;
    let categories = resolve_categories(&client, configured, &post.categories).await?;
    let payload = ctx.build_post(&post_options(title, excerpt, post, categories)?)?;
    send(&client, &payload).await
}

pub async fn categories(env: &Env, site: Option<&str>) -> anyhow::Result<()> {
    let settings = env.settings()?;
    let (client, configured) = wordpress(&settings, site)?;
    let categories = if configured.is_empty() { client.categories().await } else { configured };

    if categories.is_empty() {
        echo::print_warning("No categories found");
    }
    for category in categories {
        println!("{}\t{}", category.id, category.name);
    }
    Ok(())
}

pub async fn whoami(env: &Env, site: Option<&str>) -> anyhow::Result<()> {
    let settings = env.settings()?;
    let (client, _) = wordpress(&settings, site)?;
    let user = client.current_user().await.context("Failed to authenticate")?;
    echo::print_success(&format!("Authenticated as {} (id {})", user.name.bright_white(), user.id));
    Ok(())
}

pub fn presets(env: &Env, action: PresetAction) -> anyhow::Result<()> {
    let mut store = env.presets();

    match action {
        PresetAction::List => {
            for name in store.names() {
                let marker = if name == store.active { "*" } else { " " };
                println!("{} {}", marker, name);
            }
            return Ok(());
        }
        PresetAction::Show { name } => {
            let text = match name {
                Some(name) => store.get(&name).with_context(|| format!("Unknown preset: {}", name))?,
                None => store.active_text(),
            };
            println!("{}", text.trim_end());
            return Ok(());
        }
        PresetAction::Import { file } => {
            let name = store.import_file(&file).with_context(|| format!("Failed to import {}", file.display()))?;
            echo::print_success(&format!("Imported preset {}", name.bright_white()));
        }
        PresetAction::Remove { name } => {
            if store.remove(&name)? {
                echo::print_success(&format!("Removed preset {}", name.bright_white()));
            } else {
                echo::print_warning(&format!("No preset named {}", name));
            }
        }
        PresetAction::Reset => {
            store.reset();
            echo::print_success("Restored the built-in preset");
        }
        PresetAction::Select { name } => {
            store.select(&name)?;
            echo::print_success(&format!("Active preset is now {}", name.bright_white()));
        }
    }

    store
        .save(&env.presets_path)
        .with_context(|| format!("Failed to save presets to {}", env.presets_path.display()))
}

pub fn completions(shell: Shell) {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "autowriter", &mut std::io::stdout());
}
