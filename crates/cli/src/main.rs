use std::path::PathBuf;

use autowriter_core::{Model, OutputFormat, PostStatus};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

mod commands;
mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generate SEO articles with Gemini, enforce their structure and publish them to WordPress
#[derive(Parser, Debug)]
#[command(name = "autowriter")]
#[command(version)]
#[command(about = "Generate, check and publish SEO articles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Settings file (default: $AUTOWRITER_CONFIG, then <config dir>/autowriter/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Policy preset store (default: <config dir>/autowriter/policies.json)
    #[arg(long, global = true, value_name = "FILE")]
    presets: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate target readers, their needs and a section outline
    Outline {
        #[command(flatten)]
        generation: GenerationArgs,

        /// Output file (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Generate a full article, review it and optionally publish it
    Write {
        #[command(flatten)]
        generation: GenerationArgs,

        #[command(flatten)]
        length: LengthArgs,

        #[command(flatten)]
        draft: DraftOutputArgs,

        /// Publish the article after generating it
        #[arg(long)]
        publish: bool,

        #[command(flatten)]
        post: PostArgs,
    },

    /// Report structural warnings for an HTML draft
    Check {
        /// HTML file, or "-" for stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// Co-occurrence terms that should appear, comma or newline separated
        #[arg(long, default_value = "", value_name = "TERMS")]
        co_terms: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sanitize a draft and force a single trailing closing section
    Normalize {
        /// HTML file, or "-" for stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// Topic used in the closing heading
        #[arg(short, long)]
        keyword: String,

        /// Maximum level-2 sections, closing section included
        #[arg(long, default_value = "8", value_name = "NUM")]
        max_sections: usize,

        /// Trim to at most this many visible characters
        #[arg(long, value_name = "NUM")]
        max_chars: Option<usize>,

        #[command(flatten)]
        draft: DraftOutputArgs,
    },

    /// Publish an HTML draft to a WordPress site
    Publish {
        /// HTML file, or "-" for stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// Keyword the draft was written for
        #[arg(short, long)]
        keyword: String,

        /// Post title
        #[arg(short, long)]
        title: String,

        /// Meta description
        #[arg(long, default_value = "")]
        excerpt: String,

        #[command(flatten)]
        post: PostArgs,

        /// Print the request body instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// List the categories of a WordPress site
    Categories {
        /// Site name from the settings file (default: the first site)
        #[arg(long)]
        site: Option<String>,
    },

    /// Check WordPress credentials by fetching the current user
    Whoami {
        /// Site name from the settings file (default: the first site)
        #[arg(long)]
        site: Option<String>,
    },

    /// Manage writing policy presets
    Presets {
        #[command(subcommand)]
        action: PresetAction,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum PresetAction {
    /// List presets; the active one is marked
    List,
    /// Print a preset's text (default: the active preset)
    Show { name: Option<String> },
    /// Import a policy text file; the preset is named after the file
    Import { file: PathBuf },
    /// Remove a preset
    Remove { name: String },
    /// Drop every preset and restore the built-in one
    Reset,
    /// Make a preset active
    Select { name: String },
}

/// Inputs shared by the generation steps
#[derive(Args, Debug)]
struct GenerationArgs {
    /// Main keyword the article targets
    #[arg(value_name = "KEYWORD")]
    keyword: String,

    /// Extra points the outline should cover
    #[arg(long, default_value = "")]
    extra: String,

    /// Co-occurrence terms, comma or newline separated
    #[arg(long, default_value = "", value_name = "TERMS")]
    co_terms: String,

    /// Terms the model must not use
    #[arg(long, default_value = "", value_name = "TERMS")]
    banned: String,

    /// Minimum level-2 sections
    #[arg(long, default_value = "3", value_name = "NUM")]
    min_sections: usize,

    /// Maximum level-2 sections, closing section included
    #[arg(long, default_value = "8", value_name = "NUM")]
    max_sections: usize,

    /// Gemini model (pro, flash); defaults to the settings file
    #[arg(long)]
    model: Option<Model>,

    /// Writing policy preset (default: the active preset)
    #[arg(long, value_name = "NAME", conflicts_with = "policy")]
    preset: Option<String>,

    /// Writing policy text file, or "-" for stdin
    #[arg(long, value_name = "FILE")]
    policy: Option<String>,
}

#[derive(Args, Debug)]
struct LengthArgs {
    /// Minimum visible characters
    #[arg(long, default_value = "2000", value_name = "NUM")]
    min_chars: usize,

    /// Maximum visible characters
    #[arg(long, default_value = "5000", value_name = "NUM")]
    max_chars: usize,

    /// Fill short drafts and trim long ones
    #[arg(long)]
    strict: bool,

    /// Fill attempts under --strict
    #[arg(long, default_value = "0", value_name = "NUM", value_parser = clap::value_parser!(u8).range(0..=3))]
    max_attempts: u8,
}

#[derive(Args, Debug)]
struct DraftOutputArgs {
    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (html, text, markdown, json)
    #[arg(short, long, default_value = "html", value_name = "FORMAT")]
    format: OutputFormat,

    /// Include TOML frontmatter (Markdown only)
    #[arg(long)]
    frontmatter: bool,
}

#[derive(Args, Debug)]
struct PostArgs {
    /// Site name from the settings file (default: the first site)
    #[arg(long)]
    site: Option<String>,

    /// Post status (draft, future, publish)
    #[arg(long, default_value = "draft")]
    status: PostStatus,

    /// Publication time for scheduled posts, RFC 3339
    #[arg(long, value_name = "TIME")]
    schedule: Option<String>,

    /// Category name; repeat for several
    #[arg(long = "category", value_name = "NAME")]
    categories: Vec<String>,

    /// Permalink slug (default: derived from the title)
    #[arg(long)]
    slug: Option<String>,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("autowriter_core=debug,autowriter=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    let env = commands::Env::new(cli.config, cli.presets, cli.verbose);

    match cli.command {
        Command::Outline { generation, output } => commands::outline(&env, &generation, output.as_deref()).await,
        Command::Write { generation, length, draft, publish, post } => {
            commands::write(&env, &generation, &length, &draft, publish.then_some(&post)).await
        }
        Command::Check { input, co_terms, json } => commands::check(&env, &input, &co_terms, json),
        Command::Normalize { input, keyword, max_sections, max_chars, draft } => {
            commands::normalize(&env, &input, &keyword, max_sections, max_chars, &draft)
        }
        Command::Publish { input, keyword, title, excerpt, post, dry_run } => {
            commands::publish(&env, &input, &keyword, &title, &excerpt, &post, dry_run).await
        }
        Command::Categories { site } => commands::categories(&env, site.as_deref()).await,
        Command::Whoami { site } => commands::whoami(&env, site.as_deref()).await,
        Command::Presets { action } => commands::presets(&env, action),
        Command::Completions { shell } => {
            commands::completions(shell);
            Ok(())
        }
    }
}
