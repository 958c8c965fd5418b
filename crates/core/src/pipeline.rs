//! Keyword-to-post orchestration.
//!
//! A [`PipelineContext`] carries one request's inputs and stage outputs. It
//! is owned by the caller and passed to each [`Pipeline`] step in turn:
//!
//! 1. [`Pipeline::generate_outline`]: readers, needs and the section outline
//! 2. [`Pipeline::generate_article`]: the full draft, optionally length-controlled
//! 3. [`PipelineContext::review`]: advisory structural warnings
//! 4. [`Pipeline::generate_title_and_description`]: post metadata
//! 5. [`PipelineContext::build_post`]: the payload handed to the CMS
//!
//! Stages run one at a time. The only suspension points are the calls to
//! the [`TextGenerator`].

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use time::OffsetDateTime;

use crate::headings::{count_sections, has_closing_section};
use crate::length::{Filler, LengthConfig, LengthReport, enforce_length};
use crate::llm::{GenerationRequest, Model, TextGenerator};
use crate::locale::Locale;
use crate::permalink::generate_permalink;
use crate::policy::{DEFAULT_POLICY, Policy};
use crate::prompts::{ArticlePromptInput, Prompts};
use crate::sanitize::sanitize;
use crate::summary::{append_fallback_summary, enforce_single_trailing_summary};
use crate::terms::{BannedTerms, CoTerms};
use crate::trim::trim_to_section_count;
use crate::validate::{StructuralWarning, missing_co_terms, validate};
use crate::wordpress::{PostPayload, PostStatus, format_date_gmt};
use crate::{AutowriterError, Result};

/// Longest title kept, in characters.
pub const MAX_TITLE_CHARS: usize = 32;
/// Longest description kept, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 120;

static READERS_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)①[^\n]*\n(.+?)\n\n②").expect("valid readers pattern"));
static NEEDS_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)②[^\n]*\n(.+?)\n\n③").expect("valid needs pattern"));
static STRUCTURE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)③[^\n]*\n(.+)$").expect("valid structure pattern"));
static TITLE_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"タイトル[:：]\s*(.+)").expect("valid title pattern"));
static DESCRIPTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"説明[:：]\s*(.+)").expect("valid description pattern"));
static TITLE_NOISE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[【】｜\n\r]").expect("valid title noise pattern"));
static LINE_BREAKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\n\r]").expect("valid line break pattern"));

/// Level-2 section count bounds; `max_count` includes the closing section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionBudget {
    pub min_count: usize,
    pub max_count: usize,
}

impl Default for SectionBudget {
    fn default() -> Self {
        Self { min_count: 3, max_count: 8 }
    }
}

/// The three outline blocks: target readers, their needs, and the section
/// structure as markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    pub readers: String,
    pub needs: String,
    pub structure: String,
}

impl Outline {
    /// Splits a model response into its `①`, `②` and `③` blocks.
    ///
    /// Missing blocks are left empty. Carriage returns are dropped first.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.replace('\r', "");
        let block = |re: &Regex| re.captures(&raw).map(|c| c[1].trim().to_string()).unwrap_or_default();
        Self { readers: block(&READERS_BLOCK), needs: block(&NEEDS_BLOCK), structure: block(&STRUCTURE_BLOCK) }
    }
}

/// Result of [`Pipeline::generate_article`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleOutcome {
    pub html: String,
    /// Whether a closing section had to be built locally.
    pub fallback_summary: bool,
    /// Present when strict length control ran.
    pub length: Option<LengthReport>,
}

/// Publishing choices not derived from the article itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostOptions {
    pub title: String,
    pub excerpt: String,
    /// Typed slug; derived from the title when empty.
    pub slug: Option<String>,
    pub status: PostStatus,
    /// Required for [`PostStatus::Future`].
    pub schedule: Option<OffsetDateTime>,
    pub categories: Vec<u64>,
}

/// Inputs and stage outputs of one article request.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineContext {
    pub keyword: String,
    /// Extra points the outline should cover
    pub extra: String,
    pub co_terms: CoTerms,
    pub banned: BannedTerms,
    /// Writing policy text, see [`Policy`]
    pub policy_text: String,
    pub sections: SectionBudget,
    pub length: LengthConfig,
    pub model: Model,
    pub locale: Locale,
    pub outline: Outline,
    pub draft: String,
}

impl PipelineContext {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            extra: String::new(),
            co_terms: CoTerms::default(),
            banned: BannedTerms::default(),
            policy_text: DEFAULT_POLICY.to_string(),
            sections: SectionBudget::default(),
            length: LengthConfig::default(),
            model: Model::default(),
            locale: Locale::default(),
            outline: Outline::default(),
            draft: String::new(),
        }
    }

    fn keyword(&self) -> Result<&str> {
        let keyword = self.keyword.trim();
        if keyword.is_empty() { Err(AutowriterError::MissingInput("keyword")) } else { Ok(keyword) }
    }

    fn draft(&self) -> Result<&str> {
        let draft = self.draft.trim();
        if draft.is_empty() { Err(AutowriterError::MissingInput("draft")) } else { Ok(draft) }
    }

    /// Text describing the article's direction, used for metadata prompts.
    fn direction(&self) -> String {
        format!("{}\n{}\n{}", self.outline.readers, self.outline.needs, self.policy_text)
    }

    /// Structural warnings for the current draft, plus missing co-occurrence terms.
    pub fn review(&self) -> Vec<StructuralWarning> {
        let mut warnings = validate(&self.draft);
        warnings.extend(missing_co_terms(&self.draft, &self.co_terms));
        warnings
    }

    /// Builds the create-post payload from the current draft.
    ///
    /// The draft is sanitized once more so hand edits cannot reintroduce
    /// markup outside the whitelist.
    pub fn build_post(&self, options: &PostOptions) -> Result<PostPayload> {
        self.keyword()?;
        let title = options.title.trim();
        if title.is_empty() {
            return Err(AutowriterError::MissingInput("title"));
        }
        let content = sanitize(self.draft()?).trim().to_string();

        let slug = match options.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(slug) => slug.to_string(),
            None => generate_permalink(title),
        };

        let date_gmt = match (options.status, options.schedule) {
            (PostStatus::Future, Some(at)) => Some(format_date_gmt(at)?),
            (PostStatus::Future, None) => return Err(AutowriterError::MissingInput("schedule")),
            _ => None,
        };

        Ok(PostPayload {
            title: title.to_string(),
            content,
            status: options.status,
            excerpt: options.excerpt.trim().to_string(),
            slug: Some(slug),
            categories: if options.categories.is_empty() { None } else { Some(options.categories.clone()) },
            date_gmt,
        })
    }
}

/// Runs generation steps against a [`TextGenerator`].
pub struct Pipeline<'g> {
    generator: &'g dyn TextGenerator,
    prompts: Prompts,
}

impl<'g> Pipeline<'g> {
    pub fn new(generator: &'g dyn TextGenerator) -> Result<Self> {
        Ok(Self { generator, prompts: Prompts::builtin()? })
    }

    async fn call(&self, prompt: String, model: Model) -> Result<String> {
        let request = GenerationRequest::new(prompt, model);
        Ok(self.generator.generate(&request).await?.trim().to_string())
    }

    /// Generates readers, needs and a section structure that ends in exactly
    /// one closing section and has at most `sections.max_count` sections.
    pub async fn generate_outline(&self, ctx: &mut PipelineContext) -> Result<Outline> {
        let keyword = ctx.keyword()?.to_string();
        let budget = ctx.sections;
        if budget.min_count > budget.max_count {
            tracing::warn!(min = budget.min_count, max = budget.max_count, "section minimum exceeds maximum");
        }

        let prompt =
            self.prompts
                .outline(&keyword, &ctx.extra, &ctx.co_terms, &ctx.banned, budget.min_count, budget.max_count)?;
        let raw = self.call(prompt, ctx.model).await?;

        let mut outline = Outline::parse(&raw);
        let mut structure = sanitize(&outline.structure);
        if count_sections(&structure) > budget.max_count {
            structure = trim_to_section_count(&structure, budget.max_count);
        }

        let current = count_sections(&structure);
        if current < budget.min_count {
            let need = budget.min_count - current;
            tracing::debug!(current, need, "outline below section minimum, requesting more sections");
            let prompt = self.prompts.fill_sections(&keyword, &structure, need)?;
            let extra = sanitize(&self.call(prompt, ctx.model).await?);
            if count_sections(&extra) > 0 {
                structure = format!("{}\n\n{}", structure.trim_end(), extra.trim());
            }
        }

        if count_sections(&structure) > budget.max_count {
            structure = trim_to_section_count(&structure, budget.max_count);
        }

        outline.structure = enforce_single_trailing_summary(&structure, &keyword, budget.max_count, &ctx.locale);
        tracing::debug!(sections = count_sections(&outline.structure), "outline ready");

        ctx.outline = outline.clone();
        Ok(outline)
    }

    /// Generates the full article from the outline and stores it as the draft.
    pub async fn generate_article(&self, ctx: &mut PipelineContext) -> Result<ArticleOutcome> {
        let keyword = ctx.keyword()?.to_string();
        if ctx.outline.structure.trim().is_empty() {
            return Err(AutowriterError::MissingInput("outline"));
        }

        let policy = Policy::parse(&ctx.policy_text);
        let prompt = self.prompts.full_article(&ArticlePromptInput {
            keyword: &keyword,
            policy: &policy,
            structure: &ctx.outline.structure,
            readers: &ctx.outline.readers,
            needs: &ctx.outline.needs,
            co_terms: &ctx.co_terms,
            banned: &ctx.banned,
            min_chars: ctx.length.min_chars,
            max_chars: ctx.length.max_chars,
        })?;

        let mut html = sanitize(&self.call(prompt, ctx.model).await?);

        let fallback_summary = !html.trim().is_empty() && !has_closing_section(&html, &ctx.locale);
        if fallback_summary {
            tracing::warn!("draft has no closing section, appending a local one");
            html = append_fallback_summary(&html, &keyword, &ctx.locale);
        }

        let length = if ctx.length.strict {
            let filler = LlmFiller {
                generator: self.generator,
                prompts: &self.prompts,
                keyword: &keyword,
                co_terms: &ctx.co_terms,
                model: ctx.model,
            };
            let report = enforce_length(&html, &ctx.length, &ctx.locale, &filler).await;
            html = report.html.clone();
            Some(report)
        } else {
            None
        };

        ctx.draft = html.clone();
        Ok(ArticleOutcome { html, fallback_summary, length })
    }

    /// Generates a title and meta description in one call.
    pub async fn generate_title_and_description(&self, ctx: &PipelineContext) -> Result<(String, String)> {
        let keyword = ctx.keyword()?;
        ctx.draft()?;
        let prompt = self.prompts.title_and_description(keyword, &ctx.direction())?;
        let raw = self.call(prompt, ctx.model).await?;

        let title = TITLE_LINE.captures(&raw).map(|c| c[1].trim().to_string());
        let description = DESCRIPTION_LINE.captures(&raw).map(|c| c[1].trim().to_string());
        Ok((clean_title(keyword, title.as_deref()), clean_description(keyword, description.as_deref())))
    }

    /// Generates only a title.
    pub async fn generate_title(&self, ctx: &PipelineContext) -> Result<String> {
        let keyword = ctx.keyword()?;
        ctx.draft()?;
        let prompt = self.prompts.title(keyword, &ctx.direction())?;
        let raw = self.call(prompt, ctx.model).await?;
        Ok(clean_title(keyword, Some(&raw)))
    }

    /// Generates only a meta description for `title`.
    pub async fn generate_description(&self, ctx: &PipelineContext, title: &str) -> Result<String> {
        let keyword = ctx.keyword()?;
        ctx.draft()?;
        let title = if title.trim().is_empty() { format!("{}について", keyword) } else { title.trim().to_string() };
        let prompt = self.prompts.description(keyword, &title, &ctx.direction())?;
        let raw = self.call(prompt, ctx.model).await?;
        Ok(clean_description(keyword, Some(&raw)))
    }
}

fn clean_title(keyword: &str, title: Option<&str>) -> String {
    let cleaned: String = title
        .map(|t| TITLE_NOISE.replace_all(t.trim(), "").chars().take(MAX_TITLE_CHARS).collect())
        .unwrap_or_default();
    if cleaned.trim().is_empty() { format!("{}について", keyword) } else { cleaned.trim().to_string() }
}

fn clean_description(keyword: &str, description: Option<&str>) -> String {
    let cleaned: String = description
        .map(|d| LINE_BREAKS.replace_all(d.trim(), "").chars().take(MAX_DESCRIPTION_CHARS).collect())
        .unwrap_or_default();
    if cleaned.trim().is_empty() { format!("{}に関する情報をお届けします。", keyword) } else { cleaned.trim().to_string() }
}

/// Asks the model for extra paragraphs during length control.
struct LlmFiller<'a> {
    generator: &'a dyn TextGenerator,
    prompts: &'a Prompts,
    keyword: &'a str,
    co_terms: &'a CoTerms,
    model: Model,
}

#[async_trait]
impl Filler for LlmFiller<'_> {
    async fn fill(&self, current_html: &str, need: usize) -> Result<String> {
        let prompt = self.prompts.append(self.keyword, self.co_terms, current_html, need)?;
        let request = GenerationRequest::new(prompt, self.model);
        self.generator.generate(&request).await
    }
}
