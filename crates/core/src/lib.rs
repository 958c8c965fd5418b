pub mod error;
pub mod fetch;
pub mod formatters;
pub mod headings;
pub mod length;
pub mod llm;
pub mod locale;
pub mod markup;
pub mod permalink;
pub mod pipeline;
pub mod policy;
pub mod presets;
pub mod prompts;
pub mod sanitize;
pub mod settings;
pub mod summary;
pub mod template;
pub mod terms;
pub mod trim;
pub mod validate;
pub mod wordpress;

pub use error::{AutowriterError, Result};
pub use fetch::{fetch_file, fetch_source, fetch_stdin};
pub use formatters::{
    DraftMetadata, JsonConfig, MarkdownConfig, OutputFormat, TextConfig, convert_to_json, convert_to_markdown,
    convert_to_text,
};
pub use headings::{Section, count_sections, extract_section_titles, has_closing_section, sections};
pub use length::{Filler, LengthConfig, LengthExit, LengthReport, LengthState, cap_closing_section, enforce_length};
#[cfg(feature = "http")]
pub use llm::{GeminiClient, GeminiConfig};
pub use llm::{GenerationRequest, Model, TextGenerator};
pub use locale::{Locale, LocaleName, LocaleSetting};
#[doc(hidden)]
pub use markup::{Tag, Tags};
pub use markup::{strip_tags, visible_length, visible_text};
pub use permalink::generate_permalink;
pub use pipeline::{ArticleOutcome, Outline, Pipeline, PipelineContext, PostOptions, SectionBudget};
pub use policy::{DEFAULT_POLICY, Policy};
pub use presets::{DEFAULT_PRESET, PresetStore};
pub use prompts::{ArticlePromptInput, Prompts};
pub use sanitize::{SanitizeConfig, sanitize, sanitize_with_config};
pub use settings::{Settings, SiteSettings};
pub use summary::{append_fallback_summary, enforce_single_trailing_summary, strip_closing_sections};
pub use template::PromptTemplate;
pub use terms::{BannedTerms, CoTerms};
pub use trim::{paragraph_units, trim_to_section_count, trim_to_visible_length};
pub use validate::{StructuralWarning, ValidateConfig, missing_co_terms, validate, validate_with_config};
#[cfg(feature = "http")]
pub use wordpress::WordPressClient;
pub use wordpress::{Category, PostPayload, PostStatus, PublishedPost, WpUser, format_date_gmt, parse_schedule};
