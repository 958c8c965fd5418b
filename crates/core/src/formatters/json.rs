use serde::Serialize;

use crate::Result;
use crate::formatters::{DraftMetadata, markdown, text};
use crate::markup::visible_length;
use crate::validate::StructuralWarning;

/// Complete JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    pub metadata: DraftMetadata,
    pub visible_length: usize,
    pub section_count: usize,
    /// Structural warnings as display strings
    pub warnings: Vec<String>,
    pub content: ContentFormats,
}

/// Content in multiple formats
#[derive(Debug, Clone, Serialize)]
pub struct ContentFormats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    pub include_html: bool,
    pub include_markdown: bool,
    pub include_text: bool,
    /// Pretty print JSON output
    pub pretty: bool,
}

/// Serializes a draft with its metadata and review results
pub fn convert_to_json(
    html: &str, metadata: &DraftMetadata, warnings: &[StructuralWarning], config: &JsonConfig,
) -> Result<String> {
    let content = ContentFormats {
        html: config.include_html.then(|| html.to_string()),
        markdown: config
            .include_markdown
            .then(|| markdown::convert_to_markdown(html, metadata, &markdown::MarkdownConfig::default())),
        text: config.include_text.then(|| {
            let config = text::TextConfig { preserve_paragraphs: true, ..text::TextConfig::default() };
            text::convert_to_text(html, metadata, &config)
        }),
    };

    let output = JsonOutput {
        metadata: metadata.clone(),
        visible_length: visible_length(html),
        section_count: crate::headings::count_sections(html),
        warnings: warnings.iter().map(ToString::to_string).collect(),
        content,
    };

    let json = if config.pretty { serde_json::to_string_pretty(&output)? } else { serde_json::to_string(&output)? };
    Ok(json)
}
