//! Draft export formats.

pub mod json;
pub mod markdown;
pub mod text;

pub use json::{JsonConfig, JsonOutput, convert_to_json};
pub use markdown::{MarkdownConfig, convert_to_markdown};
pub use text::{TextConfig, convert_to_text};

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Metadata written alongside an exported draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DraftMetadata {
    pub keyword: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// Output format for drafts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Html,
    Text,
    Markdown,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Html => write!(f, "html"),
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "text" | "txt" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: html, text, markdown, json", s)),
        }
    }
}
