//! Prompt templates with named slots.
//!
//! A slot is written `{name}` where `name` starts with an ASCII letter or
//! underscore followed by letters, digits or underscores. Any other brace is
//! literal text. Slots are discovered when the template is built, so a
//! template that lacks a slot its caller relies on fails at construction
//! rather than producing a silently incomplete prompt.
//!
//! # Example
//!
//! ```rust
//! use autowriter_core::PromptTemplate;
//!
//! let template = PromptTemplate::with_slots("greeting", "Hello {name}!", &["name"]).unwrap();
//! assert_eq!(template.render(&[("name", "world")]).unwrap(), "Hello world!");
//! assert!(template.render(&[]).is_err());
//! ```

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::{AutowriterError, Result};

static SLOT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid slot pattern"));

/// A prompt template with its declared slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    name: String,
    text: String,
    slots: Vec<String>,
}

impl PromptTemplate {
    /// Builds a template, discovering its slots.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let mut slots: Vec<String> = Vec::new();
        for caps in SLOT.captures_iter(&text) {
            let slot = caps[1].to_string();
            if !slots.contains(&slot) {
                slots.push(slot);
            }
        }
        Self { name: name.into(), text, slots }
    }

    /// Builds a template that must contain every slot in `required`.
    pub fn with_slots(name: impl Into<String>, text: impl Into<String>, required: &[&str]) -> Result<Self> {
        let template = Self::new(name, text);
        let missing: Vec<&str> = required.iter().copied().filter(|r| !template.has_slot(r)).collect();
        if !missing.is_empty() {
            return Err(AutowriterError::Template(format!(
                "template '{}' is missing slot(s): {}",
                template.name,
                missing.join(", ")
            )));
        }
        Ok(template)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slots in order of first appearance.
    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn has_slot(&self, slot: &str) -> bool {
        self.slots.iter().any(|s| s == slot)
    }

    /// Renders the template; every slot must have a value.
    ///
    /// Values are substituted in a single pass, so braces inside a value are
    /// never expanded.
    pub fn render(&self, values: &[(&str, &str)]) -> Result<String> {
        let missing: Vec<&str> =
            self.slots.iter().map(String::as_str).filter(|s| !values.iter().any(|(k, _)| k == s)).collect();
        if !missing.is_empty() {
            return Err(AutowriterError::Template(format!(
                "template '{}' has no value for slot(s): {}",
                self.name,
                missing.join(", ")
            )));
        }
        Ok(self.render_lenient(values))
    }

    /// Renders the template, leaving slots without a value as written.
    ///
    /// Used for user-authored text such as writing policies, where stray
    /// `{word}` sequences are prose rather than placeholders.
    pub fn render_lenient(&self, values: &[(&str, &str)]) -> String {
        SLOT.replace_all(&self.text, |caps: &Captures| {
            let slot = &caps[1];
            values
                .iter()
                .find(|(k, _)| *k == slot)
                .map(|(_, v)| v.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .to_string()
    }
}
