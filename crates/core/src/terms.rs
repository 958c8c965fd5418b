//! Caller-supplied term lists: co-occurrence terms and banned terms.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::markup::strip_tags;

static TERM_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,\n\r]+").expect("valid separator pattern"));

/// Terms expected to appear in the article's visible text.
///
/// Deduplicated and kept sorted, so input order never matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoTerms(BTreeSet<String>);

impl CoTerms {
    /// Parses terms separated by commas or line breaks.
    pub fn parse(text: &str) -> Self {
        Self(TERM_SEPARATOR.split(text).map(str::trim).filter(|t| !t.is_empty()).map(str::to_string).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Terms that do not occur, case-insensitively, in the visible text.
    pub fn missing_in(&self, html: &str) -> Vec<String> {
        let plain = strip_tags(html).to_lowercase();
        self.0.iter().filter(|t| !plain.contains(&t.to_lowercase())).cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for CoTerms {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).map(|t| t.trim().to_string()).filter(|t| !t.is_empty()).collect())
    }
}

/// Terms the model is told never to use.
///
/// Only ever passed to prompts; generated text is not filtered against them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BannedTerms(Vec<String>);

impl BannedTerms {
    /// Parses one term per line.
    pub fn parse(text: &str) -> Self {
        Self(text.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Renders terms as a bulleted block for prompts, or `empty` when there are none.
pub(crate) fn bullet_block<'a>(terms: impl Iterator<Item = &'a str>, bullet: &str, empty: &str) -> String {
    let lines: Vec<String> = terms.map(|t| format!("{}{}", bullet, t)).collect();
    if lines.is_empty() { empty.to_string() } else { lines.join("\n") }
}
