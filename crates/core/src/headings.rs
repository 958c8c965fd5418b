//! Level-2 section discovery, counting and title extraction.
//!
//! A section runs from an opening `h2` tag through the first following
//! `</h2>` (the header) and on to the start of the next header or the end of
//! the document (the body). Content before the first header is the
//! pre-text. An `h2` opening tag with no closing tag is not a header; see
//! [`strip_unclosed_headers`].

use crate::Locale;
use crate::markup::{Tags, find_close, unescape_text, visible_text};

/// Byte spans of one level-2 section within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    /// Offset of the header's opening tag.
    pub start: usize,
    /// Offset just past the opening tag.
    pub title_start: usize,
    /// Offset of the closing `</h2>`.
    pub title_end: usize,
    /// Offset just past the closing `</h2>`.
    pub header_end: usize,
    /// Offset where the body ends (next header or end of document).
    pub end: usize,
}

impl Section {
    /// Header title with inner markup stripped, entities decoded and
    /// whitespace trimmed.
    pub fn title(&self, html: &str) -> String {
        unescape_text(&visible_text(&html[self.title_start..self.title_end]))
    }

    /// Everything after the header up to the next header.
    pub fn body<'a>(&self, html: &'a str) -> &'a str {
        &html[self.header_end..self.end]
    }

    /// Header plus body.
    pub fn text<'a>(&self, html: &'a str) -> &'a str {
        &html[self.start..self.end]
    }
}

/// Finds every level-2 section in document order.
pub fn sections(html: &str) -> Vec<Section> {
    let mut found: Vec<Section> = Vec::new();
    let mut pos = 0;

    while let Some(open) = Tags::starting_at(html, pos).find(|t| t.is_open("h2")) {
        match find_close(html, open.end, "h2") {
            Some(close) => {
                found.push(Section {
                    start: open.start,
                    title_start: open.end,
                    title_end: close.start,
                    header_end: close.end,
                    end: html.len(),
                });
                pos = close.end;
            }
            None => break,
        }
    }

    for i in 1..found.len() {
        found[i - 1].end = found[i].start;
    }
    found
}

/// Removes `h2` opening tags that have no closing tag, keeping their text.
///
/// Scanning stops at the first unmatched opening tag, so every `h2` opening
/// tag after the last header is unmatched.
pub fn strip_unclosed_headers(html: &str) -> String {
    let from = sections(html).last().map_or(0, |s| s.header_end);
    let mut out = String::with_capacity(html.len());
    let mut pos = from;
    out.push_str(&html[..from]);
    for tag in Tags::starting_at(html, from).filter(|t| t.is_open("h2")) {
        out.push_str(&html[pos..tag.start]);
        pos = tag.end;
    }
    out.push_str(&html[pos..]);
    out
}

/// Content before the first level-2 header; the whole document if none.
pub fn pre_text(html: &str) -> &str {
    match sections(html).first() {
        Some(first) => &html[..first.start],
        None => html,
    }
}

/// Number of level-2 headers.
pub fn count_sections(html: &str) -> usize {
    sections(html).len()
}

/// Titles of every level-2 header in order, skipping empty and boilerplate
/// titles. Duplicates are kept.
pub fn extract_section_titles(html: &str, locale: &Locale) -> Vec<String> {
    sections(html)
        .iter()
        .map(|s| s.title(html))
        .filter(|t| !t.is_empty() && !locale.is_boilerplate_title(t))
        .collect()
}

/// Whether any level-2 title contains the closing-section marker.
pub fn has_closing_section(html: &str, locale: &Locale) -> bool {
    sections(html).iter().any(|s| locale.is_summary_title(&s.title(html)))
}
