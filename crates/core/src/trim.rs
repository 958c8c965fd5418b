//! Budget-driven trimming on safe boundaries.
//!
//! [`trim_to_section_count`] cuts on level-2 section boundaries,
//! [`trim_to_visible_length`] on paragraph units. Neither ever grows a
//! document.

use crate::headings::sections;
use crate::markup::{Tags, find_close, markup_spans, visible_length};
use crate::sanitize::ALLOWED_TAGS;

/// Keeps the pre-text and at most `max_count` level-2 sections.
///
/// Sections are kept in document order; everything from the first section
/// past the limit to the end of the document is dropped. A limit of zero
/// leaves only the pre-text.
pub fn trim_to_section_count(html: &str, max_count: usize) -> String {
    match sections(html).get(max_count) {
        Some(first_dropped) => html[..first_dropped.start].to_string(),
        None => html.to_string(),
    }
}

/// Splits markup into paragraph units.
///
/// Each unit runs up to and including the next `<p>...</p>` element; the
/// final unit is whatever remains. Concatenating the units yields the input.
pub fn paragraph_units(html: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut pos = 0;

    while pos < html.len() {
        let end = Tags::starting_at(html, pos)
            .find(|t| t.is_open("p"))
            .and_then(|open| find_close(html, open.end, "p"))
            .map(|close| close.end)
            .unwrap_or(html.len());
        units.push(&html[pos..end]);
        pos = end;
    }

    units
}

/// Trims markup to at most `max_chars` visible characters.
///
/// Whole paragraph units are accumulated from the start while the visible
/// length of the kept prefix stays within budget. When not even the first
/// unit fits, the text is cut at the character budget instead, keeping tags
/// whole and closing any whitelisted element left open.
pub fn trim_to_visible_length(html: &str, max_chars: usize) -> String {
    if visible_length(html) <= max_chars {
        return html.to_string();
    }

    let mut kept = 0;
    for unit in paragraph_units(html) {
        let end = kept + unit.len();
        if visible_length(&html[..end]) > max_chars {
            break;
        }
        kept = end;
    }

    if kept > 0 { html[..kept].to_string() } else { truncate_visible(html, max_chars) }
}

fn truncate_visible(html: &str, max_chars: usize) -> String {
    let mut out = String::new();
    let mut open: Vec<String> = Vec::new();
    let mut budget = TextBudget { remaining: max_chars, seen_text: false };
    let mut last = 0;
    let mut exhausted = false;

    for (start, end) in markup_spans(html) {
        if !budget.push(&mut out, &html[last..start]) {
            exhausted = true;
            break;
        }

        let span = &html[start..end];
        if let Some(tag) = Tags::new(span).next().filter(|t| t.start == 0 && t.end == span.len()) {
            let name = tag.name.to_ascii_lowercase();
            if ALLOWED_TAGS.contains(&name.as_str()) {
                if !tag.closing {
                    open.push(name);
                } else if let Some(idx) = open.iter().rposition(|n| *n == name) {
                    open.remove(idx);
                }
            }
        }
        out.push_str(span);
        last = end;
    }

    if !exhausted {
        budget.push(&mut out, &html[last..]);
    }

    for name in open.iter().rev() {
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }
    out
}

struct TextBudget {
    remaining: usize,
    seen_text: bool,
}

impl TextBudget {
    /// Appends as much of `text` as fits; returns whether all of it did.
    /// Leading whitespace before the first visible character is free since
    /// visible length is measured after trimming.
    fn push(&mut self, out: &mut String, text: &str) -> bool {
        for c in text.chars() {
            if !self.seen_text && c.is_whitespace() {
                out.push(c);
                continue;
            }
            if self.remaining == 0 {
                return false;
            }
            self.seen_text = true;
            self.remaining -= 1;
            out.push(c);
        }
        true
    }
}
