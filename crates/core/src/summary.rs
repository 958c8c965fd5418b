//! The mandatory closing section.
//!
//! Every article ends with exactly one level-2 closing section whose title
//! is the locale's canonical heading for the topic. Model output cannot be
//! trusted to produce it, to produce only one, or to put it last, so the
//! structure is normalized here.

use crate::Locale;
use crate::headings::{count_sections, extract_section_titles, sections, strip_unclosed_headers};
use crate::markup::escape_text;
use crate::trim::trim_to_section_count;

/// Removes every level-2 section whose title contains the closing marker.
///
/// Each matching section is dropped from its header up to the next header.
/// A trailing `h2` opening tag with no closing tag is removed first and its
/// text kept. The pre-text and the remaining sections are kept in order and
/// the result is trimmed of surrounding whitespace.
pub fn strip_closing_sections(html: &str, locale: &Locale) -> String {
    let html = strip_unclosed_headers(html);
    let html = html.as_str();
    let found = sections(html);
    let Some(first) = found.first() else {
        return html.trim().to_string();
    };

    let mut out = String::with_capacity(html.len());
    out.push_str(&html[..first.start]);
    for section in &found {
        if !locale.is_summary_title(&section.title(html)) {
            out.push_str(section.text(html));
        }
    }

    out.trim().to_string()
}

/// Forces exactly one closing section, placed last.
///
/// `total_section_count` counts the closing section, so at most
/// `total_section_count - 1` content sections are kept. The appended header
/// has no body. Applying this twice with the same arguments is a no-op.
pub fn enforce_single_trailing_summary(html: &str, topic: &str, total_section_count: usize, locale: &Locale) -> String {
    let mut content = strip_closing_sections(html, locale);

    let content_max = total_section_count.saturating_sub(1);
    if count_sections(&content) > content_max {
        content = trim_to_section_count(&content, content_max);
    }

    let heading = locale.summary_heading_for(&escape_text(topic));
    tracing::debug!(content_sections = count_sections(&content), heading = %heading, "appending closing section");

    let mut out = content.trim_end().to_string();
    out.push_str("\n<h2>");
    out.push_str(&heading);
    out.push_str("</h2>\n");
    out
}

/// Appends a locally built closing section to a draft that lacks one.
///
/// No LLM call is made. Bullets are seeded from the first three content
/// section titles.
pub fn append_fallback_summary(html: &str, topic: &str, locale: &Locale) -> String {
    let bullets: String = extract_section_titles(html, locale)
        .iter()
        .take(3)
        .map(|title| format!("<li>{}</li>", locale.fallback_bullet.replace("{title}", &escape_text(title))))
        .collect();
    let bullets = if bullets.is_empty() { format!("<li>{}</li>", locale.fallback_generic_bullet) } else { bullets };

    format!(
        "{}\n\n<h2>{}</h2>\n<p>{}</p>\n<ul>{}</ul>\n<p>{}</p>\n",
        html.trim_end(),
        locale.summary_heading_for(&escape_text(topic)),
        locale.fallback_opening,
        bullets,
        locale.fallback_closing
    )
}
