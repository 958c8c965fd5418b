//! Minimal forward scanner over HTML-subset markup.
//!
//! Generated articles are never parsed into a tree. Structure is recovered
//! from tag tokens of the form `</?name ...>` where `name` is a run of ASCII
//! word characters; everything else, including stray `<` characters,
//! comments and entities, is opaque text.
//!
//! # Example
//!
//! ```rust
//! use autowriter_core::markup::{Tags, visible_length};
//!
//! let html = "<h2>Title</h2><p>Body</p>";
//! let names: Vec<_> = Tags::new(html).map(|t| t.name).collect();
//! assert_eq!(names, ["h2", "h2", "p", "p"]);
//! assert_eq!(visible_length(html), 9);
//! ```

use regex::Regex;
use std::sync::LazyLock;

static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<.*?>").expect("valid tag pattern"));

/// A single tag token found in markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    /// Byte offset of the opening `<`.
    pub start: usize,
    /// Byte offset just past the closing `>`.
    pub end: usize,
    /// Tag name as written in the source.
    pub name: &'a str,
    /// Whether this is a closing tag (`</name>`).
    pub closing: bool,
}

impl Tag<'_> {
    /// Case-insensitive name comparison.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Opening tag with the given name.
    pub fn is_open(&self, name: &str) -> bool {
        !self.closing && self.is(name)
    }

    /// Closing tag with the given name.
    pub fn is_close(&self, name: &str) -> bool {
        self.closing && self.is(name)
    }
}

/// Iterator over the tag tokens of a markup string, in document order.
#[derive(Debug, Clone)]
pub struct Tags<'a> {
    html: &'a str,
    pos: usize,
}

impl<'a> Tags<'a> {
    pub fn new(html: &'a str) -> Self {
        Self { html, pos: 0 }
    }

    /// Starts scanning at byte offset `pos`, which must be a char boundary.
    pub fn starting_at(html: &'a str, pos: usize) -> Self {
        Self { html, pos: pos.min(html.len()) }
    }
}

impl<'a> Iterator for Tags<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(offset) = self.html[self.pos..].find('<') {
            let start = self.pos + offset;
            if let Some(tag) = tag_at(self.html, start) {
                self.pos = tag.end;
                return Some(tag);
            }
            self.pos = start + 1;
        }
        self.pos = self.html.len();
        None
    }
}

fn tag_at(html: &str, start: usize) -> Option<Tag<'_>> {
    let bytes = html.as_bytes();
    let mut i = start + 1;
    let closing = bytes.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }

    let name_start = i;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
    }
    if i == name_start {
        return None;
    }

    let close = html[i..].find('>')?;
    Some(Tag { start, end: i + close + 1, name: &html[name_start..i], closing })
}

/// Finds the first closing tag named `name` at or after byte offset `from`.
pub fn find_close<'a>(html: &'a str, from: usize, name: &str) -> Option<Tag<'a>> {
    Tags::starting_at(html, from).find(|t| t.is_close(name))
}

/// Finds the first opening tag whose name is one of `names` at or after `from`.
pub fn find_open<'a>(html: &'a str, from: usize, names: &[&str]) -> Option<Tag<'a>> {
    Tags::starting_at(html, from).find(|t| !t.closing && names.iter().any(|n| t.is(n)))
}

/// Byte spans of every `<...>` run that [`strip_tags`] would remove.
pub fn markup_spans(html: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    ANY_TAG.find_iter(html).map(|m| (m.start(), m.end()))
}

/// Removes every `<...>` run, keeping only text.
pub fn strip_tags(html: &str) -> String {
    ANY_TAG.replace_all(html, "").to_string()
}

/// Text with all markup removed and surrounding whitespace trimmed.
pub fn visible_text(html: &str) -> String {
    strip_tags(html).trim().to_string()
}

/// Number of characters of [`visible_text`].
pub fn visible_length(html: &str) -> usize {
    strip_tags(html).trim().chars().count()
}

/// Escapes text for inclusion inside an element.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverses [`escape_text`], also decoding quote entities.
pub fn unescape_text(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_finds_open_and_close_tags() {
        let tags: Vec<_> = Tags::new(r#"<P class="x">a</p>"#).collect();
        assert_eq!(tags.len(), 2);
        assert!(tags[0].is_open("p"));
        assert_eq!(tags[0].end, 13);
        assert!(tags[1].is_close("p"));
    }

    #[test]
    fn test_scanner_ignores_non_tags() {
        let html = "a < b and c<>d <!-- note --> 1 <2";
        assert_eq!(Tags::new(html).count(), 0);
    }

    #[test]
    fn test_scanner_requires_closing_bracket() {
        assert_eq!(Tags::new("<p unterminated").count(), 0);
    }

    #[test]
    fn test_scanner_handles_multibyte_text() {
        let html = "<h2>見出し</h2>本文";
        let tags: Vec<_> = Tags::new(html).collect();
        assert_eq!(tags.len(), 2);
        assert_eq!(&html[tags[0].end..tags[1].start], "見出し");
    }

    #[test]
    fn test_find_close_and_open() {
        let html = "<h3>a</h3><p>b</p><h2>c</h2>";
        let close = find_close(html, 0, "h3").unwrap();
        assert_eq!(close.start, 5);
        let next = find_open(html, close.end, &["h2", "h3"]).unwrap();
        assert!(next.is_open("h2"));
    }

    #[test]
    fn test_unescape_text() {
        assert_eq!(unescape_text("Q&amp;A &lt;b&gt;"), "Q&A <b>");
        assert_eq!(unescape_text("&amp;lt;"), "&lt;");
        assert_eq!(unescape_text(&escape_text("a<b & c")), "a<b & c");
    }

    #[test]
    fn test_strip_tags() {
        let html = "<p>This is <strong>bold</strong> text</p>";
        assert_eq!(strip_tags(html), "This is bold text");
    }

    #[test]
    fn test_strip_tags_spans_newlines() {
        assert_eq!(strip_tags("<p\nclass=\"a\">x</p>"), "x");
    }

    #[test]
    fn test_visible_length_counts_characters_after_trim() {
        assert_eq!(visible_length("  <p> 審査 </p>\n"), 2);
        assert_eq!(visible_length(""), 0);
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("A&B <x>"), "A&amp;B &lt;x&gt;");
    }
}
