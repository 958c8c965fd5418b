//! Tag whitelist enforcement for generated markup.
//!
//! Runs after every generation step. Allowed tags are re-emitted in
//! canonical form (`<name>` / `</name>`, lowercase, no attributes), every
//! other tag is dropped while its text is kept, and line breaks are always
//! dropped because paragraphs must be separate `<p>` elements.

use crate::markup::Tags;

/// Tags that survive sanitization.
pub const ALLOWED_TAGS: [&str; 12] = ["h2", "h3", "p", "strong", "em", "ul", "ol", "li", "table", "tr", "th", "td"];

/// Tags removed even when listed as allowed.
pub const ALWAYS_STRIPPED_TAGS: [&str; 1] = ["br"];

/// Configuration for the sanitizer.
#[derive(Debug, Clone)]
pub struct SanitizeConfig {
    /// Tag names kept in the output (case-insensitive)
    pub allowed_tags: Vec<String>,
    /// Tag names always removed; takes precedence over `allowed_tags`
    pub always_strip: Vec<String>,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            allowed_tags: ALLOWED_TAGS.iter().map(|t| t.to_string()).collect(),
            always_strip: ALWAYS_STRIPPED_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl SanitizeConfig {
    fn keeps(&self, name: &str) -> bool {
        !self.always_strip.iter().any(|t| t.eq_ignore_ascii_case(name))
            && self.allowed_tags.iter().any(|t| t.eq_ignore_ascii_case(name))
    }
}

/// Sanitizes markup with the default whitelist.
pub fn sanitize(html: &str) -> String {
    sanitize_with_config(html, &SanitizeConfig::default())
}

/// Sanitizes markup with a custom whitelist.
///
/// Passes repeat until the output stops changing, since dropping a tag can
/// splice surrounding text into a new tag (`<<i>p>` becomes `<p>`). Each
/// pass either shortens the text or only lowercases names, so this ends.
pub fn sanitize_with_config(html: &str, config: &SanitizeConfig) -> String {
    let mut current = sanitize_pass(html, config);
    loop {
        let next = sanitize_pass(&current, config);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn sanitize_pass(html: &str, config: &SanitizeConfig) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;

    for tag in Tags::new(html) {
        out.push_str(&html[last..tag.start]);
        if config.keeps(tag.name) {
            out.push('<');
            if tag.closing {
                out.push('/');
            }
            out.push_str(&tag.name.to_ascii_lowercase());
            out.push('>');
        }
        last = tag.end;
    }

    out.push_str(&html[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_whitelisted_tags() {
        let html = "<h2>A</h2><h3>B</h3><p><strong>c</strong><em>d</em></p><ul><li>e</li></ul><ol><li>f</li></ol><table><tr><th>g</th><td>h</td></tr></table>";
        assert_eq!(sanitize(html), html);
    }

    #[test]
    fn test_removes_disallowed_tags_keeping_text() {
        let html = r#"<div class="x"><h1>Title</h1><p>Text <a href="/y">link</a></p></div>"#;
        assert_eq!(sanitize(html), "Title<p>Text link</p>");
    }

    #[test]
    fn test_removes_line_breaks() {
        assert_eq!(sanitize("<p>a<br>b<BR/>c<br />d</p>"), "<p>abcd</p>");
    }

    #[test]
    fn test_line_break_removed_even_if_allowed() {
        let mut config = SanitizeConfig::default();
        config.allowed_tags.push("br".to_string());
        assert_eq!(sanitize_with_config("a<br>b", &config), "ab");
    }

    #[test]
    fn test_canonicalizes_case_and_attributes() {
        assert_eq!(sanitize(r#"<P STYLE="x">a</P><H2 id="s">b</H2>"#), "<p>a</p><h2>b</h2>");
    }

    #[test]
    fn test_script_tags_removed() {
        assert_eq!(sanitize("<script>alert(1)</script><p>ok</p>"), "alert(1)<p>ok</p>");
    }

    #[test]
    fn test_idempotent_on_spliced_tags() {
        let html = "<<i>P>text<<b>script>";
        let once = sanitize(html);
        assert_eq!(sanitize(&once), once);
        assert_eq!(once, "<p>text");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(sanitize("1 < 2 and 3 > 2"), "1 < 2 and 3 > 2");
    }
}
