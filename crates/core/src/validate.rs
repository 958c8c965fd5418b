//! Advisory structural checks on finished articles.
//!
//! Nothing here blocks publishing. Warnings are returned in check order,
//! not document order, so a reader sees all problems of one kind together.

use std::fmt;

use crate::headings::sections;
use crate::markup::{Tags, find_close, find_open, visible_length, visible_text};
use crate::terms::CoTerms;

/// Configuration for [`validate_with_config`].
#[derive(Debug, Clone)]
pub struct ValidateConfig {
    /// Tags that must not appear anywhere
    pub forbidden_tags: Vec<String>,
    /// Minimum `<p>` count under each subheading
    pub min_subsection_paragraphs: usize,
    /// Maximum `<p>` count under each subheading
    pub max_subsection_paragraphs: usize,
    /// Ceiling on the whole article's visible length
    pub max_visible_chars: usize,
}

impl Default for ValidateConfig {
    fn default() -> Self {
        Self {
            forbidden_tags: vec!["h4".to_string(), "script".to_string(), "style".to_string()],
            min_subsection_paragraphs: 3,
            max_subsection_paragraphs: 6,
            max_visible_chars: 6000,
        }
    }
}

/// A non-fatal policy violation found in generated markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralWarning {
    /// A forbidden tag appears somewhere in the article.
    ForbiddenTag { tags: Vec<String> },
    /// A line-break tag appears somewhere in the article.
    LineBreak,
    /// A level-2 section has no list or table.
    MissingListOrTable { section: String },
    /// A level-3 subsection has too few or too many paragraphs.
    ParagraphCount { subsection: String, count: usize, min: usize, max: usize },
    /// The article's visible text is longer than allowed.
    TooLong { length: usize, max: usize },
    /// Co-occurrence terms absent from the visible text.
    MissingCoTerms { terms: Vec<String> },
}

impl fmt::Display for StructuralWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForbiddenTag { tags } => write!(f, "Forbidden tags present ({})", tags.join("/")),
            Self::LineBreak => write!(f, "<br> is not allowed; use separate <p> elements"),
            Self::MissingListOrTable { section } => {
                write!(f, "Section \"{}\" has no table or list (ul/ol)", section)
            }
            Self::ParagraphCount { subsection, count, min, max } => write!(
                f,
                "Subsection \"{}\" has {} paragraphs; expected {} to {}",
                subsection, count, min, max
            ),
            Self::TooLong { length, max } => {
                write!(f, "Article is {} characters long, above the {} character limit", length, max)
            }
            Self::MissingCoTerms { terms } => write!(f, "Co-occurrence terms not found: {}", terms.join(", ")),
        }
    }
}

/// Checks an article against the default policy.
pub fn validate(html: &str) -> Vec<StructuralWarning> {
    validate_with_config(html, &ValidateConfig::default())
}

/// Checks an article against a custom policy.
pub fn validate_with_config(html: &str, config: &ValidateConfig) -> Vec<StructuralWarning> {
    let mut warnings = Vec::new();

    let mut forbidden: Vec<String> = Vec::new();
    let mut line_break = false;
    for tag in Tags::new(html).filter(|t| !t.closing) {
        let name = tag.name.to_ascii_lowercase();
        if config.forbidden_tags.contains(&name) && !forbidden.contains(&name) {
            forbidden.push(name);
        } else if name == "br" {
            line_break = true;
        }
    }
    if !forbidden.is_empty() {
        warnings.push(StructuralWarning::ForbiddenTag { tags: forbidden });
    }
    if line_break {
        warnings.push(StructuralWarning::LineBreak);
    }

    for section in sections(html) {
        let body = section.body(html);
        if find_open(body, 0, &["ul", "ol", "table"]).is_none() {
            warnings.push(StructuralWarning::MissingListOrTable { section: section.title(html) });
        }
    }

    for (title, count) in subsection_paragraph_counts(html) {
        if count < config.min_subsection_paragraphs || count > config.max_subsection_paragraphs {
            warnings.push(StructuralWarning::ParagraphCount {
                subsection: title,
                count,
                min: config.min_subsection_paragraphs,
                max: config.max_subsection_paragraphs,
            });
        }
    }

    let length = visible_length(html);
    if length > config.max_visible_chars {
        warnings.push(StructuralWarning::TooLong { length, max: config.max_visible_chars });
    }

    warnings
}

/// Co-occurrence terms absent from the article, as a warning if any.
pub fn missing_co_terms(html: &str, terms: &CoTerms) -> Option<StructuralWarning> {
    let missing = terms.missing_in(html);
    if missing.is_empty() { None } else { Some(StructuralWarning::MissingCoTerms { terms: missing }) }
}

/// Title and `<p>...</p>` count of each level-3 subsection.
///
/// A subsection runs from the end of its header to the next `h2` or `h3`
/// opening tag, or the end of the document.
fn subsection_paragraph_counts(html: &str) -> Vec<(String, usize)> {
    let mut counts = Vec::new();
    let mut pos = 0;

    while let Some(open) = find_open(html, pos, &["h3"]) {
        let Some(close) = find_close(html, open.end, "h3") else {
            break;
        };
        let end = find_open(html, close.end, &["h2", "h3"]).map(|t| t.start).unwrap_or(html.len());
        let title = visible_text(&html[open.end..close.start]);
        counts.push((title, count_paragraphs(&html[close.end..end])));
        pos = close.end;
    }

    counts
}

fn count_paragraphs(block: &str) -> usize {
    let mut count = 0;
    let mut pos = 0;
    while let Some(open) = find_open(block, pos, &["p"]) {
        match find_close(block, open.end, "p") {
            Some(close) => {
                count += 1;
                pos = close.end;
            }
            None => break,
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraphs(n: usize) -> String {
        (0..n).map(|i| format!("<p>文{}</p>", i)).collect()
    }

    #[test]
    fn test_clean_article_has_no_warnings() {
        let html = format!("<h2>A</h2><ul><li>x</li></ul><h3>a1</h3>{}", paragraphs(4));
        assert!(validate(&html).is_empty());
    }

    #[test]
    fn test_missing_list_or_table_once_per_section() {
        let html = "<h2>A</h2><p>a</p><h2>B</h2><table><tr><td>t</td></tr></table><h2>C</h2><p>c</p>";
        let warnings = validate(html);
        let missing: Vec<_> = warnings
            .iter()
            .filter_map(|w| match w {
                StructuralWarning::MissingListOrTable { section } => Some(section.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(missing, ["A", "C"]);
    }

    #[test]
    fn test_forbidden_tags_single_warning() {
        let html = "<h4>x</h4><script>y</script><STYLE>z</STYLE><h4>again</h4>";
        let warnings = validate(html);
        assert_eq!(
            warnings,
            vec![StructuralWarning::ForbiddenTag { tags: vec!["h4".into(), "script".into(), "style".into()] }]
        );
    }

    #[test]
    fn test_line_break_warning() {
        let warnings = validate("<p>a<br/>b<BR>c</p>");
        assert_eq!(warnings, vec![StructuralWarning::LineBreak]);
    }

    #[test]
    fn test_subsection_paragraph_bounds() {
        let html = format!(
            "<h2>A</h2><ol><li>x</li></ol><h3>few</h3>{}<h3>ok</h3>{}<h3>many</h3>{}",
            paragraphs(2),
            paragraphs(6),
            paragraphs(7)
        );
        let warnings = validate(&html);
        assert_eq!(warnings.len(), 2);
        assert!(matches!(&warnings[0], StructuralWarning::ParagraphCount { subsection, count: 2, .. } if subsection == "few"));
        assert!(matches!(&warnings[1], StructuralWarning::ParagraphCount { subsection, count: 7, .. } if subsection == "many"));
    }

    #[test]
    fn test_subsection_ends_at_next_section() {
        let html = format!("<h3>x</h3>{}<h2>B</h2><ul><li>l</li></ul>{}", paragraphs(3), paragraphs(5));
        assert!(validate(&html).is_empty());
    }

    #[test]
    fn test_too_long() {
        let html = format!("<p>{}</p>", "あ".repeat(6001));
        assert_eq!(validate(&html), vec![StructuralWarning::TooLong { length: 6001, max: 6000 }]);
        let html = format!("<p>{}</p>", "あ".repeat(6000));
        assert!(validate(&html).is_empty());
    }

    #[test]
    fn test_warnings_follow_check_order() {
        let html = format!("<h2>A</h2><p>x<br>y</p><script></script><p>{}</p>", "z".repeat(6001));
        let warnings = validate(&html);
        assert!(matches!(warnings[0], StructuralWarning::ForbiddenTag { .. }));
        assert!(matches!(warnings[1], StructuralWarning::LineBreak));
        assert!(matches!(warnings[2], StructuralWarning::MissingListOrTable { .. }));
        assert!(matches!(warnings[3], StructuralWarning::TooLong { .. }));
    }

    #[test]
    fn test_missing_co_terms() {
        let terms = CoTerms::parse("審査,即日");
        assert_eq!(
            missing_co_terms("<p>審査は最短</p>", &terms),
            Some(StructuralWarning::MissingCoTerms { terms: vec!["即日".into()] })
        );
        assert_eq!(missing_co_terms("<p>審査は即日</p>", &terms), None);
    }

    #[test]
    fn test_display_messages() {
        let warning = StructuralWarning::MissingCoTerms { terms: vec!["即日".into()] };
        assert!(warning.to_string().contains("即日"));
        let warning = StructuralWarning::MissingListOrTable { section: "審査".into() };
        assert!(warning.to_string().contains("審査"));
    }
}
