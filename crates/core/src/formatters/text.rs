use crate::formatters::DraftMetadata;
use crate::markup::{Tags, strip_tags};

const BLOCK_ELEMENTS: [&str; 7] = ["p", "h2", "h3", "li", "tr", "ul", "ol"];

/// Configuration for plain text output
#[derive(Debug, Clone, Default)]
pub struct TextConfig {
    /// Break lines after block elements
    pub preserve_paragraphs: bool,

    /// Wrap lines at this many characters (0 = no wrapping)
    pub line_width: usize,

    /// Include a title header
    pub include_header: bool,
}

/// Convert draft markup to plain text
pub fn convert_to_text(html: &str, metadata: &DraftMetadata, config: &TextConfig) -> String {
    let mut output = String::new();

    if config.include_header {
        output.push_str(&generate_header(metadata));
        output.push_str("\n\n");
    }

    let text = if config.preserve_paragraphs { text_with_paragraphs(html) } else { strip_tags(html) };
    let final_text = if config.line_width > 0 { wrap_text(&text, config.line_width) } else { text };

    output.push_str(&final_text);
    output.trim().to_string()
}

fn generate_header(metadata: &DraftMetadata) -> String {
    let title = metadata.title.clone().unwrap_or_else(|| metadata.keyword.clone());
    format!("{}\n{}", title, "=".repeat(title.chars().count()))
}

/// Text with one line per block element and `- ` before list items.
pub(crate) fn text_with_paragraphs(html: &str) -> String {
    let mut output = String::new();
    let mut last = 0;

    for tag in Tags::new(html) {
        output.push_str(&strip_tags(&html[last..tag.start]));
        last = tag.end;

        let name = tag.name.to_ascii_lowercase();
        if !tag.closing && name == "li" {
            output.push_str("- ");
        } else if !tag.closing && (name == "td" || name == "th") && !output.ends_with('\n') && !output.is_empty() {
            output.push_str(" | ");
        } else if tag.closing && BLOCK_ELEMENTS.contains(&name.as_str()) && !output.ends_with('\n') {
            output.push('\n');
        }
    }
    output.push_str(&strip_tags(&html[last..]));

    output.lines().map(str::trim).filter(|l| !l.is_empty()).collect::<Vec<_>>().join("\n")
}

/// Hard-wraps each line every `width` characters.
///
/// Japanese prose has no spaces to break on, so lines are cut by count.
fn wrap_text(text: &str, width: usize) -> String {
    text.lines()
        .map(|line| {
            let chars: Vec<char> = line.chars().collect();
            chars.chunks(width).map(|c| c.iter().collect::<String>()).collect::<Vec<_>>().join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
