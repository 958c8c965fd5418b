use crate::formatters::DraftMetadata;

/// Configuration for Markdown conversion
#[derive(Debug, Clone, Default)]
pub struct MarkdownConfig {
    /// Include TOML frontmatter with metadata
    pub include_frontmatter: bool,
    /// Include the title as an H1 heading at the start of content
    pub include_title_heading: bool,
}

/// Convert draft markup to Markdown with optional frontmatter
pub fn convert_to_markdown(html: &str, metadata: &DraftMetadata, config: &MarkdownConfig) -> String {
    let mut output = String::new();

    if config.include_frontmatter {
        output.push_str(&generate_frontmatter(metadata));
        output.push('\n');
    }

    if config.include_title_heading
        && let Some(title) = &metadata.title
    {
        output.push_str(&format!("# {}\n\n", title));
    }

    output.push_str(&html_to_markdown(html));
    output
}

fn generate_frontmatter(metadata: &DraftMetadata) -> String {
    let mut frontmatter = String::from("+++");
    frontmatter.push_str(&format!("\nkeyword = {}", toml_escape_string(&metadata.keyword)));

    if let Some(title) = &metadata.title {
        frontmatter.push_str(&format!("\ntitle = {}", toml_escape_string(title)));
    }

    if let Some(excerpt) = &metadata.excerpt {
        frontmatter.push_str(&format!("\nexcerpt = {}", toml_escape_string(excerpt)));
    }

    if let Some(slug) = &metadata.slug {
        frontmatter.push_str(&format!("\nslug = {}", toml_escape_string(slug)));
    }

    frontmatter.push_str("\n+++\n");
    frontmatter
}

fn toml_escape_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n"))
}

/// Convert HTML to Markdown using htmd crate
#[cfg(feature = "markdown")]
fn html_to_markdown(html: &str) -> String {
    htmd::convert(html).unwrap_or_else(|_| crate::formatters::text::text_with_paragraphs(html))
}

/// Line-per-block text when the markdown feature is disabled
#[cfg(not(feature = "markdown"))]
fn html_to_markdown(html: &str) -> String {
    crate::formatters::text::text_with_paragraphs(html)
}
