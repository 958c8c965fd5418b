//! Bounded fill-or-trim control of an article's visible length.
//!
//! The controller measures the visible length `L` of a draft against a
//! `[min_chars, max_chars]` budget:
//!
//! - `L < min_chars`: ask a [`Filler`] for more paragraphs and append them.
//! - `L > max_chars`: trim once on paragraph boundaries and stop.
//! - otherwise the draft is accepted.
//!
//! Filling is bounded by [`LengthConfig::max_attempts`] and stops early when
//! a fill produces nothing usable. Whatever happens in the loop, the returned
//! document never exceeds `max_chars`.

use async_trait::async_trait;

use crate::Locale;
use crate::Result;
use crate::headings::sections;
use crate::markup::visible_length;
use crate::sanitize::sanitize;
use crate::trim::trim_to_visible_length;

/// Configuration for [`enforce_length`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthConfig {
    /// Lower bound on visible characters
    pub min_chars: usize,
    /// Upper bound on visible characters
    pub max_chars: usize,
    /// Whether the controller runs at all
    pub strict: bool,
    /// Maximum fill attempts
    pub max_attempts: usize,
    /// Shortest fill fragment, in visible characters, that counts as progress
    pub min_fill_chars: usize,
    /// Visible-length cap on the closing section
    pub closing_cap: usize,
}

impl Default for LengthConfig {
    fn default() -> Self {
        Self { min_chars: 2000, max_chars: 5000, strict: false, max_attempts: 0, min_fill_chars: 100, closing_cap: 320 }
    }
}

impl LengthConfig {
    /// Classifies a visible length against the budget.
    pub fn measure(&self, visible: usize) -> LengthState {
        if visible < self.min_chars {
            LengthState::Filling
        } else if visible > self.max_chars {
            LengthState::Trimming
        } else {
            LengthState::Satisfied
        }
    }
}

/// Where a measured document stands relative to its budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthState {
    Filling,
    Trimming,
    Satisfied,
}

/// Why the controller stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthExit {
    /// Visible length landed inside the budget.
    Satisfied,
    /// The document was over budget and was trimmed.
    Trimmed,
    /// A fill returned an empty or too-short fragment.
    NoProgress,
    /// The fill call itself failed.
    GenerationFailed,
    /// The attempt bound was reached while still short.
    AttemptsExhausted,
    /// No positive amount could be requested.
    InvalidBudget,
}

/// Outcome of [`enforce_length`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthReport {
    pub html: String,
    /// Fill fragments actually appended
    pub attempts: usize,
    pub exit: LengthExit,
    /// Visible length of `html`
    pub visible_length: usize,
}

/// Produces additional paragraphs for a draft that is too short.
#[async_trait]
pub trait Filler: Send + Sync {
    /// Returns a markup fragment of roughly `need` visible characters to be
    /// appended to `current_html`. The fragment should add no new level-2
    /// headers.
    async fn fill(&self, current_html: &str, need: usize) -> Result<String>;
}

/// Trims the last closing section to at most `limit` visible characters.
///
/// Header and body are measured together and cut on paragraph boundaries.
/// Documents without a closing section are returned unchanged.
pub fn cap_closing_section(html: &str, locale: &Locale, limit: usize) -> String {
    let Some(section) = sections(html).into_iter().rev().find(|s| locale.is_summary_title(&s.title(html))) else {
        return html.to_string();
    };

    let text = section.text(html);
    if visible_length(text) <= limit {
        return html.to_string();
    }

    let capped = trim_to_visible_length(text, limit);
    tracing::debug!(before = visible_length(text), after = visible_length(&capped), "capped closing section");

    let mut out = String::with_capacity(html.len());
    out.push_str(&html[..section.start]);
    out.push_str(&capped);
    out.push_str(&html[section.end..]);
    out
}

/// Drives a draft toward the configured length budget.
///
/// The closing section is capped first. Fill errors end the loop but are
/// not returned; the report carries [`LengthExit::GenerationFailed`].
pub async fn enforce_length(html: &str, config: &LengthConfig, locale: &Locale, filler: &dyn Filler) -> LengthReport {
    let mut doc = cap_closing_section(html, locale, config.closing_cap);
    let mut attempts = 0;

    let exit = loop {
        let visible = visible_length(&doc);
        tracing::debug!(visible, attempts, min = config.min_chars, max = config.max_chars, "measuring draft length");

        match config.measure(visible) {
            LengthState::Satisfied => break LengthExit::Satisfied,
            LengthState::Trimming => {
                doc = trim_to_visible_length(&doc, config.max_chars);
                break LengthExit::Trimmed;
            }
            LengthState::Filling => {}
        }

        if attempts >= config.max_attempts {
            break LengthExit::AttemptsExhausted;
        }

        let need = config.min_chars.saturating_sub(visible).min(config.max_chars.saturating_sub(visible));
        if need == 0 {
            break LengthExit::InvalidBudget;
        }

        let fragment = match filler.fill(&doc, need).await {
            Ok(fragment) => fragment,
            Err(e) => {
                tracing::warn!(error = %e, attempts, "fill request failed, keeping current draft");
                break LengthExit::GenerationFailed;
            }
        };

        let fragment = sanitize(&fragment);
        let fragment = fragment.trim();
        let added = visible_length(fragment);
        if added < config.min_fill_chars.max(1) {
            tracing::warn!(added, need, "fill produced too little text, stopping");
            break LengthExit::NoProgress;
        }

        doc.push_str("\n\n");
        doc.push_str(fragment);
        attempts += 1;
    };

    if visible_length(&doc) > config.max_chars {
        doc = trim_to_visible_length(&doc, config.max_chars);
    }

    let visible_length = visible_length(&doc);
    tracing::debug!(?exit, attempts, visible_length, "length control finished");
    LengthReport { html: doc, attempts, exit, visible_length }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AutowriterError;
    use std::sync::Mutex;

    /// Returns scripted fragments in order, then errors.
    struct ScriptedFiller {
        fragments: Mutex<Vec<Result<String>>>,
        needs: Mutex<Vec<usize>>,
    }

    impl ScriptedFiller {
        fn new(fragments: Vec<Result<String>>) -> Self {
            let mut fragments = fragments;
            fragments.reverse();
            Self { fragments: Mutex::new(fragments), needs: Mutex::new(Vec::new()) }
        }

        fn needs(&self) -> Vec<usize> {
            self.needs.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Filler for ScriptedFiller {
        async fn fill(&self, _current_html: &str, need: usize) -> Result<String> {
            self.needs.lock().unwrap().push(need);
            self.fragments
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(AutowriterError::Generation { status: 500, body: "script exhausted".into() }))
        }
    }

    fn para(n: usize) -> String {
        format!("<p>{}</p>", "あ".repeat(n))
    }

    fn config(min: usize, max: usize, attempts: usize) -> LengthConfig {
        LengthConfig { min_chars: min, max_chars: max, strict: true, max_attempts: attempts, min_fill_chars: 100, closing_cap: 320 }
    }

    #[test]
    fn test_length_config_default() {
        let config = LengthConfig::default();
        assert_eq!((config.min_chars, config.max_chars), (2000, 5000));
        assert!(!config.strict);
        assert_eq!(config.max_attempts, 0);
        assert_eq!(config.min_fill_chars, 100);
        assert_eq!(config.closing_cap, 320);
    }

    #[test]
    fn test_measure() {
        let config = config(10, 20, 0);
        assert_eq!(config.measure(9), LengthState::Filling);
        assert_eq!(config.measure(10), LengthState::Satisfied);
        assert_eq!(config.measure(20), LengthState::Satisfied);
        assert_eq!(config.measure(21), LengthState::Trimming);
    }

    #[test]
    fn test_cap_closing_section() {
        let locale = Locale::japanese();
        let html = format!("<h2>A</h2>{}<h2>kwに関するまとめ</h2>{}{}", para(50), para(100), para(300));
        let capped = cap_closing_section(&html, &locale, 320);
        assert!(capped.starts_with(&format!("<h2>A</h2>{}", para(50))));
        let closing = &capped[capped.find("<h2>kw").unwrap()..];
        assert!(visible_length(closing) <= 320);
        assert!(closing.contains(&para(100)));
        assert!(!closing.contains(&para(300)));
    }

    #[test]
    fn test_cap_closing_section_without_summary() {
        let locale = Locale::japanese();
        let html = format!("<h2>A</h2>{}", para(1000));
        assert_eq!(cap_closing_section(&html, &locale, 320), html);
    }

    #[tokio::test]
    async fn test_satisfied_without_calls() {
        let filler = ScriptedFiller::new(vec![]);
        let report = enforce_length(&para(150), &config(100, 200, 3), &Locale::japanese(), &filler).await;
        assert_eq!(report.exit, LengthExit::Satisfied);
        assert_eq!(report.attempts, 0);
        assert!(filler.needs().is_empty());
    }

    #[tokio::test]
    async fn test_fill_until_satisfied() {
        let filler = ScriptedFiller::new(vec![Ok(para(120)), Ok(para(120))]);
        let report = enforce_length(&para(100), &config(300, 1000, 3), &Locale::japanese(), &filler).await;
        assert_eq!(report.exit, LengthExit::Satisfied);
        assert_eq!(report.attempts, 2);
        // appended fragments are separated by a blank line, which counts
        assert_eq!(report.visible_length, 344);
        assert_eq!(filler.needs(), vec![200, 78]);
    }

    #[tokio::test]
    async fn test_short_fragment_stops_loop() {
        let filler = ScriptedFiller::new(vec![Ok(para(99))]);
        let report = enforce_length(&para(100), &config(300, 1000, 3), &Locale::japanese(), &filler).await;
        assert_eq!(report.exit, LengthExit::NoProgress);
        assert_eq!(report.attempts, 0);
        assert_eq!(report.html, para(100));
    }

    #[tokio::test]
    async fn test_fragment_is_sanitized() {
        let fragment = format!("<div class=\"x\">{}<br></div><script>s</script>", para(120));
        let filler = ScriptedFiller::new(vec![Ok(fragment)]);
        let report = enforce_length(&para(100), &config(200, 1000, 1), &Locale::japanese(), &filler).await;
        assert_eq!(report.exit, LengthExit::Satisfied);
        assert!(!report.html.contains("div"));
        assert!(!report.html.contains("<br"));
        assert!(!report.html.contains("<script"));
    }

    #[tokio::test]
    async fn test_generation_error_is_swallowed() {
        let filler = ScriptedFiller::new(vec![]);
        let report = enforce_length(&para(100), &config(300, 1000, 2), &Locale::japanese(), &filler).await;
        assert_eq!(report.exit, LengthExit::GenerationFailed);
        assert_eq!(report.html, para(100));
    }

    #[tokio::test]
    async fn test_attempts_exhausted() {
        let filler = ScriptedFiller::new(vec![Ok(para(100)), Ok(para(100))]);
        let report = enforce_length(&para(100), &config(1000, 2000, 2), &Locale::japanese(), &filler).await;
        assert_eq!(report.exit, LengthExit::AttemptsExhausted);
        assert_eq!(report.attempts, 2);
        assert_eq!(report.visible_length, 304);
    }

    #[tokio::test]
    async fn test_zero_attempts_never_fills() {
        let filler = ScriptedFiller::new(vec![Ok(para(500))]);
        let report = enforce_length(&para(100), &config(300, 1000, 0), &Locale::japanese(), &filler).await;
        assert_eq!(report.exit, LengthExit::AttemptsExhausted);
        assert!(filler.needs().is_empty());
    }

    #[tokio::test]
    async fn test_over_budget_is_trimmed_once() {
        let html = format!("{}{}{}", para(100), para(100), para(100));
        let filler = ScriptedFiller::new(vec![]);
        let report = enforce_length(&html, &config(50, 250, 0), &Locale::japanese(), &filler).await;
        assert_eq!(report.exit, LengthExit::Trimmed);
        assert_eq!(report.html, format!("{}{}", para(100), para(100)));
    }

    #[tokio::test]
    async fn test_overshooting_fill_is_trimmed() {
        let filler = ScriptedFiller::new(vec![Ok(format!("{}{}", para(150), para(150)))]);
        let report = enforce_length(&para(100), &config(200, 300, 1), &Locale::japanese(), &filler).await;
        assert_eq!(report.exit, LengthExit::Trimmed);
        assert!(report.visible_length <= 300);
        assert_eq!(report.attempts, 1);
    }

    #[tokio::test]
    async fn test_inverted_budget_requests_nothing() {
        let filler = ScriptedFiller::new(vec![Ok(para(500))]);
        let report = enforce_length(&para(100), &config(300, 50, 3), &Locale::japanese(), &filler).await;
        assert!(report.visible_length <= 50);
        assert!(filler.needs().is_empty());
    }
}
