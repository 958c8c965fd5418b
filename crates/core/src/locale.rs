//! Deployment locale: the closing-section marker and related fixed strings.

use serde::{Deserialize, Serialize};

/// Fixed strings that identify and build the mandatory closing section.
///
/// A deployment uses exactly one marker word. Any level-2 title containing
/// it is treated as a closing section, both when stripping input and when
/// checking generated drafts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    /// Marker word identifying the closing section.
    pub summary_marker: String,
    /// Conventional introduction title, skipped by title extraction.
    pub intro_title: String,
    /// Canonical closing heading; `{topic}` is replaced with the keyword.
    pub summary_heading: String,
    /// First paragraph of a locally generated fallback summary.
    pub fallback_opening: String,
    /// Bullet text per section title; `{title}` is replaced.
    pub fallback_bullet: String,
    /// Bullet used when the draft has no usable section titles.
    pub fallback_generic_bullet: String,
    /// Last paragraph of a locally generated fallback summary.
    pub fallback_closing: String,
}

impl Locale {
    pub fn japanese() -> Self {
        Self {
            summary_marker: "まとめ".to_string(),
            intro_title: "はじめに".to_string(),
            summary_heading: "{topic}に関するまとめ".to_string(),
            fallback_opening: "本記事のポイントを簡潔に整理します。".to_string(),
            fallback_bullet: "{title}の要点を確認しましょう。".to_string(),
            fallback_generic_bullet: "本記事の要点を振り返りましょう。".to_string(),
            fallback_closing: "詳細は各セクションを参照し、実践へつなげてください。".to_string(),
        }
    }

    pub fn english() -> Self {
        Self {
            summary_marker: "Summary".to_string(),
            intro_title: "Introduction".to_string(),
            summary_heading: "{topic}: Summary".to_string(),
            fallback_opening: "Here are the key points of this article.".to_string(),
            fallback_bullet: "Review the essentials of {title}.".to_string(),
            fallback_generic_bullet: "Look back over the main points of this article.".to_string(),
            fallback_closing: "See each section for details and put them into practice.".to_string(),
        }
    }

    /// Canonical closing heading text for `topic`, unescaped.
    pub fn summary_heading_for(&self, topic: &str) -> String {
        self.summary_heading.replace("{topic}", topic)
    }

    /// Whether a section title marks a closing section.
    pub fn is_summary_title(&self, title: &str) -> bool {
        title.contains(&self.summary_marker)
    }

    /// Whether a section title is boilerplate (introduction or bare marker).
    pub fn is_boilerplate_title(&self, title: &str) -> bool {
        title == self.intro_title || title == self.summary_marker
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::japanese()
    }
}

/// Built-in locales selectable by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocaleName {
    #[default]
    Ja,
    En,
}

/// The `locale` settings key: a built-in name or a full table of strings.
///
/// ```toml
/// locale = "en"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocaleSetting {
    Named(LocaleName),
    Custom(Locale),
}

impl Default for LocaleSetting {
    fn default() -> Self {
        Self::Named(LocaleName::default())
    }
}

impl LocaleSetting {
    pub fn resolve(&self) -> Locale {
        match self {
            Self::Named(LocaleName::Ja) => Locale::japanese(),
            Self::Named(LocaleName::En) => Locale::english(),
            Self::Custom(locale) => locale.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_japanese() {
        let locale = Locale::default();
        assert_eq!(locale.summary_marker, "まとめ");
        assert_eq!(locale.summary_heading_for("キーワード"), "キーワードに関するまとめ");
    }

    #[test]
    fn test_summary_heading_contains_marker() {
        for locale in [Locale::japanese(), Locale::english()] {
            assert!(locale.is_summary_title(&locale.summary_heading_for("topic")));
        }
    }

    #[derive(Deserialize)]
    struct Wrapper {
        locale: LocaleSetting,
    }

    #[test]
    fn test_locale_setting_by_name() {
        let parsed: Wrapper = toml::from_str(r#"locale = "en""#).unwrap();
        assert_eq!(parsed.locale.resolve(), Locale::english());
        assert_eq!(LocaleSetting::default().resolve(), Locale::japanese());
    }

    #[test]
    fn test_locale_setting_custom_table() {
        let text = r#"
[locale]
summary_marker = "Fazit"
intro_title = "Einleitung"
summary_heading = "Fazit zu {topic}"
fallback_opening = "o"
fallback_bullet = "{title}"
fallback_generic_bullet = "g"
fallback_closing = "c"
"#;
        let parsed: Wrapper = toml::from_str(text).unwrap();
        let locale = parsed.locale.resolve();
        assert_eq!(locale.summary_heading_for("Kredit"), "Fazit zu Kredit");
        assert!(locale.is_summary_title("Fazit zu Kredit"));
    }

    #[test]
    fn test_unknown_locale_name_is_rejected() {
        assert!(toml::from_str::<Wrapper>(r#"locale = "fr""#).is_err());
    }

    #[test]
    fn test_boilerplate_titles() {
        let locale = Locale::japanese();
        assert!(locale.is_boilerplate_title("はじめに"));
        assert!(locale.is_boilerplate_title("まとめ"));
        assert!(!locale.is_boilerplate_title("審査の流れ"));
    }
}
