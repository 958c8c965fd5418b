//! Writing policies: the lead, body and closing instructions given to the
//! full-article prompt.
//!
//! A policy is stored as one text with up to three labelled parts:
//!
//! ```text
//! [リード文]
//! ...lead instructions...
//! [本文指示]
//! ...body instructions...
//! [まとめ文]
//! ...closing instructions...
//! ```
//!
//! A part runs from its label to the next bracketed label or the end of the
//! text. Text without any of the three labels is treated as body
//! instructions only.

use regex::Regex;
use std::sync::LazyLock;

use crate::template::PromptTemplate;

pub const LEAD_LABEL: &str = "[リード文]";
pub const BODY_LABEL: &str = "[本文指示]";
pub const CLOSING_LABEL: &str = "[まとめ文]";

static BRACKET_LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]+\]").expect("valid label pattern"));

/// Lead instructions used when a policy has none.
pub const FALLBACK_LEAD: &str = "# リード文の作成指示:
・読者の悩みや不安に共感する書き出しにすること
・記事から得られる具体的なメリットを2つ以上示すこと
・最後に読み進めたくなる一文を添えること";

/// Closing instructions used when a policy has none.
pub const FALLBACK_CLOSING: &str = "# まとめ文の作成指示:
・最初に<h2>{keyword}に関するまとめ</h2>を出力すること
・要点を2〜3個の箇条書きで示すこと
・約300文字にまとめること";

/// Built-in policy offered as the `default` preset.
pub const DEFAULT_POLICY: &str = "[リード文]
# リード文の作成指示:
・読者の悩みや不安に共感する書き出しにすること（例：「〜でお困りではありませんか」）
・この記事で得られる具体的なメリットを2つ以上示すこと
・興味を引く表現を適度に使うこと
・最後に行動を促す一文を入れること

[本文指示]
# 本文の作成指示:
・構成案の<h2>と<h3>を維持し、それぞれの直下に<p>で本文を書くこと
・各<h2>の冒頭に、そのセクションで扱う内容を紹介する短い導入段落を置くこと
・各<h3>の直下には4〜5文程度の詳しい解説を書くこと
・<h4>、<script>、<style>は使わないこと
・一文は55文字以内とし、一文ごとに独立した<p>で書くこと（<br>は禁止）
・各<h2>セクションには表（table）または箇条書き（ul/ol）を必ず1つ以上含めること
・比較やメリット・デメリットは<table><tr><th>…</th></tr><tr><td>…</td></tr></table>の形で表にすること
・PREP法またはSDS法で書くこと
・横文字と冗長な表現を避けること
・語尾に変化をつけること
・具体例や注意点、実際の手順を豊富に含めること

[まとめ文]
# まとめ文の作成指示:
・必ず最初に<h2>{keyword}に関するまとめ</h2>を出力すること
・一文ごとに独立した<p>で書くこと（<br>は禁止）
・記事の要点を2〜3個の箇条書きで文中に入れること
・400文字程度にすること
";

/// The three parts of a writing policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    pub lead: String,
    pub body: String,
    pub closing: String,
}

impl Policy {
    /// Splits a policy text into its labelled parts.
    ///
    /// Missing parts are left empty; see [`Policy::with_defaults`].
    pub fn parse(text: &str) -> Self {
        if ![LEAD_LABEL, BODY_LABEL, CLOSING_LABEL].iter().any(|label| text.contains(label)) {
            return Self { body: text.trim().to_string(), ..Self::default() };
        }

        Self {
            lead: labelled_part(text, LEAD_LABEL),
            body: labelled_part(text, BODY_LABEL),
            closing: labelled_part(text, CLOSING_LABEL),
        }
    }

    /// Fills an empty lead or closing part with the built-in instructions.
    pub fn with_defaults(mut self) -> Self {
        if self.lead.is_empty() {
            self.lead = FALLBACK_LEAD.to_string();
        }
        if self.closing.is_empty() {
            self.closing = FALLBACK_CLOSING.to_string();
        }
        self
    }

    /// Substitutes `{keyword}` in every part.
    ///
    /// Policies are free prose, so any other `{word}` is left as written.
    pub fn render(&self, keyword: &str) -> Self {
        let values = [("keyword", keyword)];
        let render = |part: &str| PromptTemplate::new("policy", part).render_lenient(&values);
        Self { lead: render(&self.lead), body: render(&self.body), closing: render(&self.closing) }
    }
}

fn labelled_part(text: &str, label: &str) -> String {
    let Some(start) = text.find(label) else {
        return String::new();
    };
    let content_start = start + label.len();
    let content_end = BRACKET_LABEL.find_at(text, content_start).map(|m| m.start()).unwrap_or(text.len());
    text[content_start..content_end].trim().to_string()
}
