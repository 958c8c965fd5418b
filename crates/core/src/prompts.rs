//! Built-in prompt templates for every generation step.
//!
//! Each template declares the slots its renderer fills, so a template edit
//! that drops a slot fails in [`Prompts::builtin`] instead of sending an
//! incomplete prompt.

use crate::Result;
use crate::policy::Policy;
use crate::template::PromptTemplate;
use crate::terms::{BannedTerms, CoTerms, bullet_block};

const OUTLINE: &str = "# 役割
あなたは日本語SEOに強いWeb編集者です。キーワードから「①読者像」「②ニーズ」「③構成(HTML)」を作成してください。

# 入力
- キーワード: {keyword}
- 追加要素: {extra}
- 共起語（本文で自然に使う想定。出力は③だけでよい）:
{co_terms}
- 禁止事項（絶対に含めない）:
{banned}

# 制約
- ①と②はそれぞれ150字程度の箇条書き
- ③は<h2>と<h3>のみを使う（<h1>は禁止）
- <h2>は最低{min_sections}個、最大{max_sections}個
- 各<h2>の下に<h3>を3つ以上置く
- 導入の定型句は使わない

# 出力フォーマット（厳守）
① 読者像:
- ...

② ニーズ:
- ...

③ 構成（HTML）:
<h2>...</h2>
<h3>...</h3>";

const FILL_SECTIONS: &str = "# 役割: SEO編集者
# 指示: 「{keyword}」の既存の構成に不足があるため、追加の<h2>ブロックをちょうど{need}個だけ作成してください。
# 厳守:
- 出力は追加分のみ。説明文は出さない
- 各ブロックは<h2>見出し</h2>の直後に<h3>を3つ以上置く
- すべて日本語。<h1>と<br>は禁止

# 既存の構成（重複を避ける）
{structure}

# 出力（追加分のみ）";

const FULL_ARTICLE: &str = "# 命令書:
あなたはSEOに特化した日本語のプロライターです。
以下の構成案と各ポリシーに従い、「{keyword}」の記事をリード文から本文、まとめまで通しでHTMLのみ出力してください。

# 文字数ガイド（本文合計）
・概ね{min_chars}〜{max_chars}字に収めること

# リード文ポリシー（厳守）
{lead_policy}

# 本文ポリシー（厳守）
{body_policy}

# まとめ文ポリシー（厳守）
{closing_policy}

# 共起語（自然に散りばめる。詰め込みは禁止）
{co_terms}

# 禁止事項（絶対に含めない）
{banned}

# 記事の方向性
[読者像]
{readers}

[ニーズ]
{needs}

# 構成案（この<h2><h3>構成を厳密に守る）
{structure}

# 出力
（HTMLのみを出力）";

const APPEND: &str = "あなたは日本語のSEOライターです。
以下の既存HTML本文に、不足分として約{need}文字の段落を追記してください。

# 制約
- 新しい<h2>/<h3>は禁止
- <p>/<ul>/<ol>/<table>のみ使用可
- 既存内容との重複や矛盾を避ける
- 共起語は不自然にならない範囲で織り込む
- 1文は55文字以内、<br>は禁止
- 出力は追加部分のHTMLのみ

# 主キーワード
{keyword}

# 共起語
{co_terms}

# 既存本文
{current_html}";

const TITLE_AND_DESCRIPTION: &str = "# 役割: SEO編集者
# 指示: 以下を同時に生成してください

## 1. SEOタイトル
- 32文字以内、日本語のみ
- 【】や｜は禁止
- キーワードを自然に含める

## 2. メタディスクリプション
- 120字以内
- 「〜を解説」「〜を紹介」などの定型は禁止
- 数字や具体的なメリットを含める

# 入力
- キーワード: {keyword}
- 方向性: {direction}

# 出力フォーマット（厳守）
タイトル: ここにタイトル
説明: ここに説明文";

const TITLE: &str = "# 役割: SEO編集者
# 指示: 以下のキーワードからSEOタイトルを1つ生成してください

# 制約
- 32文字以内、日本語のみ
- 【】や｜は禁止
- キーワードを自然に含める

# 入力
- キーワード: {keyword}
- 方向性: {direction}

# 出力: タイトルのみ";

const DESCRIPTION: &str = "# 役割: SEO編集者
# 指示: 以下の情報からメタディスクリプションを生成してください

# 制約
- 120字以内
- 「〜を解説」「〜を紹介」などの定型は禁止
- 数字や具体的なメリットを含める

# 入力
- キーワード: {keyword}
- タイトル: {title}
- 方向性: {direction}

# 出力: 説明文のみ";

/// Inputs to the full-article prompt.
#[derive(Debug, Clone, Copy)]
pub struct ArticlePromptInput<'a> {
    pub keyword: &'a str,
    pub policy: &'a Policy,
    pub structure: &'a str,
    pub readers: &'a str,
    pub needs: &'a str,
    pub co_terms: &'a CoTerms,
    pub banned: &'a BannedTerms,
    pub min_chars: usize,
    pub max_chars: usize,
}

/// The full set of generation prompts.
#[derive(Debug, Clone)]
pub struct Prompts {
    outline: PromptTemplate,
    fill_sections: PromptTemplate,
    full_article: PromptTemplate,
    append: PromptTemplate,
    title_and_description: PromptTemplate,
    title: PromptTemplate,
    description: PromptTemplate,
}

impl Prompts {
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            outline: PromptTemplate::with_slots(
                "outline",
                OUTLINE,
                &["keyword", "extra", "co_terms", "banned", "min_sections", "max_sections"],
            )?,
            fill_sections: PromptTemplate::with_slots("fill_sections", FILL_SECTIONS, &["keyword", "need", "structure"])?,
            full_article: PromptTemplate::with_slots(
                "full_article",
                FULL_ARTICLE,
                &[
                    "keyword",
                    "min_chars",
                    "max_chars",
                    "lead_policy",
                    "body_policy",
                    "closing_policy",
                    "co_terms",
                    "banned",
                    "readers",
                    "needs",
                    "structure",
                ],
            )?,
            append: PromptTemplate::with_slots("append", APPEND, &["keyword", "need", "co_terms", "current_html"])?,
            title_and_description: PromptTemplate::with_slots(
                "title_and_description",
                TITLE_AND_DESCRIPTION,
                &["keyword", "direction"],
            )?,
            title: PromptTemplate::with_slots("title", TITLE, &["keyword", "direction"])?,
            description: PromptTemplate::with_slots("description", DESCRIPTION, &["keyword", "title", "direction"])?,
        })
    }

    pub fn outline(
        &self, keyword: &str, extra: &str, co_terms: &CoTerms, banned: &BannedTerms, min_sections: usize,
        max_sections: usize,
    ) -> Result<String> {
        let extra = if extra.trim().is_empty() { "（指定なし）" } else { extra.trim() };
        let co_terms = bullet_block(co_terms.iter(), "・", "（指定なし）");
        let banned = bullet_block(banned.iter(), "・", "（なし）");
        let min_sections = min_sections.to_string();
        let max_sections = max_sections.to_string();
        self.outline.render(&[
            ("keyword", keyword),
            ("extra", extra),
            ("co_terms", co_terms.as_str()),
            ("banned", banned.as_str()),
            ("min_sections", min_sections.as_str()),
            ("max_sections", max_sections.as_str()),
        ])
    }

    pub fn fill_sections(&self, keyword: &str, structure: &str, need: usize) -> Result<String> {
        let need = need.to_string();
        self.fill_sections.render(&[("keyword", keyword), ("need", need.as_str()), ("structure", structure)])
    }

    pub fn full_article(&self, input: &ArticlePromptInput<'_>) -> Result<String> {
        let policy = input.policy.clone().with_defaults().render(input.keyword);
        let min_chars = input.min_chars.to_string();
        let max_chars = input.max_chars.to_string();
        let co_terms = bullet_block(input.co_terms.iter(), "・", "（任意・無理に詰め込まない）");
        let banned = bullet_block(input.banned.iter(), "・", "（なし）");
        self.full_article.render(&[
            ("keyword", input.keyword),
            ("min_chars", min_chars.as_str()),
            ("max_chars", max_chars.as_str()),
            ("lead_policy", policy.lead.as_str()),
            ("body_policy", policy.body.as_str()),
            ("closing_policy", policy.closing.as_str()),
            ("co_terms", co_terms.as_str()),
            ("banned", banned.as_str()),
            ("readers", input.readers),
            ("needs", input.needs),
            ("structure", input.structure),
        ])
    }

    pub fn append(&self, keyword: &str, co_terms: &CoTerms, current_html: &str, need: usize) -> Result<String> {
        let need = need.to_string();
        let co_terms = bullet_block(co_terms.iter(), "- ", "（なし）");
        self.append.render(&[
            ("keyword", keyword),
            ("need", need.as_str()),
            ("co_terms", co_terms.as_str()),
            ("current_html", current_html),
        ])
    }

    pub fn title_and_description(&self, keyword: &str, direction: &str) -> Result<String> {
        self.title_and_description.render(&[("keyword", keyword), ("direction", direction)])
    }

    pub fn title(&self, keyword: &str, direction: &str) -> Result<String> {
        self.title.render(&[("keyword", keyword), ("direction", direction)])
    }

    pub fn description(&self, keyword: &str, title: &str, direction: &str) -> Result<String> {
        self.description.render(&[("keyword", keyword), ("title", title), ("direction", direction)])
    }
}
