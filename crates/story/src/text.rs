//! Scene body text.
//!
//! Scene prose is persisted as markup (`<p>..</p>` paragraphs with inline
//! formatting) so stored documents stay readable by older builds. Editors never
//! bind to the markup directly: they read [`SceneText::plain_text`] or the raw
//! [`SceneText::markup`], work on their own buffer, and hand back a whole new
//! value at commit time.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static BLOCK_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(p|div|li|h[1-6]|blockquote)\s*>").expect("valid regex")
});
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("valid regex"));

pub const EMPTY_SCENE_MARKUP: &str = "<p></p>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneText(String);

impl SceneText {
    pub fn from_markup(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    /// Builds markup from plain text: each non-empty line becomes a paragraph.
    pub fn from_plain(text: &str) -> Self {
        let paragraphs: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| format!("<p>{}</p>", escape(line)))
            .collect();
        if paragraphs.is_empty() {
            Self::default()
        } else {
            Self(paragraphs.concat())
        }
    }

    pub fn markup(&self) -> &str {
        &self.0
    }

    pub fn plain_text(&self) -> String {
        plain_text(&self.0)
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.0)
    }

    pub fn is_blank(&self) -> bool {
        self.plain_text().trim().is_empty()
    }
}

impl Default for SceneText {
    fn default() -> Self {
        Self(EMPTY_SCENE_MARKUP.to_string())
    }
}

/// Strips tags and decodes the handful of entities an editor emits.
/// Block boundaries become line breaks; inline tags vanish without a gap.
pub fn plain_text(markup: &str) -> String {
    let with_breaks = BLOCK_BREAK.replace_all(markup, "\n");
    let stripped = TAG.replace_all(&with_breaks, "");
    unescape(&stripped)
}

/// Counts word-boundary tokens in the plain-text rendering of `markup`.
/// Unlike counting over a flat tag strip, adjacent paragraphs never merge
/// (`<p>one</p><p>two</p>` is 2) and `\w` is Unicode (`naïve` is 1).
pub fn word_count(markup: &str) -> usize {
    WORD.find_iter(plain_text(markup).trim()).count()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    // &amp; last so "&amp;lt;" decodes to "&lt;" rather than "<"
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
