//! Inline content model shared by the emitters.
use std::sync::LazyLock;

use regex::Regex;

use crate::utils::{escape_html, never_matching_regex};

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"<[^>]*>").unwrap_or_else(|e| {
    log::error!("Failed to compile TAG_RE regex: {e}");
    never_matching_regex()
  })
});

/// Content handed to an emitter.
///
/// The markdown parser may hand over either plain text or already-rendered
/// inline markup (emphasis, links, inline code). Both are resolved the same
/// way, so emitters never have to guess which one they received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineContent {
  /// Unescaped text.
  PlainText(String),
  /// Rendered inline HTML.
  InlineFragment(String),
}

impl InlineContent {
  /// The content as plain text.
  ///
  /// Fragments have their tags stripped and entities decoded.
  #[must_use]
  pub fn resolve_to_text(&self) -> String {
    match self {
      Self::PlainText(text) => text.clone(),
      Self::InlineFragment(html) => {
        let stripped = TAG_RE.replace_all(html, "");
        html_escape::decode_html_entities(&stripped).into_owned()
      },
    }
  }

  /// The content as HTML.
  ///
  /// Plain text is escaped; fragments are returned as-is.
  #[must_use]
  pub fn to_html(&self) -> String {
    match self {
      Self::PlainText(text) => escape_html(text),
      Self::InlineFragment(html) => html.clone(),
    }
  }
}

impl From<&str> for InlineContent {
  fn from(text: &str) -> Self {
    Self::PlainText(text.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_resolve_plain_text() {
    let content = InlineContent::from("a < b");
    assert_eq!(content.resolve_to_text(), "a < b");
    assert_eq!(content.to_html(), "a &lt; b");
  }

  #[test]
  fn test_resolve_fragment() {
    let content = InlineContent::InlineFragment(
      "Use <code>Vec&lt;T&gt;</code> &amp; <em>friends</em>".to_string(),
    );
    assert_eq!(content.resolve_to_text(), "Use Vec<T> & friends");
    assert!(content.to_html().contains("<em>friends</em>"));
  }
}
