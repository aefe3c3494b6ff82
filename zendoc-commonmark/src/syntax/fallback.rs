//! Escaped-text fallback for code that could not be highlighted.

use crate::utils::escape_html;

/// Code that could not be highlighted.
///
/// Carries the raw code so the caller can still render it, escaped, as plain
/// text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unhighlighted {
  code: String,
}

impl Unhighlighted {
  #[must_use]
  pub fn new(code: &str) -> Self {
    Self {
      code: code.to_string(),
    }
  }

  /// The raw, unescaped code.
  #[must_use]
  pub fn code(&self) -> &str {
    &self.code
  }

  /// The code with `& < > " '` escaped.
  #[must_use]
  pub fn into_escaped(self) -> String {
    escape_html(&self.code)
  }
}

/// Collapse a highlighting result into markup.
pub trait HighlightFallback {
  /// Highlighted markup on success, escaped plain text otherwise.
  fn or_escaped(self) -> String;
}

impl HighlightFallback for Result<String, Unhighlighted> {
  fn or_escaped(self) -> String {
    self.unwrap_or_else(Unhighlighted::into_escaped)
  }
}
