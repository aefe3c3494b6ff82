//! Types for zendoc-commonmark public API and internal use.
use serde::{Deserialize, Serialize};

/// Fetch path used when a document is requested without a section.
pub const DEFAULT_DOCUMENT: &str = "overview.md";

/// A heading in a rendered document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Heading {
  /// Heading level (1-6).
  pub level: u8,
  /// Heading text with all markup stripped.
  pub text:  String,
  /// Anchor ID, unique within the document.
  pub slug:  String,
}

/// Result of rendering one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderResult {
  /// Sanitized HTML output.
  pub html: String,

  /// Headings in document order (for `ToC`, navigation, etc).
  pub headings: Vec<Heading>,

  /// Resolved code block languages in order of first appearance.
  pub languages: Vec<String>,
}

impl RenderResult {
  /// Text of the first level-1 heading, if any.
  #[must_use]
  pub fn title(&self) -> Option<&str> {
    self
      .headings
      .iter()
      .find(|heading| heading.level == 1)
      .map(|heading| heading.text.as_str())
  }
}

/// Identifies a documentation file within a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId {
  pub product:    String,
  pub section:    Option<String>,
  pub subsection: Option<String>,
}

impl DocumentId {
  #[must_use]
  pub fn new(product: impl Into<String>) -> Self {
    Self {
      product:    product.into(),
      section:    None,
      subsection: None,
    }
  }

  #[must_use]
  pub fn with_section(mut self, section: impl Into<String>) -> Self {
    self.section = Some(section.into());
    self
  }

  #[must_use]
  pub fn with_subsection(mut self, subsection: impl Into<String>) -> Self {
    self.subsection = Some(subsection.into());
    self
  }

  /// Path of the document relative to its product directory.
  ///
  /// `section` or `section/subsection`, with `.md` appended when missing.
  /// Without a section this is [`DEFAULT_DOCUMENT`].
  #[must_use]
  pub fn path(&self) -> String {
    let section = self
      .section
      .as_deref()
      .map(|s| s.trim_matches('/'))
      .filter(|s| !s.is_empty());

    let Some(section) = section else {
      return DEFAULT_DOCUMENT.to_string();
    };

    let mut path = match self
      .subsection
      .as_deref()
      .map(|s| s.trim_matches('/'))
      .filter(|s| !s.is_empty())
    {
      Some(subsection) => format!("{section}/{subsection}"),
      None => section.to_string(),
    };

    if !path.ends_with(".md") {
      path.push_str(".md");
    }
    path
  }
}

impl std::fmt::Display for DocumentId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}/{}", self.product, self.path())
  }
}

/// A fetched document and its rendering.
///
/// Replaced wholesale on every navigation; never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
  pub id:     DocumentId,
  /// Raw text as fetched, or `None` when the fetch failed.
  pub raw:    Option<String>,
  pub result: RenderResult,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_document_path() {
    assert_eq!(DocumentId::new("zenrpc").path(), "overview.md");
    assert_eq!(
      DocumentId::new("zenrpc").with_section("api").path(),
      "api.md"
    );
    assert_eq!(
      DocumentId::new("zenrpc")
        .with_section("api")
        .with_subsection("users.md")
        .path(),
      "api/users.md"
    );
    assert_eq!(
      DocumentId::new("zenrpc").with_section("/").path(),
      "overview.md"
    );
  }

  #[test]
  fn test_document_id_display() {
    let id = DocumentId::new("zenrpc").with_section("setup");
    assert_eq!(id.to_string(), "zenrpc/setup.md");
  }

  #[test]
  fn test_title_is_first_h1() {
    let result = RenderResult {
      html:      String::new(),
      headings:  vec![
        Heading {
          level: 2,
          text:  "Intro".into(),
          slug:  "intro".into(),
        },
        Heading {
          level: 1,
          text:  "Guide".into(),
          slug:  "guide".into(),
        },
      ],
      languages: Vec::new(),
    };
    assert_eq!(result.title(), Some("Guide"));
  }
}
