//! Allow-list HTML sanitization.
//!
//! Rendered documents carry author-supplied raw HTML, so nothing the renderer
//! produces is trusted until it has been through the [`Sanitizer`].
use std::{collections::HashSet, sync::LazyLock};

use ammonia::{Builder, UrlRelative};

/// Elements that survive sanitization.
pub const ALLOWED_TAGS: &[&str] = &[
  "h1",
  "h2",
  "h3",
  "h4",
  "h5",
  "h6",
  "p",
  "br",
  "hr",
  "span",
  "div",
  "strong",
  "em",
  "b",
  "i",
  "del",
  "code",
  "ul",
  "ol",
  "li",
  "a",
  "img",
  "pre",
  "blockquote",
  "button",
];

/// Attributes that survive sanitization, on any allowed element.
pub const ALLOWED_ATTRIBUTES: &[&str] =
  &["href", "src", "alt", "title", "id", "class", "target"];

/// URL schemes allowed in `href` and `src`. Relative URLs are always kept.
pub const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Elements removed together with their content.
const DROPPED_WITH_CONTENT: &[&str] = &["script", "style"];

/// A fixed allow-list HTML sanitizer.
///
/// Disallowed elements are unwrapped, keeping their text, except `script`
/// and `style` whose content is dropped. Comments are removed. The result is
/// deterministic and sanitizing twice gives the same output as sanitizing
/// once.
#[derive(Debug)]
pub struct Sanitizer {
  builder: Builder<'static>,
}

impl Sanitizer {
  #[must_use]
  pub fn new() -> Self {
    let mut builder = Builder::empty();
    builder
      .tags(ALLOWED_TAGS.iter().copied().collect::<HashSet<_>>())
      .generic_attributes(ALLOWED_ATTRIBUTES.iter().copied().collect())
      .url_schemes(ALLOWED_URL_SCHEMES.iter().copied().collect())
      .url_relative(UrlRelative::PassThrough)
      .clean_content_tags(DROPPED_WITH_CONTENT.iter().copied().collect())
      .link_rel(None)
      .strip_comments(true);
    Self { builder }
  }

  /// Filter `html` through the allow-list.
  #[must_use]
  pub fn sanitize(&self, html: &str) -> String {
    self.builder.clean(html).to_string()
  }
}

impl Default for Sanitizer {
  fn default() -> Self {
    Self::new()
  }
}

/// Sanitize with the shared default [`Sanitizer`].
#[must_use]
pub fn sanitize(html: &str) -> String {
  static SANITIZER: LazyLock<Sanitizer> = LazyLock::new(Sanitizer::new);
  SANITIZER.sanitize(html)
}
