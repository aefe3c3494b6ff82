pub mod codeblock;

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;

/// Slug used when a heading has no word characters at all.
pub const EMPTY_SLUG: &str = "section";

/// Slugify a string for use as an anchor ID.
///
/// Lowercases the text, collapses every run of non-word characters (anything
/// outside `[A-Za-z0-9_]`) into a single dash and trims leading/trailing
/// dashes. HTML must already have been stripped by the caller.
#[must_use]
pub fn slugify(text: &str) -> String {
  static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-z0-9_]+").unwrap_or_else(|e| {
      log::error!("Failed to compile NON_WORD_RE regex: {e}");
      never_matching_regex()
    })
  });

  let lowered = text.to_lowercase();
  NON_WORD_RE
    .replace_all(&lowered, "-")
    .trim_matches('-')
    .to_string()
}

/// Hands out unique slugs within a single document.
///
/// The first heading to claim a slug keeps it; later collisions get `-2`,
/// `-3`, ... appended in document order. Suffixed slugs are themselves
/// reserved, so a literal "Intro 2" heading after two "Intro" headings becomes
/// `intro-2-2` rather than colliding.
#[derive(Debug, Default, Clone)]
pub struct SlugRegistry {
  seen: HashMap<String, usize>,
}

impl SlugRegistry {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Derive a slug from already-plain text and make it unique.
  pub fn claim(&mut self, text: &str) -> String {
    let base = slugify(text);
    let base = if base.is_empty() {
      EMPTY_SLUG.to_string()
    } else {
      base
    };

    if !self.seen.contains_key(&base) {
      self.seen.insert(base.clone(), 1);
      return base;
    }

    let mut n = self.seen.get(&base).copied().unwrap_or(1);
    loop {
      n += 1;
      let candidate = format!("{base}-{n}");
      if !self.seen.contains_key(&candidate) {
        self.seen.insert(base, n);
        self.seen.insert(candidate.clone(), 1);
        return candidate;
      }
    }
  }
}

/// True for characters in the Unicode box-drawing block (U+2500..U+257F).
#[must_use]
pub const fn is_box_drawing(c: char) -> bool {
  matches!(c, '\u{2500}'..='\u{257F}')
}

/// True if the text contains at least one box-drawing character.
#[must_use]
pub fn contains_box_drawing(text: &str) -> bool {
  text.chars().any(is_box_drawing)
}

/// Escape the five HTML-special characters (`& < > " '`).
#[must_use]
pub fn escape_html(text: &str) -> String {
  html_escape::encode_quoted_attribute(text).into_owned()
}

/// Create a regex that never matches anything.
///
/// This is used as a fallback pattern when a regex fails to compile, so a bad
/// pattern degrades a heuristic into a no-op instead of aborting a render.
///
/// # Panics
///
/// Panics if the fallback regex pattern `r"^\b$"` fails to compile, which
/// should never happen.
#[must_use]
#[allow(clippy::unwrap_used, reason = "pattern is a known-valid literal")]
pub fn never_matching_regex() -> Regex {
  Regex::new(r"[^\s\S]").unwrap_or_else(|_| Regex::new(r"^\b$").unwrap())
}
