//! Heuristic normalization of ad-hoc markdown.
//!
//! Documentation written outside a markdown editor tends to carry quirks:
//! dialect fence labels (`pgsql`), raw JSON or SQL pasted without fences,
//! box-drawing diagrams, and "label:" lines used as headings. The
//! [`Normalizer`] rewrites these into canonical markdown before parsing.
//!
//! All rules run on fence-protected text, so literal code is never touched.
//! Normalization cannot fail; a rule that finds nothing is a no-op.

pub mod rules;

use serde::{Deserialize, Serialize};

use crate::{
  fence::{
    FenceToken,
    collapse_double_fences,
    extract_fences,
    extract_fences_from,
    restore_fences,
  },
  syntax::LanguageAliases,
};

/// Switches for the individual heuristic families.
///
/// Literal-artifact stripping and label canonicalization always run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct NormalizeOptions {
  /// Fence runs of box-drawing lines as `ascii` diagrams.
  pub diagrams:        bool,
  /// Fence bare `CREATE TABLE` statements and JSON objects.
  pub bare_blocks:     bool,
  /// Promote `Purpose:`-style label lines to headings.
  pub section_labels:  bool,
  /// Rewrite `Key: value` lines as list items.
  pub key_value_lists: bool,
}

impl Default for NormalizeOptions {
  fn default() -> Self {
    Self {
      diagrams:        true,
      bare_blocks:     true,
      section_labels:  true,
      key_value_lists: true,
    }
  }
}

impl NormalizeOptions {
  /// Options with every heuristic family switched off.
  #[must_use]
  pub const fn none() -> Self {
    Self {
      diagrams:        false,
      bare_blocks:     false,
      section_labels:  false,
      key_value_lists: false,
    }
  }
}

/// Applies the normalization rules in order.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
  options: NormalizeOptions,
  aliases: LanguageAliases,
}

impl Normalizer {
  #[must_use]
  pub const fn new(options: NormalizeOptions, aliases: LanguageAliases) -> Self {
    Self { options, aliases }
  }

  #[must_use]
  pub const fn options(&self) -> &NormalizeOptions {
    &self.options
  }

  /// Normalize raw document text into canonical markdown.
  #[must_use]
  pub fn normalize(&self, text: &str) -> String {
    let collapsed = collapse_double_fences(text);
    let (protected, mut tokens) = extract_fences(&collapsed);

    let mut protected = rules::strip_object_artifacts(&protected);
    rules::canonicalize_labels(&mut tokens, &self.aliases);

    if self.options.diagrams {
      protected = rules::fence_diagrams(&protected);
      protected = reextract(&protected, &mut tokens);
    }

    if self.options.bare_blocks {
      protected = rules::fence_create_table(&protected);
      protected = rules::fence_json(&protected);
      protected = reextract(&protected, &mut tokens);
    }

    if self.options.section_labels {
      protected = rules::promote_section_labels(&protected);
    }

    if self.options.key_value_lists {
      protected = rules::key_value_lists(&protected);
    }

    restore_fences(&protected, &tokens)
  }
}

/// Lift fences created by a rule out of the text, continuing the numbering.
fn reextract(text: &str, tokens: &mut Vec<FenceToken>) -> String {
  let next_index = tokens.iter().map(|t| t.index + 1).max().unwrap_or(0);
  let (protected, new_tokens) = extract_fences_from(text, next_index);
  tokens.extend(new_tokens);
  protected
}

/// Normalize with default options and the default alias table.
#[must_use]
pub fn normalize(text: &str) -> String {
  Normalizer::default().normalize(text)
}
