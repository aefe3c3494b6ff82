//! Core types and traits for syntax highlighting.

use std::{
  collections::HashMap,
  panic::{AssertUnwindSafe, catch_unwind},
};

use super::{
  error::{SyntaxError, SyntaxResult},
  fallback::Unhighlighted,
};

/// Trait for syntax highlighting backends.
///
/// Implementations emit class-based markup (`<span class="...">`) rather than
/// inline styles, so the output survives attribute allow-lists. Colours are
/// supplied separately by [`SyntaxHighlighter::stylesheet`].
pub trait SyntaxHighlighter: Send + Sync {
  /// Get the name of this highlighter backend
  fn name(&self) -> &'static str;

  /// Get a list of supported languages
  fn supported_languages(&self) -> Vec<String>;

  /// Names accepted by [`SyntaxHighlighter::stylesheet`], sorted
  fn available_themes(&self) -> Vec<String>;

  /// Check if a language is supported
  fn supports_language(&self, language: &str) -> bool {
    self
      .supported_languages()
      .iter()
      .any(|lang| lang.eq_ignore_ascii_case(language))
  }

  /// Highlight code in the given (already canonical) language.
  ///
  /// Returns the inner markup of a `<code>` element; the caller supplies the
  /// surrounding `<pre><code>`.
  fn highlight(&self, code: &str, language: &str) -> SyntaxResult<String>;

  /// CSS for the classes emitted by [`SyntaxHighlighter::highlight`].
  fn stylesheet(&self, theme: &str) -> SyntaxResult<String>;
}

/// Mapping from non-standard language labels to canonical language names.
///
/// Lookups are case-insensitive. The same table drives fence relabeling in the
/// normalizer and language resolution in the highlighter, so a block labelled
/// `pgsql` is both shown and highlighted as `sql`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageAliases {
  aliases: HashMap<String, String>,
}

impl LanguageAliases {
  /// A table with no aliases at all.
  #[must_use]
  pub fn empty() -> Self {
    Self {
      aliases: HashMap::new(),
    }
  }

  /// Add (or replace) an alias.
  pub fn insert(&mut self, alias: &str, canonical: &str) {
    self.aliases.insert(
      alias.trim().to_lowercase(),
      canonical.trim().to_lowercase(),
    );
  }

  /// Canonical name for `language`, lowercased.
  ///
  /// Unknown labels are returned lowercased but otherwise unchanged.
  #[must_use]
  pub fn resolve(&self, language: &str) -> String {
    let lowered = language.trim().to_lowercase();
    self.aliases.get(&lowered).cloned().unwrap_or(lowered)
  }

  /// Whether `language` would be rewritten by [`LanguageAliases::resolve`].
  #[must_use]
  pub fn is_alias(&self, language: &str) -> bool {
    self.aliases.contains_key(&language.trim().to_lowercase())
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.aliases.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.aliases.is_empty()
  }
}

impl Default for LanguageAliases {
  fn default() -> Self {
    let mut aliases = Self::empty();

    // SQL dialect labels
    aliases.insert("pgsql", "sql");
    aliases.insert("postgresql", "sql");
    aliases.insert("postgres", "sql");

    // JSON supersets
    aliases.insert("jsonc", "json");
    aliases.insert("json5", "json");

    // Common aliases
    aliases.insert("js", "javascript");
    aliases.insert("ts", "typescript");
    aliases.insert("py", "python");
    aliases.insert("rb", "ruby");
    aliases.insert("sh", "bash");
    aliases.insert("shell", "bash");
    aliases.insert("yml", "yaml");
    aliases.insert("md", "markdown");

    aliases
  }
}

impl<K, V> Extend<(K, V)> for LanguageAliases
where
  K: AsRef<str>,
  V: AsRef<str>,
{
  fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
    for (alias, canonical) in iter {
      self.insert(alias.as_ref(), canonical.as_ref());
    }
  }
}

/// High-level syntax highlighting manager.
///
/// Pairs a backend with the alias table and turns every backend failure,
/// including a panic inside the backend, into an [`Unhighlighted`] value.
pub struct SyntaxManager {
  highlighter: Box<dyn SyntaxHighlighter>,
  aliases:     LanguageAliases,
}

impl std::fmt::Debug for SyntaxManager {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SyntaxManager")
      .field("highlighter", &self.highlighter.name())
      .field("aliases", &self.aliases.len())
      .finish()
  }
}

impl SyntaxManager {
  /// Create a new syntax manager with the given highlighter and aliases
  #[must_use]
  pub fn new(
    highlighter: Box<dyn SyntaxHighlighter>,
    aliases: LanguageAliases,
  ) -> Self {
    Self {
      highlighter,
      aliases,
    }
  }

  /// Create a new syntax manager with the default alias table
  #[must_use]
  pub fn with_highlighter(highlighter: Box<dyn SyntaxHighlighter>) -> Self {
    Self::new(highlighter, LanguageAliases::default())
  }

  /// Get the underlying highlighter
  #[must_use]
  pub fn highlighter(&self) -> &dyn SyntaxHighlighter {
    self.highlighter.as_ref()
  }

  #[must_use]
  pub const fn aliases(&self) -> &LanguageAliases {
    &self.aliases
  }

  /// Resolve a language name using aliases
  #[must_use]
  pub fn resolve_language(&self, language: &str) -> String {
    self.aliases.resolve(language)
  }

  /// Highlight code with alias resolution.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::UnsupportedLanguage`] when the backend has no
  /// grammar for the resolved language, or the backend's own error.
  pub fn highlight_code(
    &self,
    code: &str,
    language: &str,
  ) -> SyntaxResult<String> {
    let resolved = self.resolve_language(language);
    if !self.highlighter.supports_language(&resolved) {
      return Err(SyntaxError::UnsupportedLanguage(resolved));
    }
    self.highlighter.highlight(code, &resolved)
  }

  /// Highlight code, never failing hard.
  ///
  /// # Errors
  ///
  /// Returns [`Unhighlighted`] carrying the raw code when highlighting is not
  /// possible; callers turn it into escaped text with
  /// [`HighlightFallback::or_escaped`](super::HighlightFallback::or_escaped).
  pub fn highlight(
    &self,
    code: &str,
    language: &str,
  ) -> Result<String, Unhighlighted> {
    let attempt =
      catch_unwind(AssertUnwindSafe(|| self.highlight_code(code, language)));

    match attempt {
      Ok(Ok(html)) => Ok(html),
      Ok(Err(SyntaxError::UnsupportedLanguage(lang))) => {
        log::debug!("No grammar for '{lang}', rendering code unhighlighted");
        Err(Unhighlighted::new(code))
      },
      Ok(Err(e)) => {
        log::warn!("Syntax highlighting failed for '{language}': {e}");
        Err(Unhighlighted::new(code))
      },
      Err(_) => {
        log::error!(
          "Syntax highlighter panicked on a '{language}' block, rendering \
           code unhighlighted"
        );
        Err(Unhighlighted::new(code))
      },
    }
  }

  /// Stylesheet for the highlighter classes in the given theme.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::ThemeNotFound`] for an unknown theme.
  pub fn stylesheet(&self, theme: &str) -> SyntaxResult<String> {
    self.highlighter.stylesheet(theme)
  }
}
