//! Syntect-based syntax highlighting backend enhanced with two-face.
//!
//! Grammars come from two-face's extended syntax set (the one bundled with
//! the Bat pager), so SQL, JSON, TypeScript and friends are all available.
//! Output is class-based; [`SyntectHighlighter::stylesheet`] renders the
//! colours for any bundled theme.

use std::sync::OnceLock;

use syntect::{
  highlighting::Theme,
  html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style},
  parsing::SyntaxSet,
  util::LinesWithEndings,
};
use two_face::{
  re_exports::syntect::highlighting::ThemeSet,
  theme::{EmbeddedLazyThemeSet, EmbeddedThemeName},
};

use super::{
  CLASS_PREFIX,
  error::{SyntaxError, SyntaxResult},
  types::{LanguageAliases, SyntaxHighlighter, SyntaxManager},
};

/// Theme used when none is configured.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed {
  prefix: CLASS_PREFIX,
};

const EMBEDDED_THEMES: [(&str, EmbeddedThemeName); 29] = [
  ("Ansi", EmbeddedThemeName::Ansi),
  ("Base16", EmbeddedThemeName::Base16),
  ("Base16EightiesDark", EmbeddedThemeName::Base16EightiesDark),
  ("Base16MochaDark", EmbeddedThemeName::Base16MochaDark),
  ("Base16OceanDark", EmbeddedThemeName::Base16OceanDark),
  ("Base16OceanLight", EmbeddedThemeName::Base16OceanLight),
  ("Base16_256", EmbeddedThemeName::Base16_256),
  ("ColdarkCold", EmbeddedThemeName::ColdarkCold),
  ("ColdarkDark", EmbeddedThemeName::ColdarkDark),
  ("DarkNeon", EmbeddedThemeName::DarkNeon),
  ("Dracula", EmbeddedThemeName::Dracula),
  ("Github", EmbeddedThemeName::Github),
  ("GruvboxDark", EmbeddedThemeName::GruvboxDark),
  ("GruvboxLight", EmbeddedThemeName::GruvboxLight),
  ("InspiredGithub", EmbeddedThemeName::InspiredGithub),
  ("Leet", EmbeddedThemeName::Leet),
  ("MonokaiExtended", EmbeddedThemeName::MonokaiExtended),
  ("MonokaiExtendedBright", EmbeddedThemeName::MonokaiExtendedBright),
  ("MonokaiExtendedLight", EmbeddedThemeName::MonokaiExtendedLight),
  ("MonokaiExtendedOrigin", EmbeddedThemeName::MonokaiExtendedOrigin),
  ("Nord", EmbeddedThemeName::Nord),
  ("OneHalfDark", EmbeddedThemeName::OneHalfDark),
  ("OneHalfLight", EmbeddedThemeName::OneHalfLight),
  ("SolarizedDark", EmbeddedThemeName::SolarizedDark),
  ("SolarizedLight", EmbeddedThemeName::SolarizedLight),
  ("SublimeSnazzy", EmbeddedThemeName::SublimeSnazzy),
  ("TwoDark", EmbeddedThemeName::TwoDark),
  ("VisualStudioDarkPlus", EmbeddedThemeName::VisualStudioDarkPlus),
  ("Zenburn", EmbeddedThemeName::Zenburn),
];

/// Syntect-based syntax highlighter
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntectHighlighter;

impl SyntectHighlighter {
  #[must_use]
  pub const fn new() -> Self {
    Self
  }

  /// Get the syntect SyntaxSet.
  fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(two_face::syntax::extra_newlines)
  }

  /// Get the syntect ThemeSet with extended themes.
  fn theme_set() -> &'static EmbeddedLazyThemeSet {
    static THEME_SET: OnceLock<EmbeddedLazyThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(two_face::theme::extra)
  }

  /// Get the default syntect ThemeSet.
  fn default_theme_set() -> &'static ThemeSet {
    static DEFAULT_THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    DEFAULT_THEME_SET.get_or_init(ThemeSet::load_defaults)
  }

  /// Look a theme up by name, ignoring case, syntect's own themes first.
  fn get_theme(name: &str) -> Option<&'static Theme> {
    let builtin = Self::default_theme_set()
      .themes
      .iter()
      .find(|(builtin_name, _)| builtin_name.eq_ignore_ascii_case(name))
      .map(|(_, theme)| theme);
    if builtin.is_some() {
      return builtin;
    }

    EMBEDDED_THEMES
      .into_iter()
      .find(|(embedded_name, _)| embedded_name.eq_ignore_ascii_case(name))
      .map(|(_, embedded)| Self::theme_set().get(embedded))
  }
}

impl SyntaxHighlighter for SyntectHighlighter {
  fn name(&self) -> &'static str {
    "Syntect"
  }

  fn supported_languages(&self) -> Vec<String> {
    Self::syntax_set()
      .syntaxes()
      .iter()
      .flat_map(|syntax| {
        std::iter::once(syntax.name.to_lowercase())
          .chain(syntax.file_extensions.iter().map(|ext| ext.to_lowercase()))
      })
      .collect()
  }

  fn supports_language(&self, language: &str) -> bool {
    Self::syntax_set().find_syntax_by_token(language).is_some()
  }

  fn available_themes(&self) -> Vec<String> {
    let mut themes: Vec<String> =
      Self::default_theme_set().themes.keys().cloned().collect();
    themes.extend(EMBEDDED_THEMES.iter().map(|(name, _)| (*name).to_string()));
    themes.sort();
    themes.dedup();
    themes
  }

  fn highlight(&self, code: &str, language: &str) -> SyntaxResult<String> {
    let syntax_set = Self::syntax_set();
    let syntax = syntax_set
      .find_syntax_by_token(language)
      .ok_or_else(|| SyntaxError::UnsupportedLanguage(language.to_string()))?;

    let mut generator =
      ClassedHTMLGenerator::new_with_class_style(syntax, syntax_set, CLASS_STYLE);
    for line in LinesWithEndings::from(code) {
      generator
        .parse_html_for_line_which_includes_newline(line)
        .map_err(|e| SyntaxError::HighlightingFailed(e.to_string()))?;
    }

    Ok(generator.finalize())
  }

  fn stylesheet(&self, theme: &str) -> SyntaxResult<String> {
    let Some(found) = Self::get_theme(theme) else {
      return Err(SyntaxError::ThemeNotFound {
        theme:     theme.to_string(),
        available: self.available_themes(),
      });
    };
    css_for_theme_with_class_style(found, CLASS_STYLE)
      .map_err(|e| SyntaxError::BackendError(e.to_string()))
  }
}

/// Create a Syntect-based syntax manager with the given alias table.
///
/// # Errors
///
/// Currently infallible; the signature matches the other manager
/// constructors.
pub fn create_syntect_manager(
  aliases: LanguageAliases,
) -> SyntaxResult<SyntaxManager> {
  Ok(SyntaxManager::new(Box::new(SyntectHighlighter::new()), aliases))
}
