//! Provides a trait-based architecture for syntax highlighting that allows
//! the backend to be swapped out.
//!
//! Currently supported backends:
//! - **Syntect** - Uses Sublime Text syntax definitions, with two-face added
//!   for extended syntax definitions and themes
//!
//! Highlighted markup uses `hl-` prefixed scope classes; the colours live in a
//! stylesheet produced by [`SyntaxManager::stylesheet`].

pub mod error;
pub mod fallback;
pub mod types;

pub use error::{SyntaxError, SyntaxResult};
pub use fallback::{HighlightFallback, Unhighlighted};
pub use types::{LanguageAliases, SyntaxHighlighter, SyntaxManager};

/// Prefix applied to every class emitted by a highlighter.
pub const CLASS_PREFIX: &str = "hl-";

#[cfg(feature = "syntect")] mod syntect;
#[cfg(feature = "syntect")] pub use syntect::*;

/// Create the default syntax manager based on available features.
///
/// # Errors
///
/// Returns [`SyntaxError::NoBackendAvailable`] when the crate was built
/// without a highlighting backend.
pub fn create_default_manager(
  aliases: LanguageAliases,
) -> SyntaxResult<SyntaxManager> {
  #[cfg(feature = "syntect")]
  {
    create_syntect_manager(aliases)
  }

  #[cfg(not(feature = "syntect"))]
  {
    let _ = aliases;
    Err(SyntaxError::NoBackendAvailable)
  }
}
