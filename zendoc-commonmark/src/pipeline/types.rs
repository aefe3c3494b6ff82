//! Configuration and the pipeline type.
//!
//! # Examples
//!
//! ```
//! use zendoc_commonmark::{Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::builder()
//!   .highlight_code(false)
//!   .language_alias("tf", "hcl")
//!   .build();
//!
//! let pipeline = Pipeline::new(config);
//! ```

use std::sync::Arc;

use crate::{
  normalize::{NormalizeOptions, Normalizer},
  render::Renderer,
  sanitize::Sanitizer,
  syntax::LanguageAliases,
};

/// Explicit renderer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
  /// Enable syntax highlighting for code blocks.
  pub highlight_code:   bool,
  /// Alias table shared by fence relabeling and highlighting.
  pub language_aliases: LanguageAliases,
  /// Heuristic families run by the normalizer.
  pub normalize:        NormalizeOptions,
}

impl Default for PipelineConfig {
  fn default() -> Self {
    Self {
      highlight_code:   cfg!(feature = "syntect"),
      language_aliases: LanguageAliases::default(),
      normalize:        NormalizeOptions::default(),
    }
  }
}

impl PipelineConfig {
  #[must_use]
  pub fn builder() -> PipelineConfigBuilder {
    PipelineConfigBuilder::new()
  }
}

/// Builder for constructing `PipelineConfig` with method chaining.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
  config: PipelineConfig,
}

impl PipelineConfigBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Enable or disable syntax highlighting.
  #[must_use]
  pub const fn highlight_code(mut self, enabled: bool) -> Self {
    self.config.highlight_code = enabled;
    self
  }

  /// Replace the whole alias table.
  #[must_use]
  pub fn language_aliases(mut self, aliases: LanguageAliases) -> Self {
    self.config.language_aliases = aliases;
    self
  }

  /// Add a single alias on top of the current table.
  #[must_use]
  pub fn language_alias(mut self, alias: &str, canonical: &str) -> Self {
    self.config.language_aliases.insert(alias, canonical);
    self
  }

  /// Choose which normalization heuristics run.
  #[must_use]
  pub const fn normalize(mut self, options: NormalizeOptions) -> Self {
    self.config.normalize = options;
    self
  }

  /// Build the final `PipelineConfig`.
  #[must_use]
  pub fn build(self) -> PipelineConfig {
    self.config
  }
}

/// The markdown rendering pipeline.
///
/// Holds no per-document state, so one pipeline can render any number of
/// documents from any number of threads. Cloning is cheap apart from the
/// alias tables.
#[derive(Debug, Clone)]
pub struct Pipeline {
  pub(crate) config:     PipelineConfig,
  pub(crate) normalizer: Normalizer,
  pub(crate) renderer:   Renderer,
  pub(crate) sanitizer:  Arc<Sanitizer>,
}
