//! Core implementation of the pipeline: stage sequencing and error
//! documents.
use std::sync::Arc;

use log::{debug, warn};

use super::{
  process::{process_safe, render_with_recovery},
  types::{Pipeline, PipelineConfig},
};
use crate::{
  error::{FetchError, RenderError},
  normalize::Normalizer,
  render::Renderer,
  sanitize::Sanitizer,
  syntax::{SyntaxManager, create_default_manager},
  types::RenderResult,
  utils::escape_html,
};

/// Heading of the document shown in place of content that failed to load.
pub const ERROR_TITLE: &str = "Error loading documentation content";

impl Pipeline {
  /// Create a new `Pipeline` with the given configuration.
  #[must_use]
  pub fn new(config: PipelineConfig) -> Self {
    let highlighter = if config.highlight_code {
      match create_default_manager(config.language_aliases.clone()) {
        Ok(manager) => Some(Arc::new(manager)),
        Err(e) => {
          warn!("Syntax highlighting disabled: {e}");
          None
        },
      }
    } else {
      None
    };

    let normalizer =
      Normalizer::new(config.normalize, config.language_aliases.clone());
    let renderer = Renderer::new(highlighter, config.language_aliases.clone());

    Self {
      config,
      normalizer,
      renderer,
      sanitizer: Arc::new(Sanitizer::new()),
    }
  }

  #[must_use]
  pub const fn config(&self) -> &PipelineConfig {
    &self.config
  }

  /// The active highlighter, if highlighting is enabled and available.
  #[must_use]
  pub fn highlighter(&self) -> Option<&SyntaxManager> {
    self.renderer.highlighter()
  }

  /// Render raw document text.
  ///
  /// Never fails: any stage failure, including a panic, yields the error
  /// document instead.
  #[must_use]
  pub fn render(&self, raw: &str) -> RenderResult {
    render_with_recovery(self, raw)
  }

  /// Render a fetch outcome, mapping fetch failures to the error document.
  #[must_use]
  pub fn render_fetched(
    &self,
    fetched: Result<String, FetchError>,
  ) -> RenderResult {
    match fetched {
      Ok(raw) => self.render(&raw),
      Err(e) => {
        warn!("Failed to fetch document: {e}");
        self.error_document(&e.to_string())
      },
    }
  }

  /// Run every stage, surfacing the first failure.
  ///
  /// # Errors
  ///
  /// Returns [`RenderError::MalformedContent`] if the renderer cannot process
  /// the normalized text.
  pub fn try_render(&self, raw: &str) -> Result<RenderResult, RenderError> {
    // a panicking heuristic degrades to rendering the text as written
    let normalized = process_safe(raw, |text| self.normalizer.normalize(text));
    let rendered = self.renderer.render(&normalized)?;
    debug!(
      "Rendered {} headings, {} code languages",
      rendered.headings.len(),
      rendered.languages.len()
    );

    Ok(RenderResult {
      html: self.sanitizer.sanitize(&rendered.html),
      ..rendered
    })
  }

  /// The fixed error document, with `reason` shown below the title.
  #[must_use]
  pub fn error_document(&self, reason: &str) -> RenderResult {
    let html = format!(
      "<div class=\"doc-error\"><h1>{ERROR_TITLE}</h1><p>{}</p></div>",
      escape_html(reason)
    );
    RenderResult {
      html:      self.sanitizer.sanitize(&html),
      headings:  Vec::new(),
      languages: Vec::new(),
    }
  }
}

impl Default for Pipeline {
  fn default() -> Self {
    Self::new(PipelineConfig::default())
  }
}
