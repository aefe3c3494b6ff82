//! Pipeline orchestration.
//!
//! - [`types`]: `PipelineConfig`, its builder and the `Pipeline` type
//! - [`core`]: stage sequencing and the error document
//! - [`process`]: rendering with panic and error recovery
//! - [`session`]: last-request-wins navigation
//! - [`source`]: the document fetch collaborator
pub mod core;
pub mod process;
pub mod session;
pub mod source;
pub mod types;

pub use core::ERROR_TITLE;

pub use process::{process_safe, render_with_recovery};
pub use session::{NavigationSession, RenderTicket};
pub use source::{DocSource, FsDocSource};
pub use types::{Pipeline, PipelineConfig, PipelineConfigBuilder};

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::FetchError;

  fn pipeline() -> Pipeline {
    Pipeline::new(PipelineConfig::builder().highlight_code(false).build())
  }

  #[test]
  fn test_render_is_sanitized() {
    let result = pipeline().render("Hi <script>alert(1)</script> there\n");
    assert!(!result.html.contains("script"));
    assert!(!result.html.contains("alert"));
    assert!(result.html.contains("Hi"));
  }

  #[test]
  fn test_render_fetched_error() {
    let result = pipeline()
      .render_fetched(Err(FetchError::InvalidPath("../x".to_string())));
    assert!(result.html.contains(ERROR_TITLE));
    assert!(result.html.contains("Invalid document path: ../x"));
    assert!(result.headings.is_empty());
  }

  #[test]
  fn test_error_document_escapes_reason() {
    let result = pipeline().error_document("<img src=x onerror=alert(1)>");
    assert!(!result.html.contains("<img"));
    assert!(result.html.contains("&lt;img"));
  }

  #[test]
  fn test_default_config() {
    let config = PipelineConfig::default();
    assert_eq!(config.highlight_code, cfg!(feature = "syntect"));
    assert_eq!(config.language_aliases.resolve("pgsql"), "sql");
  }
}
