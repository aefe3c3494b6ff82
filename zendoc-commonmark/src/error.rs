//! Error types for document fetching and rendering.
use std::io;

/// Failure to obtain a document's raw text.
///
/// Never escapes the pipeline: every variant is rendered as the error
/// document instead.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
  #[error("Document not found: {0}")]
  NotFound(String),
  #[error("Invalid document path: {0}")]
  InvalidPath(String),
  #[error("Failed to read {path}: {source}")]
  Io {
    path:   String,
    #[source]
    source: io::Error,
  },
}

/// Failure inside a rendering stage.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
  #[error("Malformed content: {0}")]
  MalformedContent(String),
}
