//! Rendering with error recovery.
use std::panic::{AssertUnwindSafe, catch_unwind};

use log::error;

use super::types::Pipeline;
use crate::types::RenderResult;

/// Render with error recovery.
///
/// Failures returned by a stage and panics raised inside one are both logged
/// and turned into the pipeline's error document.
#[must_use]
pub fn render_with_recovery(pipeline: &Pipeline, raw: &str) -> RenderResult {
  match catch_unwind(AssertUnwindSafe(|| pipeline.try_render(raw))) {
    Ok(Ok(result)) => result,
    Ok(Err(e)) => {
      error!("Error rendering document: {e}");
      pipeline.error_document(&e.to_string())
    },
    Err(panic_err) => {
      let reason = panic_err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic_err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown error");
      error!("Panic during document rendering: {reason}");
      pipeline.error_document("Internal error while rendering this document")
    },
  }
}

/// Run a text transformation, falling back to the input if it panics.
///
/// Empty input is returned as-is without running `transform`.
pub fn process_safe<F>(content: &str, transform: F) -> String
where
  F: FnOnce(&str) -> String,
{
  if content.is_empty() {
    return String::new();
  }

  match catch_unwind(AssertUnwindSafe(|| transform(content))) {
    Ok(processed) => processed,
    Err(e) => {
      if let Some(msg) = e.downcast_ref::<String>() {
        error!("Error processing markdown: {msg}");
      } else if let Some(msg) = e.downcast_ref::<&str>() {
        error!("Error processing markdown: {msg}");
      } else {
        error!("Unknown error occurred while processing markdown");
      }
      content.to_string()
    },
  }
}
