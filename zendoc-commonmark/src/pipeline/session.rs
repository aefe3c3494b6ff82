//! Last-request-wins navigation.
//!
//! Fetching and rendering a document takes time, and the reader may navigate
//! again before it finishes. Every navigation takes a ticket; only the result
//! for the newest ticket is ever surfaced.
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

use super::{source::DocSource, types::Pipeline};
use crate::{
  error::FetchError,
  types::{Document, DocumentId},
};

/// Proof that a navigation was requested, ordered by issue time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTicket {
  sequence: u64,
  id:       DocumentId,
}

impl RenderTicket {
  #[must_use]
  pub const fn sequence(&self) -> u64 {
    self.sequence
  }

  #[must_use]
  pub const fn id(&self) -> &DocumentId {
    &self.id
  }
}

/// Tracks the most recent navigation for one reader.
///
/// Staleness is decided purely by sequence number; no locks are taken.
#[derive(Debug)]
pub struct NavigationSession {
  pipeline: Pipeline,
  latest:   AtomicU64,
}

impl NavigationSession {
  #[must_use]
  pub const fn new(pipeline: Pipeline) -> Self {
    Self {
      pipeline,
      latest: AtomicU64::new(0),
    }
  }

  #[must_use]
  pub const fn pipeline(&self) -> &Pipeline {
    &self.pipeline
  }

  /// Start a navigation, superseding every earlier ticket.
  pub fn begin(&self, id: DocumentId) -> RenderTicket {
    let sequence = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
    RenderTicket { sequence, id }
  }

  /// Whether no newer navigation has begun since `ticket` was issued.
  #[must_use]
  pub fn is_current(&self, ticket: &RenderTicket) -> bool {
    self.latest.load(Ordering::SeqCst) == ticket.sequence
  }

  /// Render the fetched text for `ticket`.
  ///
  /// Returns `None` when a newer navigation has begun, either before or
  /// while rendering; the stale result is discarded.
  #[must_use]
  pub fn complete(
    &self,
    ticket: RenderTicket,
    fetched: Result<String, FetchError>,
  ) -> Option<Document> {
    if !self.is_current(&ticket) {
      debug!(
        "Discarding stale fetch for {} (ticket {})",
        ticket.id, ticket.sequence
      );
      return None;
    }

    let raw = fetched.as_ref().ok().cloned();
    let result = self.pipeline.render_fetched(fetched);

    if !self.is_current(&ticket) {
      debug!(
        "Discarding stale render for {} (ticket {})",
        ticket.id, ticket.sequence
      );
      return None;
    }

    Some(Document {
      id: ticket.id,
      raw,
      result,
    })
  }

  /// Begin, fetch through `source`, and complete in one call.
  #[must_use]
  pub fn load<S>(&self, source: &S, id: DocumentId) -> Option<Document>
  where
    S: DocSource + ?Sized,
  {
    let ticket = self.begin(id);
    let fetched = source.fetch_doc_text(&ticket.id.product, &ticket.id.path());
    self.complete(ticket, fetched)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn session() -> NavigationSession {
    NavigationSession::new(Pipeline::new(
      crate::PipelineConfig::builder().highlight_code(false).build(),
    ))
  }

  #[test]
  fn test_latest_ticket_wins() {
    let session = session();
    let first = session.begin(DocumentId::new("a").with_section("one"));
    let second = session.begin(DocumentId::new("a").with_section("two"));
    assert!(second.sequence() > first.sequence());

    assert!(session.complete(first, Ok("# One".to_string())).is_none());

    let doc = session
      .complete(second, Ok("# Two".to_string()))
      .expect("latest ticket completes");
    assert_eq!(doc.id.path(), "two.md");
    assert_eq!(doc.result.headings[0].text, "Two");
  }

  #[test]
  fn test_fetch_failure_completes_with_error_document() {
    let session = session();
    let ticket = session.begin(DocumentId::new("a"));
    let doc = session
      .complete(ticket, Err(FetchError::NotFound("a/overview.md".into())))
      .expect("current ticket");
    assert!(doc.raw.is_none());
    assert!(doc.result.html.contains("Error loading"));
  }

  #[test]
  fn test_load_uses_document_path() {
    let session = session();
    let source = |product: &str, path: &str| -> Result<String, FetchError> {
      Ok(format!("# {product} {path}"))
    };
    let doc = session
      .load(&source, DocumentId::new("zenrpc"))
      .expect("single navigation");
    assert_eq!(doc.result.headings[0].text, "zenrpc overview.md");
  }
}
