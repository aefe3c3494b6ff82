//! # zendoc-commonmark
//!
//! Markdown rendering pipeline for product documentation. Raw, hand-written
//! markdown goes in; sanitized, presentation-ready HTML comes out, along with
//! the heading anchors and code languages found along the way.
//!
//! ## Quick Start
//!
//! ```rust
//! use zendoc_commonmark::{Pipeline, PipelineConfig};
//!
//! let pipeline = Pipeline::new(PipelineConfig::default());
//! let result = pipeline.render("# Hello World\n\n```pgsql\nSELECT 1;\n```");
//!
//! assert!(result.html.contains("id=\"hello-world\""));
//! assert_eq!(result.languages, ["sql"]);
//! ```
//!
//! ## Stages
//!
//! 1. **Fence extraction** ([`fence`]): literal code is lifted out of the
//!    text so no heuristic can touch it.
//! 2. **Normalization** ([`normalize`]): dialect fence labels, bare JSON and
//!    SQL, box-drawing diagrams and label lines become canonical markdown.
//! 3. **Rendering** ([`render`]): comrak plus a DOM pass that emits anchored
//!    headings and highlighted, copy-enabled code blocks.
//! 4. **Sanitization** ([`sanitize`]): a fixed tag and attribute allow-list.
//!
//! The [`Pipeline`] never fails: errors and panics inside a stage, as well as
//! fetch failures, are rendered as an error document.

pub mod error;
pub mod fence;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod sanitize;
pub mod syntax;
mod types;
pub mod utils;

pub use crate::{
  error::{FetchError, RenderError},
  normalize::{NormalizeOptions, Normalizer},
  pipeline::{
    DocSource,
    FsDocSource,
    NavigationSession,
    Pipeline,
    PipelineConfig,
    PipelineConfigBuilder,
    RenderTicket,
  },
  render::InlineContent,
  sanitize::Sanitizer,
  syntax::LanguageAliases,
  types::{DEFAULT_DOCUMENT, Document, DocumentId, Heading, RenderResult},
};
