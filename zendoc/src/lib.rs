//! Expose zendoc's command line internals for use in testing. The rendering
//! pipeline itself lives in `zendoc-commonmark`; depend on that crate instead
//! of this one.
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
