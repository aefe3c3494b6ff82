use std::io;

use thiserror::Error;

/// Error type for loading and writing zendoc configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Unsupported config format: {0}")]
  UnsupportedFormat(String),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),
}
