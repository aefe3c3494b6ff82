//! Document sources.
use std::{
  fs,
  io,
  path::{Component, Path, PathBuf},
};

use crate::error::FetchError;

/// Where raw document text comes from.
pub trait DocSource: Send + Sync {
  /// Fetch the raw text of `path` within `product`.
  ///
  /// # Errors
  ///
  /// Returns a [`FetchError`] when the document cannot be obtained.
  fn fetch_doc_text(&self, product: &str, path: &str)
  -> Result<String, FetchError>;
}

impl<F> DocSource for F
where
  F: Fn(&str, &str) -> Result<String, FetchError> + Send + Sync,
{
  fn fetch_doc_text(
    &self,
    product: &str,
    path: &str,
  ) -> Result<String, FetchError> {
    self(product, path)
  }
}

/// Reads documents from a directory laid out as `<root>/<product>/<path>`.
#[derive(Debug, Clone)]
pub struct FsDocSource {
  root: PathBuf,
}

impl FsDocSource {
  #[must_use]
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  #[must_use]
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Map a product and document path to a file below the root.
  ///
  /// `.md` is appended when missing. Absolute paths, parent-directory
  /// components and backslashes are rejected so a request can never leave
  /// the product directory.
  ///
  /// # Errors
  ///
  /// Returns [`FetchError::InvalidPath`] for any rejected path.
  pub fn resolve(&self, product: &str, path: &str) -> Result<PathBuf, FetchError> {
    let product = product.trim();
    if product.is_empty() || product.contains(['/', '\\']) || product == ".." {
      return Err(FetchError::InvalidPath(product.to_string()));
    }

    let path = path.trim();
    let invalid = || FetchError::InvalidPath(path.to_string());
    if path.is_empty() || path.contains('\\') {
      return Err(invalid());
    }

    let relative = Path::new(path);
    let safe = relative
      .components()
      .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
    if !safe {
      return Err(invalid());
    }

    let mut file = self.root.join(product).join(relative);
    if !path.ends_with(".md") {
      let mut name = file.into_os_string();
      name.push(".md");
      file = PathBuf::from(name);
    }
    Ok(file)
  }
}

impl DocSource for FsDocSource {
  fn fetch_doc_text(
    &self,
    product: &str,
    path: &str,
  ) -> Result<String, FetchError> {
    let file = self.resolve(product, path)?;
    log::debug!("Reading document {}", file.display());

    fs::read_to_string(&file).map_err(|source| {
      if source.kind() == io::ErrorKind::NotFound {
        FetchError::NotFound(format!("{product}/{path}"))
      } else {
        FetchError::Io {
          path: file.display().to_string(),
          source,
        }
      }
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_resolve_appends_extension() {
    let source = FsDocSource::new("/docs");
    assert_eq!(
      source.resolve("zenrpc", "api/users").expect("valid"),
      PathBuf::from("/docs/zenrpc/api/users.md")
    );
    assert_eq!(
      source.resolve("zenrpc", "overview.md").expect("valid"),
      PathBuf::from("/docs/zenrpc/overview.md")
    );
  }

  #[test]
  fn test_resolve_rejects_escapes() {
    let source = FsDocSource::new("/docs");
    for path in ["../secret", "/etc/passwd", "a\\b", "a/../../b", ""] {
      assert!(
        matches!(
          source.resolve("zenrpc", path),
          Err(FetchError::InvalidPath(_))
        ),
        "accepted {path:?}"
      );
    }
    assert!(source.resolve("../x", "a").is_err());
    assert!(source.resolve("a/b", "a").is_err());
  }

  #[test]
  fn test_fetch_missing_and_present() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("zenrpc")).expect("mkdir");
    fs::write(dir.path().join("zenrpc/setup.md"), "# Setup\n").expect("write");

    let source = FsDocSource::new(dir.path());
    assert_eq!(
      source.fetch_doc_text("zenrpc", "setup").expect("present"),
      "# Setup\n"
    );
    assert!(matches!(
      source.fetch_doc_text("zenrpc", "missing"),
      Err(FetchError::NotFound(_))
    ));
  }
}
