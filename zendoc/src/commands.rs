//! Subcommand implementations, separate from argument parsing.
use std::{fs, path::Path};

use color_eyre::eyre::{Context, Result, bail};
use log::info;
use zendoc_commonmark::{
  DocumentId,
  FsDocSource,
  LanguageAliases,
  NavigationSession,
  Pipeline,
  RenderResult,
  syntax::create_default_manager,
};

use crate::{cli::OutputFormat, config::Config};

/// Build the document address from the CLI's product and optional path.
///
/// The path is split on its first `/` into section and subsection; anything
/// past that stays part of the subsection.
#[must_use]
pub fn document_id(product: &str, path: Option<&str>) -> DocumentId {
  let id = DocumentId::new(product);
  let Some(path) = path.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty())
  else {
    return id;
  };

  match path.split_once('/') {
    Some((section, subsection)) => {
      id.with_section(section).with_subsection(subsection)
    },
    None => id.with_section(path),
  }
}

/// Fetch and render one document from the configured documentation root.
///
/// Fetch and render failures are not errors here: they come back as the
/// rendered error document.
#[must_use]
pub fn render_document(config: &Config, id: DocumentId) -> RenderResult {
  let source = FsDocSource::new(config.docs_root.clone());
  let session =
    NavigationSession::new(Pipeline::new(config.to_pipeline_config()));

  info!("Rendering {id} from {}", config.docs_root.display());
  // a single request is always the latest one
  session
    .load(&source, id)
    .map(|document| document.result)
    .unwrap_or_default()
}

/// Format a render result for output.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_result(
  result: &RenderResult,
  format: OutputFormat,
) -> Result<String> {
  match format {
    OutputFormat::Html => Ok(result.html.clone()),
    OutputFormat::Json => {
      serde_json::to_string_pretty(result)
        .wrap_err("Failed to serialize render result")
    },
  }
}

/// The stylesheet for the highlighter classes in `theme`.
///
/// # Errors
///
/// Returns an error if no highlighting backend is available or the theme is
/// unknown.
pub fn stylesheet(theme: &str) -> Result<String> {
  let manager = create_default_manager(LanguageAliases::default())
    .wrap_err("Syntax highlighting is unavailable")?;
  manager
    .stylesheet(theme)
    .wrap_err_with(|| format!("Failed to generate stylesheet for {theme}"))
}

/// Write a default configuration file.
///
/// # Errors
///
/// Returns an error if the file exists and `force` is not set, or if it
/// cannot be written.
pub fn init(output: &Path, format: &str, force: bool) -> Result<()> {
  if output.exists() && !force {
    bail!(
      "Configuration file already exists: {}. Use --force to overwrite.",
      output.display()
    );
  }

  if let Some(parent) = output.parent()
    && !parent.as_os_str().is_empty()
    && !parent.exists()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
    info!("Created directory: {}", parent.display());
  }

  Config::generate_default_config(format, output).wrap_err_with(|| {
    format!("Failed to generate configuration file: {}", output.display())
  })
}

/// Write `content` to `output`, or to stdout when no file is given.
///
/// # Errors
///
/// Returns an error if the output file cannot be written.
#[allow(clippy::print_stdout, reason = "stdout is the output channel")]
pub fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
  if let Some(path) = output {
    fs::write(path, content)
      .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
  } else {
    println!("{content}");
  }
  Ok(())
}
