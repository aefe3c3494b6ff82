use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command line interface for zendoc
#[derive(Parser, Debug)]
#[command(author, version, about = "zendoc: product documentation renderer")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Later files override earlier ones.
  #[arg(
    short = 'c',
    long = "config-file",
    global = true,
    action = clap::ArgAction::Append
  )]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// Shape of the `render` output.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
  /// The sanitized HTML fragment only
  #[default]
  Html,
  /// The full render result: html, headings and languages
  Json,
}

/// All supported subcommands for the zendoc CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Fetch and render one document.
  Render {
    /// Product the document belongs to.
    product: String,

    /// Document path within the product (defaults to the overview).
    path: Option<String>,

    /// Documentation root directory, overriding `docs_root`.
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
    format: OutputFormat,

    /// Write to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Render code blocks without syntax highlighting.
    #[arg(long = "no-highlight")]
    no_highlight: bool,
  },

  /// Print the stylesheet matching the highlighter's classes.
  Stylesheet {
    /// Highlighting theme, overriding `highlight_theme`.
    #[arg(short, long)]
    theme: Option<String>,

    /// Write to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
  },

  /// Initialize a new zendoc configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "zendoc.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
