pub mod templates;

use std::{
  collections::HashMap,
  fs,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use zendoc_commonmark::{NormalizeOptions, PipelineConfig};

use crate::{cli::Commands, error::ConfigError};

/// File names probed, in order, in the working directory.
const CONFIG_FILENAMES: [&str; 4] = [
  "zendoc.toml",
  "zendoc.json",
  ".zendoc.toml",
  ".config/zendoc.toml",
];

fn default_docs_root() -> PathBuf {
  PathBuf::from("docs")
}

fn default_highlight_theme() -> String {
  zendoc_commonmark::syntax::DEFAULT_THEME.to_string()
}

const fn default_true() -> bool {
  true
}

/// Configuration options for zendoc
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
  /// Directory laid out as `<docs_root>/<product>/<path>.md`
  #[serde(default = "default_docs_root")]
  pub docs_root: PathBuf,

  /// Whether to highlight fenced code blocks
  #[serde(default = "default_true")]
  pub highlight_code: bool,

  /// Theme for generated highlighter stylesheets
  #[serde(default = "default_highlight_theme")]
  pub highlight_theme: String,

  /// Extra alias -> canonical language entries
  #[serde(default)]
  pub language_aliases: HashMap<String, String>,

  /// Per-heuristic normalizer switches
  #[serde(default)]
  pub normalize: NormalizeOptions,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      docs_root:        default_docs_root(),
      highlight_code:   true,
      highlight_theme:  default_highlight_theme(),
      language_aliases: HashMap::new(),
      normalize:        NormalizeOptions::default(),
    }
  }
}

impl Config {
  /// Create a new configuration from a file.
  ///
  /// Only TOML and JSON are supported, picked by file extension.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read, has no or an unknown
  /// extension, or does not parse.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {e}",
        path.display()
      ))
    })?;

    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
      return Err(ConfigError::Config(format!(
        "Config file has no extension: {}",
        path.display()
      )));
    };

    match ext.to_lowercase().as_str() {
      "json" => {
        serde_json::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse JSON config from {}: {e}",
            path.display()
          ))
        })
      },
      "toml" => {
        toml::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse TOML config from {}: {e}",
            path.display()
          ))
        })
      },
      _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
  }

  /// Load configuration from explicit files, or a discovered one, and apply
  /// `KEY=VALUE` overrides on top.
  ///
  /// Multiple files are merged in order, later files winning.
  ///
  /// # Errors
  ///
  /// Returns an error if any file fails to load or an override is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged = Self::from_file(first)?;
      for path in rest {
        merged.merge(Self::from_file(path)?);
      }
      if !rest.is_empty() {
        log::info!("Loaded and merged {} config files", config_files.len());
      }
      merged
    } else if let Some(discovered) = Self::find_config_file() {
      log::info!("Using discovered config file: {}", discovered.display());
      Self::from_file(&discovered)?
    } else {
      log::debug!("No config file found, using defaults");
      Self::default()
    };

    config.apply_overrides(config_overrides)?;
    Ok(config)
  }

  /// Merge another config into this one, the other config taking
  /// precedence. Alias tables are merged entry by entry.
  pub fn merge(&mut self, other: Self) {
    self.docs_root = other.docs_root;
    self.highlight_code = other.highlight_code;
    self.highlight_theme = other.highlight_theme;
    self.language_aliases.extend(other.language_aliases);
    self.normalize = other.normalize;
  }

  /// Apply configuration overrides from `KEY=VALUE` strings.
  ///
  /// Nested keys use dots: `normalize.diagrams=false`,
  /// `language_aliases.psql=sql`.
  ///
  /// # Errors
  ///
  /// Returns an error for malformed overrides, unknown keys and values that
  /// do not parse.
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    if let Some(alias) = key.strip_prefix("language_aliases.") {
      if alias.is_empty() || value.is_empty() {
        return Err(ConfigError::Config(format!(
          "Language alias override needs both an alias and a language: \
           '{key}={value}'"
        )));
      }
      self
        .language_aliases
        .insert(alias.to_string(), value.to_string());
      return Ok(());
    }

    match key {
      "docs_root" => self.docs_root = PathBuf::from(value),
      "highlight_code" => self.highlight_code = parse_bool(key, value)?,
      "highlight_theme" => self.highlight_theme = value.to_string(),
      "normalize.diagrams" => {
        self.normalize.diagrams = parse_bool(key, value)?;
      },
      "normalize.bare_blocks" => {
        self.normalize.bare_blocks = parse_bool(key, value)?;
      },
      "normalize.section_labels" => {
        self.normalize.section_labels = parse_bool(key, value)?;
      },
      "normalize.key_value_lists" => {
        self.normalize.key_value_lists = parse_bool(key, value)?;
      },
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'"
        )));
      },
    }

    Ok(())
  }

  /// Merge subcommand flags into this config, flags taking precedence.
  pub fn merge_with_cli(&mut self, command: &Commands) {
    if let Commands::Render {
      root, no_highlight, ..
    } = command
    {
      if let Some(root) = root {
        self.docs_root.clone_from(root);
      }
      if *no_highlight {
        self.highlight_code = false;
      }
    }
  }

  /// Search for a config file in the working directory.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    Self::find_config_file_in(&current_dir)
  }

  /// Search for a config file in `dir`.
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
      .iter()
      .map(|filename| dir.join(filename))
      .find(|path| path.is_file())
  }

  /// The renderer configuration described by this config.
  #[must_use]
  pub fn to_pipeline_config(&self) -> PipelineConfig {
    self
      .language_aliases
      .iter()
      .fold(PipelineConfig::builder(), |builder, (alias, canonical)| {
        builder.language_alias(alias, canonical)
      })
      .highlight_code(self.highlight_code)
      .normalize(self.normalize)
      .build()
  }

  /// Write a commented default configuration file.
  ///
  /// # Errors
  ///
  /// Returns an error for an unsupported format or if the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let content = templates::get_template(format)?;
    fs::write(path, content)?;
    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" => Ok(true),
    "false" | "no" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no, or 1/0"
      )))
    },
  }
}
