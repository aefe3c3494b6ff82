use crate::error::ConfigError;

/// Default configuration in TOML, commented so a fresh file explains itself.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# zendoc configuration file

# Directory holding one subdirectory of markdown files per product
docs_root = "docs"

# Whether to highlight fenced code blocks
highlight_code = true

# Theme used by `zendoc stylesheet` when --theme is not given
highlight_theme = "InspiredGitHub"

# Extra fence labels, merged into the built-in alias table
# (pgsql -> sql, jsonc -> json, js -> javascript, ...)
[language_aliases]
# psql = "sql"
# tf = "hcl"

# Heuristics that repair hand-written markdown before rendering
[normalize]
# Runs of three or more box-drawing lines become diagram blocks
diagrams = true
# Bare CREATE TABLE statements and JSON objects become fenced blocks
bare_blocks = true
# "Purpose:" and "Response:" label lines become headings
section_labels = true
# Standalone "Key: value" lines become bold-keyed list items
key_value_lists = true
"#;

/// Default configuration in JSON.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "docs_root": "docs",
  "highlight_code": true,
  "highlight_theme": "InspiredGitHub",
  "language_aliases": {},
  "normalize": {
    "diagrams": true,
    "bare_blocks": true,
    "section_labels": true,
    "key_value_lists": true
  }
}
"#;

/// Get the configuration template for the requested format.
///
/// # Errors
///
/// Returns [`ConfigError::UnsupportedFormat`] for anything other than `toml`
/// or `json`.
pub fn get_template(format: &str) -> Result<&'static str, ConfigError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(ConfigError::UnsupportedFormat(format.to_string())),
  }
}
