#![allow(clippy::expect_used, reason = "Fine in tests")]
use std::fs;

use tempfile::tempdir;
use zendoc::{
  cli::OutputFormat,
  commands::{
    document_id,
    format_result,
    init,
    render_document,
    stylesheet,
    write_output,
  },
  config::Config,
};

fn docs_config(root: &std::path::Path) -> Config {
  Config {
    docs_root: root.to_path_buf(),
    highlight_code: false,
    ..Config::default()
  }
}

#[test]
fn test_render_document_from_docs_root() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let product_dir = temp_dir.path().join("payments").join("api");
  fs::create_dir_all(&product_dir).expect("Failed to create dir in test");
  fs::write(
    product_dir.join("refunds.md"),
    "# Refunds\n\nPurpose:\n\n```pgsql\nSELECT 1;\n```\n",
  )
  .expect("Failed to write doc in test");

  let config = docs_config(temp_dir.path());
  let result =
    render_document(&config, document_id("payments", Some("api/refunds")));

  assert_eq!(result.title(), Some("Refunds"));
  assert!(result.html.contains("<h1 id=\"refunds\">"));
  assert!(result.html.contains("<h2 id=\"purpose\">"));
  assert_eq!(result.languages, ["sql"]);
}

#[test]
fn test_render_overview_by_default() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let product_dir = temp_dir.path().join("payments");
  fs::create_dir_all(&product_dir).expect("Failed to create dir in test");
  fs::write(product_dir.join("overview.md"), "# Payments\n")
    .expect("Failed to write doc in test");

  let result = render_document(
    &docs_config(temp_dir.path()),
    document_id("payments", None),
  );
  assert!(result.html.contains("id=\"payments\""));
}

#[test]
fn test_missing_document_renders_error_document() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let config = docs_config(temp_dir.path());

  let missing = render_document(&config, document_id("payments", Some("nope")));
  assert!(missing.html.contains("Error loading documentation content"));

  let escaping =
    render_document(&config, document_id("payments", Some("../secrets")));
  assert!(escaping.html.contains("Error loading documentation content"));
}

#[test]
fn test_json_output_carries_headings() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let product_dir = temp_dir.path().join("search");
  fs::create_dir_all(&product_dir).expect("Failed to create dir in test");
  fs::write(product_dir.join("overview.md"), "# Search\n\n## Query Syntax\n")
    .expect("Failed to write doc in test");

  let result = render_document(
    &docs_config(temp_dir.path()),
    document_id("search", None),
  );
  let json = format_result(&result, OutputFormat::Json)
    .expect("render result serializes");
  let value: serde_json::Value =
    serde_json::from_str(&json).expect("output is valid JSON");

  assert_eq!(value["headings"][1]["slug"], "query-syntax");
  assert_eq!(value["headings"][1]["level"], 2);
  assert_eq!(
    format_result(&result, OutputFormat::Html).expect("html output"),
    result.html
  );
}

#[test]
fn test_init_refuses_to_overwrite_without_force() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let output = temp_dir.path().join("nested").join("zendoc.toml");

  init(&output, "toml", false).expect("fresh config is written");
  let written = Config::from_file(&output).expect("written config loads");
  assert_eq!(written, Config::default());

  let err = init(&output, "toml", false).expect_err("file already exists");
  assert!(err.to_string().contains("--force"));

  init(&output, "toml", true).expect("--force overwrites");
}

#[test]
fn test_init_json_config() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let output = temp_dir.path().join("zendoc.json");

  init(&output, "json", false).expect("config is written");
  assert_eq!(
    Config::from_file(&output).expect("written config loads"),
    Config::default()
  );
}

#[test]
fn test_write_output_to_file() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let output = temp_dir.path().join("out.html");

  write_output(Some(&output), "<p>hi</p>").expect("output is written");
  assert_eq!(
    fs::read_to_string(&output).expect("output readable"),
    "<p>hi</p>"
  );
}

#[test]
fn test_stylesheet_for_default_theme() {
  let css =
    stylesheet(&Config::default().highlight_theme).expect("default theme");
  assert!(css.contains(".hl-"));
  assert!(stylesheet("no-such-theme").is_err());
}
