#![allow(clippy::expect_used, clippy::panic, reason = "Fine in tests")]
//! End-to-end tests for the rendering pipeline.

use zendoc_commonmark::{
  FetchError,
  NormalizeOptions,
  Pipeline,
  PipelineConfig,
  pipeline::ERROR_TITLE,
};

fn plain_pipeline() -> Pipeline {
  Pipeline::new(PipelineConfig::builder().highlight_code(false).build())
}

#[test]
fn test_hello_world_heading() {
  let result = plain_pipeline().render("# Hello World");
  assert!(result.html.contains(
    "<h1 id=\"hello-world\"><a class=\"anchor\" href=\"#hello-world\"></a>Hello \
     World</h1>"
  ));
  assert_eq!(result.headings.len(), 1);
  assert_eq!(result.headings[0].slug, "hello-world");
  assert_eq!(result.title(), Some("Hello World"));
}

#[cfg(feature = "syntect")]
#[test]
fn test_pgsql_block_is_highlighted_as_sql() {
  let result = Pipeline::default().render("```pgsql\nSELECT 1;\n```");

  assert!(result.html.contains("<span class=\"code-language\">sql</span>"));
  assert!(result.html.contains("<code class=\"language-sql\">"));
  assert!(result.html.contains("class=\"hl-"), "expected highlight spans");
  assert!(!result.html.contains("pgsql"));
  assert_eq!(result.languages, ["sql"]);
}

#[test]
fn test_unhighlighted_block_is_escaped() {
  let result = plain_pipeline().render("```html\n<b>bold</b>\n```");
  assert!(result.html.contains("&lt;b&gt;bold&lt;/b&gt;"));
  assert!(result.html.contains("<button class=\"copy-button\"></button>"));
}

#[test]
fn test_script_is_removed_everywhere() {
  let samples = [
    "<script>alert(1)</script>",
    "# Title <script>alert(1)</script>",
    "- item <script>alert(1)</script>\n",
    "Purpose:\n<script>alert(1)</script>\n",
    "> quote\n<script>alert(1)</script>",
  ];
  for sample in samples {
    let result = plain_pipeline().render(sample);
    assert!(!result.html.contains("<script"), "{sample:?}: {}", result.html);
    assert!(!result.html.contains("alert(1)"), "{sample:?}: {}", result.html);
  }
}

#[test]
fn test_event_handlers_are_stripped() {
  let result =
    plain_pipeline().render("<img src=\"x.png\" onerror=\"alert(1)\">\n");
  assert!(!result.html.contains("onerror"));
}

#[test]
fn test_fetch_failure_yields_error_document() {
  let result = plain_pipeline()
    .render_fetched(Err(FetchError::NotFound("zenrpc/missing.md".into())));
  assert!(result.html.contains("Error loading"));
  assert!(result.html.contains(ERROR_TITLE));
  assert!(result.html.contains("zenrpc/missing.md"));
}

#[test]
fn test_three_box_lines_render_as_diagram() {
  let result = plain_pipeline().render("Flow:\n\n┌───┐\n│ A │\n└───┘\n");
  assert!(result.html.contains("<pre class=\"diagram\">"));
  assert!(result.html.contains("<span class=\"code-language\">diagram</span>"));
  assert_eq!(result.languages, ["ascii"]);
}

#[test]
fn test_two_box_lines_stay_prose() {
  let result = plain_pipeline().render("Flow:\n\n┌───┐\n└───┘\n");
  assert!(!result.html.contains("diagram"));
  assert!(result.languages.is_empty());
}

#[test]
fn test_bare_json_and_sql_become_code_blocks() {
  let raw = "Request body:\n\n{\n  \"id\": 7,\n  \"name\": \"x\",\n}\n\nSchema:\n\nCREATE TABLE users (\n  id INT\n);\n";
  let result = plain_pipeline().render(raw);
  assert_eq!(result.languages, ["json", "sql"]);
  assert!(result.html.contains("<code class=\"language-json\">"));
  assert!(result.html.contains("<code class=\"language-sql\">"));
}

#[test]
fn test_create_table_prose_keeps_following_headings() {
  let raw = "Create table rows with the import tool.\n\n## Next steps\n\nRun the job; it finishes quickly;\n";
  let result = plain_pipeline().render(raw);
  assert!(result.languages.is_empty());
  assert!(!result.html.contains("code-block"));
  assert_eq!(result.headings.len(), 1);
  assert_eq!(result.headings[0].slug, "next-steps");
}

#[test]
fn test_invalid_json_stays_prose() {
  let result = plain_pipeline().render("{ this is not json }\n");
  assert!(result.languages.is_empty());
  assert!(result.html.contains("{ this is not json }"));
}

#[test]
fn test_section_labels_and_key_values() {
  let raw = "Purpose:\n\nCreates a user.\n\nResponse:\n\nStatus: 201\nBody: the new user\n";
  let result = plain_pipeline().render(raw);

  let slugs: Vec<&str> = result.headings.iter().map(|h| h.slug.as_str()).collect();
  assert_eq!(slugs, ["purpose", "response"]);
  assert!(result.html.contains("<li><strong>Status:</strong> 201</li>"));
  assert!(result.html.contains("<li><strong>Body:</strong> the new user</li>"));
}

#[test]
fn test_object_artifacts_are_stripped() {
  let result = plain_pipeline().render("Value is [object Object] here\n");
  assert!(!result.html.contains("object Object"));
}

#[test]
fn test_code_is_never_normalized() {
  let raw = "```text\nPurpose:\nKey: value\n[object Object]\n```\n";
  let result = plain_pipeline().render(raw);
  assert!(result.html.contains("Purpose:\nKey: value\n[object Object]"));
  assert!(result.headings.is_empty());
}

#[test]
fn test_normalization_can_be_disabled() {
  let pipeline = Pipeline::new(
    PipelineConfig::builder()
      .highlight_code(false)
      .normalize(NormalizeOptions::none())
      .build(),
  );
  let result = pipeline.render("Purpose:\n");
  assert!(result.headings.is_empty());
  assert!(result.html.contains("<p>Purpose:</p>"));
}

#[test]
fn test_custom_alias() {
  let pipeline = Pipeline::new(
    PipelineConfig::builder()
      .highlight_code(false)
      .language_alias("proto3", "protobuf")
      .build(),
  );
  let result = pipeline.render("```proto3\nmessage A {}\n```\n");
  assert_eq!(result.languages, ["protobuf"]);
}

#[test]
fn test_empty_document() {
  let result = plain_pipeline().render("");
  assert!(result.html.trim().is_empty());
  assert!(result.headings.is_empty());
  assert!(result.languages.is_empty());
}

#[test]
fn test_pipeline_is_send_and_sync() {
  fn assert_send_sync<T: Send + Sync>() {}
  assert_send_sync::<Pipeline>();
  assert_send_sync::<zendoc_commonmark::NavigationSession>();
}
