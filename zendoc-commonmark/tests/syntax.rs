#![allow(clippy::expect_used, clippy::panic, reason = "Fine in tests")]
//! Integration tests for syntax highlighting through the pipeline.

use zendoc_commonmark::{
  LanguageAliases,
  Pipeline,
  PipelineConfig,
  syntax::{HighlightFallback, SyntaxError, create_default_manager},
};

#[cfg(feature = "syntect")]
#[test]
fn test_highlighting_survives_sanitization() {
  let pipeline = Pipeline::default();
  let result = pipeline.render(
    "```rust\nfn main() {\n    let x = 42;\n}\n```\n\n```ts\nconst a: number = \
     1;\n```\n",
  );

  assert!(result.html.contains("<code class=\"language-rust\">"));
  assert!(result.html.contains("<code class=\"language-typescript\">"));
  assert!(result.html.contains("<span class=\"hl-"));
  assert!(!result.html.contains("style="));
  assert_eq!(result.languages, ["rust", "typescript"]);
}

#[cfg(feature = "syntect")]
#[test]
fn test_unknown_language_falls_back_to_escaped_text() {
  let result =
    Pipeline::default().render("```nonexistent\nx < y && y > z\n```\n");
  assert!(result.html.contains("<code class=\"language-nonexistent\">"));
  assert!(result.html.contains("x &lt; y &amp;&amp; y &gt; z"));
  assert!(!result.html.contains("hl-"));
}

#[cfg(feature = "syntect")]
#[test]
fn test_diagrams_are_never_highlighted() {
  let result = Pipeline::default().render("```ascii\n+--+\n|  |\n+--+\n```\n");
  assert!(result.html.contains("<pre class=\"diagram\">"));
  assert!(!result.html.contains("hl-"));
}

#[cfg(feature = "syntect")]
#[test]
fn test_stylesheet_matches_emitted_classes() {
  let pipeline = Pipeline::default();
  let manager = pipeline.highlighter().expect("highlighting enabled");
  let css = manager.stylesheet("Nord").expect("Nord is bundled");
  assert!(css.contains(".hl-"));
}

#[test]
fn test_highlighting_disabled_has_no_manager() {
  let pipeline =
    Pipeline::new(PipelineConfig::builder().highlight_code(false).build());
  assert!(pipeline.highlighter().is_none());

  let result = pipeline.render("```rust\nfn main() {}\n```\n");
  assert!(result.html.contains("<code class=\"language-rust\">fn main() {}</code>"));
}

#[test]
fn test_default_manager_matches_features() {
  let manager = create_default_manager(LanguageAliases::default());
  if cfg!(feature = "syntect") {
    let manager = manager.expect("syntect backend");
    assert_eq!(manager.resolve_language("PY"), "python");
    assert_eq!(
      manager.highlight("a<b", "no-such-language").or_escaped(),
      "a&lt;b"
    );
  } else {
    assert!(matches!(manager, Err(SyntaxError::NoBackendAvailable)));
  }
}
