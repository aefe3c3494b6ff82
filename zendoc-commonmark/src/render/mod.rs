//! Structural rendering of canonical markdown into HTML.
//!
//! Markdown is converted with comrak, then a DOM pass over the result
//! overrides three emission rules: headings get stable anchors, fenced code
//! becomes a highlighted, copy-enabled block, and inline code is re-emitted
//! from its resolved text. Output of this stage is not yet trusted; the
//! pipeline always runs it through the sanitizer.

pub mod emit;
pub mod inline;

use std::sync::Arc;

use comrak::{Arena, options::Options, parse_document};
use kuchikikiki::NodeRef;
use markup5ever::local_name;
use tendril::TendrilSink;

pub use self::{
  emit::{CodeBlock, Emitter, detect_language, emit_heading, emit_inline_code},
  inline::InlineContent,
};
use crate::{
  error::RenderError,
  syntax::{LanguageAliases, SyntaxManager},
  types::{Heading, RenderResult},
  utils::SlugRegistry,
};

/// Markdown-to-HTML renderer.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
  highlighter: Option<Arc<SyntaxManager>>,
  aliases:     LanguageAliases,
}

impl Renderer {
  /// Without a highlighter, code blocks always use the escaped fallback.
  #[must_use]
  pub const fn new(
    highlighter: Option<Arc<SyntaxManager>>,
    aliases: LanguageAliases,
  ) -> Self {
    Self {
      highlighter,
      aliases,
    }
  }

  #[must_use]
  pub fn highlighter(&self) -> Option<&SyntaxManager> {
    self.highlighter.as_deref()
  }

  /// Render canonical markdown into unsanitized HTML plus metadata.
  ///
  /// # Errors
  ///
  /// Returns [`RenderError::MalformedContent`] if the markdown or the
  /// intermediate HTML cannot be processed.
  pub fn render(&self, markdown: &str) -> Result<RenderResult, RenderError> {
    let html = self.markdown_to_html(markdown)?;
    self.rewrite_html(&html)
  }

  /// Build comrak options: GFM extensions, raw HTML kept for the sanitizer,
  /// no comrak heading ids since anchors are assigned here.
  fn comrak_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.extension.autolink = true;
    options.extension.header_ids = None;
    options.render.r#unsafe = true;
    options
  }

  fn markdown_to_html(&self, markdown: &str) -> Result<String, RenderError> {
    let arena = Arena::new();
    let options = Self::comrak_options();
    let root = parse_document(&arena, markdown, &options);

    let mut html = String::new();
    comrak::format_html(root, &options, &mut html)
      .map_err(|e| RenderError::MalformedContent(e.to_string()))?;
    Ok(html)
  }

  fn rewrite_html(&self, html: &str) -> Result<RenderResult, RenderError> {
    let document = kuchikikiki::parse_html().one(html);
    let emitter = Emitter::new(self.highlighter(), &self.aliases);

    // collect before mutating; replacements insert new <code> elements
    let (block_code, inline_code): (Vec<NodeRef>, Vec<NodeRef>) =
      select_nodes(&document, "code")?
        .into_iter()
        .partition(|code| code.parent().is_some_and(|parent| is_element(&parent, "pre")));

    for code in inline_code {
      let content = InlineContent::InlineFragment(inner_html(&code)?);
      replace_with_html(&code, &emit_inline_code(&content));
    }

    let mut languages: Vec<String> = Vec::new();
    for code in block_code {
      let Some(pre) = code.parent() else {
        continue;
      };
      let declared = declared_language(&code);
      let body = InlineContent::PlainText(code.text_contents());
      let block = emitter.code_block(&body, declared.as_deref());

      if let Some(language) = block.reported_language() {
        if !languages.iter().any(|seen| seen == language) {
          languages.push(language.to_string());
        }
      }
      replace_with_html(&pre, &block.to_html());
    }

    let mut registry = SlugRegistry::new();
    let mut headings = Vec::new();
    for heading in select_nodes(&document, "h1, h2, h3, h4, h5, h6")? {
      let Some(level) = heading_level(&heading) else {
        continue;
      };
      let content = InlineContent::InlineFragment(inner_html(&heading)?);
      let text = content.resolve_to_text().trim().to_string();
      let slug = registry.claim(&text);

      replace_with_html(&heading, &emit_heading(level, &content, &slug));
      headings.push(Heading { level, text, slug });
    }

    Ok(RenderResult {
      html: body_html(&document)?,
      headings,
      languages,
    })
  }
}

fn select_nodes(
  document: &NodeRef,
  selector: &str,
) -> Result<Vec<NodeRef>, RenderError> {
  let selected = document.select(selector).map_err(|()| {
    RenderError::MalformedContent(format!("invalid selector '{selector}'"))
  })?;
  Ok(selected.map(|node| node.as_node().clone()).collect())
}

fn is_element(node: &NodeRef, name: &str) -> bool {
  node
    .as_element()
    .is_some_and(|element| &*element.name.local == name)
}

fn heading_level(node: &NodeRef) -> Option<u8> {
  let element = node.as_element()?;
  element
    .name
    .local
    .strip_prefix('h')
    .and_then(|level| level.parse::<u8>().ok())
    .filter(|level| (1..=6).contains(level))
}

/// Language from a `language-*` class, as emitted by comrak for fenced code.
fn declared_language(code: &NodeRef) -> Option<String> {
  let element = code.as_element()?;
  let attributes = element.attributes.borrow();
  attributes
    .get(local_name!("class"))?
    .split_whitespace()
    .find_map(|class| class.strip_prefix("language-"))
    .map(str::to_string)
}

fn inner_html(node: &NodeRef) -> Result<String, RenderError> {
  let mut buf = Vec::new();
  for child in node.children() {
    child
      .serialize(&mut buf)
      .map_err(|e| RenderError::MalformedContent(e.to_string()))?;
  }
  String::from_utf8(buf)
    .map_err(|e| RenderError::MalformedContent(e.to_string()))
}

/// Replace `target` with the nodes parsed from `html`.
fn replace_with_html(target: &NodeRef, html: &str) {
  let fragment = kuchikikiki::parse_html().one(html);
  let nodes: Vec<NodeRef> = fragment
    .select_first("body")
    .map(|body| body.as_node().children().collect())
    .unwrap_or_default();

  for node in nodes {
    target.insert_before(node);
  }
  target.detach();
}

/// Serialize the children of `<body>`, dropping the wrapper html5ever adds.
fn body_html(document: &NodeRef) -> Result<String, RenderError> {
  let body = document.select_first("body").map_err(|()| {
    RenderError::MalformedContent("document has no body".to_string())
  })?;
  inner_html(body.as_node())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn render(markdown: &str) -> RenderResult {
    Renderer::default().render(markdown).expect("render succeeds")
  }

  #[test]
  fn test_heading_gets_anchor() {
    let result = render("# Hello World\n");
    assert_eq!(
      result.html.trim(),
      "<h1 id=\"hello-world\"><a class=\"anchor\" \
       href=\"#hello-world\"></a>Hello World</h1>"
    );
    assert_eq!(result.headings, vec![Heading {
      level: 1,
      text:  "Hello World".to_string(),
      slug:  "hello-world".to_string(),
    }]);
  }

  #[test]
  fn test_structured_heading_slug() {
    let result = render("## The `Vec<T>` *type*\n");
    assert_eq!(result.headings[0].text, "The Vec<T> type");
    assert_eq!(result.headings[0].slug, "the-vec-t-type");
    assert!(result.html.contains("<code>Vec&lt;T&gt;</code>"));
    assert!(result.html.contains("<em>type</em>"));
  }

  #[test]
  fn test_duplicate_headings_are_disambiguated() {
    let result = render("## Setup\n\n## Setup\n\n## !!!\n");
    let slugs: Vec<&str> =
      result.headings.iter().map(|h| h.slug.as_str()).collect();
    assert_eq!(slugs, ["setup", "setup-2", "section"]);
  }

  #[test]
  fn test_code_block_is_wrapped() {
    let result = render("```pgsql\nSELECT 1;\n```\n");
    assert!(result.html.contains("<div class=\"code-block\">"));
    assert!(result.html.contains("<button class=\"copy-button\"></button>"));
    assert!(result.html.contains("<span class=\"code-language\">sql</span>"));
    assert!(!result.html.contains("pgsql"));
    assert_eq!(result.languages, vec!["sql".to_string()]);
  }

  #[test]
  fn test_languages_are_deduplicated_in_order() {
    let result = render(
      "```json\n{}\n```\n\n```sql\nSELECT 1;\n```\n\n```json\n[]\n```\n\n```\n┌┐\n```\n",
    );
    assert_eq!(result.languages, ["json", "sql", "ascii"]);
  }

  #[test]
  fn test_inline_code_is_not_a_block() {
    let result = render("Use `cargo build` here.\n");
    assert!(result.html.contains("<code>cargo build</code>"));
    assert!(!result.html.contains("code-block"));
    assert!(result.languages.is_empty());
  }

  #[test]
  fn test_gfm_extensions() {
    let result = render("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~\n");
    assert!(result.html.contains("<table>"));
    assert!(result.html.contains("<del>old</del>"));
  }
}
