//! HTML emission for headings, code blocks and inline code.
use std::sync::LazyLock;

use regex::Regex;

use super::inline::InlineContent;
use crate::{
  syntax::{HighlightFallback, LanguageAliases, SyntaxManager},
  utils::{
    codeblock::parse_fence_line,
    contains_box_drawing,
    escape_html,
    never_matching_regex,
  },
};

/// Declared language that marks a block as a diagram.
pub const DIAGRAM_LANGUAGE: &str = "ascii";

static SQL_DETECT_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\s*CREATE\s+TABLE\b").unwrap_or_else(|e| {
    log::error!("Failed to compile SQL_DETECT_RE regex: {e}");
    never_matching_regex()
  })
});

static JSON_DETECT_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"^\s*\{\s*"[^"]+"\s*:"#).unwrap_or_else(|e| {
    log::error!("Failed to compile JSON_DETECT_RE regex: {e}");
    never_matching_regex()
  })
});

/// Guess the language of an unlabelled code block.
///
/// Only SQL table definitions and JSON objects are recognised.
#[must_use]
pub fn detect_language(body: &str) -> Option<&'static str> {
  if SQL_DETECT_RE.is_match(body) {
    Some("sql")
  } else if JSON_DETECT_RE.is_match(body) {
    Some("json")
  } else {
    None
  }
}

/// Drop fence lines left at the start or end of a code body.
///
/// These appear when a doubled fence was only half consumed by the parser.
fn strip_residual_fences(body: &str) -> &str {
  let mut body = body;

  if let Some((first, rest)) = body.split_once('\n') {
    if parse_fence_line(first).is_some() {
      body = rest;
    }
  } else if parse_fence_line(body).is_some() {
    return "";
  }

  let trimmed = body.trim_end_matches(['\n', '\r']);
  let (head, last) = match trimmed.rfind('\n') {
    Some(idx) => (&trimmed[..=idx], &trimmed[idx + 1..]),
    None => ("", trimmed),
  };
  if parse_fence_line(last).is_some_and(|marker| marker.info.is_empty()) {
    body = head;
  }

  body
}

/// Everything known about one code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
  /// Code text with residual fence lines and the final newline removed.
  pub raw_body:           String,
  /// Language from the fence info string, if any.
  pub declared_language:  Option<String>,
  /// Canonical language after alias resolution or detection.
  pub resolved_language:  Option<String>,
  /// Inner markup of the `<code>` element: highlighted or escaped.
  pub highlighted_markup: String,
  pub is_diagram:         bool,
}

impl CodeBlock {
  /// Language label shown in the block header.
  #[must_use]
  pub fn label(&self) -> Option<&str> {
    if self.is_diagram {
      Some("diagram")
    } else {
      self.resolved_language.as_deref()
    }
  }

  /// Language reported in render metadata.
  #[must_use]
  pub fn reported_language(&self) -> Option<&str> {
    if self.is_diagram {
      Some(DIAGRAM_LANGUAGE)
    } else {
      self.resolved_language.as_deref()
    }
  }

  /// The copy-enabled block markup.
  #[must_use]
  pub fn to_html(&self) -> String {
    let mut html = String::from(
      "<div class=\"code-block\"><div class=\"code-header\">",
    );
    if let Some(label) = self.label() {
      html.push_str("<span class=\"code-language\">");
      html.push_str(&escape_html(label));
      html.push_str("</span>");
    }
    html.push_str("<button class=\"copy-button\"></button></div>");

    if self.is_diagram {
      html.push_str("<pre class=\"diagram\"><code>");
    } else if let Some(language) = &self.resolved_language {
      html.push_str("<pre><code class=\"language-");
      html.push_str(&escape_html(language));
      html.push_str("\">");
    } else {
      html.push_str("<pre><code>");
    }
    html.push_str(&self.highlighted_markup);
    html.push_str("</code></pre></div>");
    html
  }
}

/// Emits markup for the elements the renderer overrides.
#[derive(Clone, Copy)]
pub struct Emitter<'a> {
  highlighter: Option<&'a SyntaxManager>,
  aliases:     &'a LanguageAliases,
}

impl<'a> Emitter<'a> {
  /// Without a highlighter every code block uses the escaped fallback.
  #[must_use]
  pub const fn new(
    highlighter: Option<&'a SyntaxManager>,
    aliases: &'a LanguageAliases,
  ) -> Self {
    Self {
      highlighter,
      aliases,
    }
  }

  /// Resolve, classify and highlight a code block.
  #[must_use]
  pub fn code_block(
    &self,
    body: &InlineContent,
    declared_language: Option<&str>,
  ) -> CodeBlock {
    let declared_language = declared_language
      .map(str::trim)
      .filter(|lang| !lang.is_empty())
      .map(str::to_string);
    let declared_canonical =
      declared_language.as_deref().map(|lang| self.aliases.resolve(lang));

    let text = body.resolve_to_text();
    // markdown examples legitimately start and end with fences
    let raw = if declared_canonical.as_deref() == Some("markdown") {
      text.as_str()
    } else {
      strip_residual_fences(&text)
    };
    let raw_body = raw.strip_suffix('\n').unwrap_or(raw).to_string();

    let is_diagram = declared_canonical.as_deref() == Some(DIAGRAM_LANGUAGE)
      || contains_box_drawing(&raw_body);

    let resolved_language = if is_diagram {
      None
    } else {
      declared_canonical
        .or_else(|| detect_language(&raw_body).map(str::to_string))
    };

    let highlighted_markup = match (self.highlighter, &resolved_language) {
      (Some(manager), Some(language)) => {
        manager.highlight(&raw_body, language).or_escaped()
      },
      _ => escape_html(&raw_body),
    };

    CodeBlock {
      raw_body,
      declared_language,
      resolved_language,
      highlighted_markup,
      is_diagram,
    }
  }

  /// Copy-enabled markup for a code block.
  #[must_use]
  pub fn emit_code_block(
    &self,
    body: &InlineContent,
    declared_language: Option<&str>,
  ) -> String {
    self.code_block(body, declared_language).to_html()
  }
}

/// Heading markup with a self-referencing anchor.
#[must_use]
pub fn emit_heading(level: u8, content: &InlineContent, slug: &str) -> String {
  let level = level.clamp(1, 6);
  let slug = escape_html(slug);
  format!(
    "<h{level} id=\"{slug}\"><a class=\"anchor\" href=\"#{slug}\"></a>{}</h{level}>",
    content.to_html()
  )
}

/// Inline code markup. Never highlighted.
#[must_use]
pub fn emit_inline_code(content: &InlineContent) -> String {
  format!("<code>{}</code>", escape_html(&content.resolve_to_text()))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn plain_emitter(aliases: &LanguageAliases) -> Emitter<'_> {
    Emitter::new(None, aliases)
  }

  #[test]
  fn test_detect_language() {
    assert_eq!(detect_language("CREATE TABLE t (id INT);"), Some("sql"));
    assert_eq!(detect_language("  {\"id\": 1}"), Some("json"));
    assert_eq!(detect_language("{ not json }"), None);
    assert_eq!(detect_language("SELECT 1;"), None);
    assert_eq!(detect_language("create table t (id int);"), None);
    assert_eq!(detect_language("Create table rows first."), None);
  }

  #[test]
  fn test_strip_residual_fences() {
    assert_eq!(strip_residual_fences("```json\n{}\n```\n"), "{}\n");
    assert_eq!(strip_residual_fences("plain\ncode\n"), "plain\ncode\n");
    assert_eq!(strip_residual_fences("```"), "");
  }

  #[test]
  fn test_code_block_resolves_alias() {
    let aliases = LanguageAliases::default();
    let block = plain_emitter(&aliases)
      .code_block(&InlineContent::from("SELECT 1;\n"), Some("pgsql"));
    assert_eq!(block.declared_language.as_deref(), Some("pgsql"));
    assert_eq!(block.resolved_language.as_deref(), Some("sql"));
    assert_eq!(block.raw_body, "SELECT 1;");
    assert!(!block.is_diagram);

    let html = block.to_html();
    assert!(html.starts_with("<div class=\"code-block\">"));
    assert!(html.contains("<span class=\"code-language\">sql</span>"));
    assert!(html.contains("<button class=\"copy-button\"></button>"));
    assert!(html.contains("<code class=\"language-sql\">SELECT 1;</code>"));
  }

  #[test]
  fn test_code_block_detects_language() {
    let aliases = LanguageAliases::default();
    let block = plain_emitter(&aliases)
      .code_block(&InlineContent::from("{\"a\": 1}\n"), None);
    assert_eq!(block.resolved_language.as_deref(), Some("json"));
  }

  #[test]
  fn test_diagram_block() {
    let aliases = LanguageAliases::default();
    let emitter = plain_emitter(&aliases);

    let boxed = emitter.code_block(&InlineContent::from("┌─┐\n└─┘\n"), None);
    assert!(boxed.is_diagram);
    assert_eq!(boxed.reported_language(), Some("ascii"));

    let html = emitter.emit_code_block(&InlineContent::from("+--+\n"), Some("ascii"));
    assert!(html.contains("<pre class=\"diagram\">"));
    assert!(html.contains("<span class=\"code-language\">diagram</span>"));
    assert!(!html.contains("language-"));
  }

  #[test]
  fn test_unlabelled_block_has_no_language_span() {
    let aliases = LanguageAliases::default();
    let html = plain_emitter(&aliases)
      .emit_code_block(&InlineContent::from("<b>x</b> & 'y'\n"), None);
    assert!(!html.contains("code-language"));
    assert!(html.contains("<pre><code>&lt;b&gt;x&lt;/b&gt; &amp; "));
  }

  #[test]
  fn test_emit_heading() {
    assert_eq!(
      emit_heading(1, &InlineContent::from("Hello World"), "hello-world"),
      "<h1 id=\"hello-world\"><a class=\"anchor\" \
       href=\"#hello-world\"></a>Hello World</h1>"
    );
  }

  #[test]
  fn test_emit_inline_code() {
    let content = InlineContent::InlineFragment("Vec&lt;u8&gt;".to_string());
    assert_eq!(emit_inline_code(&content), "<code>Vec&lt;u8&gt;</code>");
  }
}
