//! Individual normalization rules.
//!
//! Every rule takes fence-protected text (see [`crate::fence`]) and returns
//! the rewritten text. A rule that finds nothing to do returns its input
//! unchanged; none of them can fail.
use std::sync::LazyLock;

use regex::Regex;

use crate::{
  fence::{FenceToken, has_markers},
  syntax::LanguageAliases,
  utils::{
    codeblock::split_terminator,
    contains_box_drawing,
    never_matching_regex,
  },
};

/// Minimum number of adjacent box-drawing lines treated as a diagram.
pub const MIN_DIAGRAM_LINES: usize = 3;

const OBJECT_ARTIFACT: &str = "[object Object]";

static CREATE_TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\s*CREATE\s+TABLE\b").unwrap_or_else(|e| {
    log::error!("Failed to compile CREATE_TABLE_RE regex: {e}");
    never_matching_regex()
  })
});

static TRAILING_COMMA_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r",(\s*[}\]])").unwrap_or_else(|e| {
    log::error!("Failed to compile TRAILING_COMMA_RE regex: {e}");
    never_matching_regex()
  })
});

static SECTION_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^[ \t]*(?:\*\*)?(Purpose|Response Structure|Response)(?:\*\*)?[ \t]*:[ \t]*(?:\*\*)?[ \t]*$",
  )
  .unwrap_or_else(|e| {
    log::error!("Failed to compile SECTION_LABEL_RE regex: {e}");
    never_matching_regex()
  })
});

static KEY_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^([A-Za-z][\w()/'-]*(?: [\w()/'-]+){0,3}):[ \t]+(\S.*?)[ \t]*$",
  )
  .unwrap_or_else(|e| {
    log::error!("Failed to compile KEY_VALUE_RE regex: {e}");
    never_matching_regex()
  })
});

/// Wrap lines in a backtick fence long enough not to be closed by anything
/// inside them.
fn fence_block(language: &str, lines: &[&str]) -> String {
  let mut body = lines.concat();
  let longest_run = body
    .split(|c| c != '`')
    .map(str::len)
    .max()
    .unwrap_or(0);
  let run = "`".repeat(longest_run.max(2) + 1);

  let closing_terminator = if body.ends_with('\n') {
    "\n"
  } else {
    body.push('\n');
    ""
  };

  format!("{run}{language}\n{body}{run}{closing_terminator}")
}

/// Remove literal `[object Object]` artifacts.
#[must_use]
pub fn strip_object_artifacts(text: &str) -> String {
  if !text.contains(OBJECT_ARTIFACT) {
    return text.to_string();
  }
  log::trace!("Stripping [object Object] artifacts");
  text.replace(OBJECT_ARTIFACT, "")
}

/// Rewrite aliased fence labels to their canonical names.
pub fn canonicalize_labels(tokens: &mut [FenceToken], aliases: &LanguageAliases) {
  for token in tokens {
    let Some(language) = token.language.as_deref() else {
      continue;
    };
    if aliases.is_alias(language) {
      let canonical = aliases.resolve(language);
      log::trace!("Relabeling fence '{language}' as '{canonical}'");
      token.relabel(&canonical);
    }
  }
}

/// Fence runs of box-drawing lines as `ascii` blocks.
///
/// Only runs of at least [`MIN_DIAGRAM_LINES`] adjacent lines qualify; shorter
/// runs are more likely to be decorative rules than diagrams.
#[must_use]
pub fn fence_diagrams(text: &str) -> String {
  let lines: Vec<&str> = text.split_inclusive('\n').collect();
  let mut out = String::with_capacity(text.len());
  let mut i = 0;

  while i < lines.len() {
    let run = lines[i..]
      .iter()
      .take_while(|line| contains_box_drawing(line) && !has_markers(line))
      .count();

    if run >= MIN_DIAGRAM_LINES {
      log::trace!("Fencing {run}-line diagram at line {}", i + 1);
      out.push_str(&fence_block("ascii", &lines[i..i + run]));
      i += run;
    } else if run > 0 {
      for line in &lines[i..i + run] {
        out.push_str(line);
      }
      i += run;
    } else {
      out.push_str(lines[i]);
      i += 1;
    }
  }

  out
}

/// Fence bare `CREATE TABLE ... ;` statements as `sql` blocks.
///
/// The keywords must be upper case. The statement runs from the
/// `CREATE TABLE` line through the first line ending in `;`, and must not
/// cross a blank line, a heading or a fenced region; anything else is left
/// alone.
#[must_use]
pub fn fence_create_table(text: &str) -> String {
  let lines: Vec<&str> = text.split_inclusive('\n').collect();
  let mut out = String::with_capacity(text.len());
  let mut i = 0;

  while i < lines.len() {
    if !CREATE_TABLE_RE.is_match(lines[i]) {
      out.push_str(lines[i]);
      i += 1;
      continue;
    }

    let end = lines[i..]
      .iter()
      .enumerate()
      .find_map(|(offset, line)| {
        let content = split_terminator(line).0.trim();
        let boundary =
          offset > 0 && (content.is_empty() || content.starts_with('#'));
        if has_markers(line) || boundary {
          Some(None)
        } else if content.ends_with(';') {
          Some(Some(i + offset))
        } else {
          None
        }
      })
      .flatten();

    match end {
      Some(end) => {
        log::trace!("Fencing bare CREATE TABLE statement at line {}", i + 1);
        out.push_str(&fence_block("sql", &lines[i..=end]));
        i = end + 1;
      },
      None => {
        out.push_str(lines[i]);
        i += 1;
      },
    }
  }

  out
}

/// Index of the line closing a brace-delimited region starting at `start`.
///
/// Braces and brackets inside JSON strings are ignored.
fn json_extent(lines: &[&str], start: usize) -> Option<usize> {
  let mut depth = 0usize;
  let mut in_string = false;
  let mut escaped = false;

  for (offset, line) in lines[start..].iter().enumerate() {
    if has_markers(line) {
      return None;
    }

    for c in line.chars() {
      if in_string {
        match c {
          _ if escaped => escaped = false,
          '\\' => escaped = true,
          '"' => in_string = false,
          _ => {},
        }
        continue;
      }
      match c {
        '"' => in_string = true,
        '{' | '[' => depth += 1,
        '}' | ']' => depth = depth.checked_sub(1)?,
        _ => {},
      }
    }

    if depth == 0 {
      return Some(start + offset);
    }
  }

  None
}

/// Whether `candidate` parses as a non-empty JSON object once trailing commas
/// are removed.
fn is_json_object(candidate: &str) -> bool {
  let cleaned = TRAILING_COMMA_RE.replace_all(candidate, "$1");
  matches!(
    serde_json::from_str::<serde_json::Value>(&cleaned),
    Ok(serde_json::Value::Object(map)) if !map.is_empty()
  )
}

/// Fence bare JSON objects as `json` blocks.
///
/// A candidate starts on a line beginning with `{` and ends where its braces
/// balance. It is fenced only if it parses as JSON (trailing commas
/// tolerated); the original text is kept verbatim inside the fence.
#[must_use]
pub fn fence_json(text: &str) -> String {
  let lines: Vec<&str> = text.split_inclusive('\n').collect();
  let mut out = String::with_capacity(text.len());
  let mut i = 0;

  while i < lines.len() {
    let starts_object = lines[i].trim_start().starts_with('{');
    let fenced = starts_object
      .then(|| json_extent(&lines, i))
      .flatten()
      .filter(|&end| is_json_object(&lines[i..=end].concat()));

    if let Some(end) = fenced {
      log::trace!("Fencing bare JSON object at line {}", i + 1);
      out.push_str(&fence_block("json", &lines[i..=end]));
      i = end + 1;
    } else {
      out.push_str(lines[i]);
      i += 1;
    }
  }

  out
}

/// Promote label-only lines such as `Purpose:` or `**Response:**` to level-2
/// headings.
#[must_use]
pub fn promote_section_labels(text: &str) -> String {
  let mut out = String::with_capacity(text.len());

  for line in text.split_inclusive('\n') {
    let (content, terminator) = split_terminator(line);
    if let Some(caps) = SECTION_LABEL_RE.captures(content) {
      log::trace!("Promoting section label '{}' to heading", &caps[1]);
      out.push_str("## ");
      out.push_str(&caps[1]);
      out.push_str(terminator);
    } else {
      out.push_str(line);
    }
  }

  out
}

fn is_key_value_line(line: &str) -> bool {
  !line.contains('|') && KEY_VALUE_RE.is_match(line)
}

/// Lines a key/value item may sit next to without breaking a paragraph.
fn is_block_boundary(line: &str) -> bool {
  let trimmed = line.trim();
  trimmed.is_empty() || trimmed.starts_with('#') || has_markers(trimmed)
}

/// Rewrite standalone `Key: value` lines as bold-keyed list items.
///
/// A line qualifies only when it is not part of a larger paragraph: each
/// neighbour must be blank, a heading, a fence placeholder or another
/// key/value line. Keys are at most four words and start with a letter, which
/// rules out list items, headings, blockquotes and indented code. Lines with
/// table pipes and URL schemes (`https://`, where no whitespace follows the
/// colon) never match.
#[must_use]
pub fn key_value_lists(text: &str) -> String {
  let lines: Vec<&str> = text.split_inclusive('\n').collect();
  let contents: Vec<&str> =
    lines.iter().map(|line| split_terminator(line).0).collect();
  let candidates: Vec<bool> =
    contents.iter().map(|line| is_key_value_line(line)).collect();

  let fits = |index: Option<usize>| {
    index
      .and_then(|i| contents.get(i).map(|line| (i, line)))
      .is_none_or(|(i, line)| candidates[i] || is_block_boundary(line))
  };

  let mut out = String::with_capacity(text.len() + lines.len() * 6);
  for (i, line) in lines.iter().enumerate() {
    let standalone = candidates[i] && fits(i.checked_sub(1)) && fits(Some(i + 1));
    let caps = standalone
      .then(|| KEY_VALUE_RE.captures(contents[i]))
      .flatten();

    match caps {
      Some(caps) => {
        log::trace!("Rewriting key/value line '{}'", &caps[1]);
        out.push_str("- **");
        out.push_str(&caps[1]);
        out.push_str(":** ");
        out.push_str(&caps[2]);
        out.push_str(split_terminator(line).1);
      },
      None => out.push_str(line),
    }
  }

  out
}
