//! Code fence isolation.
//!
//! Fenced code regions are lifted out of the text and replaced by opaque
//! placeholder markers so that text heuristics never see (or rewrite) literal
//! code. Restoration puts the exact original fence text back, except for the
//! opening line of a fence whose language was relabeled in between.
use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;

use crate::utils::{
  codeblock::{FenceTracker, parse_fence_line, split_terminator},
  never_matching_regex,
};

const MARKER_START: char = '\u{E000}';
const MARKER_END: char = '\u{E001}';

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new("\u{E000}FENCE(\\d+)\u{E001}").unwrap_or_else(|e| {
    log::error!("Failed to compile MARKER_RE regex: {e}");
    never_matching_regex()
  })
});

/// A fenced code region lifted out of the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceToken {
  /// Position of this token's marker, unique within one render.
  pub index:    usize,
  /// Language from the info string, if the fence declared one.
  pub language: Option<String>,
  /// Everything between the opening and closing fence lines, verbatim.
  pub body:     String,
  opening:      String,
  closing:      String,
}

impl FenceToken {
  /// Build a token for a fence that did not exist in the source text.
  #[must_use]
  pub fn synthesize(index: usize, language: &str, body: &str) -> Self {
    let mut body = body.to_string();
    if !body.is_empty() && !body.ends_with('\n') {
      body.push('\n');
    }
    Self {
      index,
      language: Some(language.to_string()),
      body,
      opening: format!("```{language}\n"),
      closing: "```".to_string(),
    }
  }

  /// The placeholder text standing in for this fence.
  #[must_use]
  pub fn marker(&self) -> String {
    format!("{MARKER_START}FENCE{}{MARKER_END}", self.index)
  }

  /// Replace the declared language, rewriting the opening fence line.
  ///
  /// Anything after the first word of the info string is preserved.
  pub fn relabel(&mut self, language: &str) {
    let (line, terminator) = split_terminator(&self.opening);
    let Some(marker) = parse_fence_line(line) else {
      return;
    };
    let rest = marker
      .info
      .split_once(char::is_whitespace)
      .map(|(_, rest)| rest.trim_start())
      .filter(|rest| !rest.is_empty());

    let mut opening = format!("{}{}{language}", marker.indent, marker.run);
    if let Some(rest) = rest {
      opening.push(' ');
      opening.push_str(rest);
    }
    opening.push_str(terminator);

    self.opening = opening;
    self.language = Some(language.to_string());
  }

  /// The complete fence as markdown, without the closing line terminator.
  #[must_use]
  pub fn to_markdown(&self) -> String {
    let mut out =
      String::with_capacity(self.opening.len() + self.body.len() + 4);
    out.push_str(&self.opening);
    out.push_str(&self.body);
    out.push_str(&self.closing);
    out
  }
}

/// Replace every balanced fenced region with a placeholder marker.
///
/// Marker indices start at zero. Unbalanced fences are left in the text.
#[must_use]
pub fn extract_fences(text: &str) -> (String, Vec<FenceToken>) {
  extract_fences_from(text, 0)
}

/// Like [`extract_fences`], numbering markers from `first_index`.
///
/// Used when fences are extracted again from already-protected text, so new
/// markers never collide with the ones that are still in place.
#[must_use]
pub fn extract_fences_from(
  text: &str,
  first_index: usize,
) -> (String, Vec<FenceToken>) {
  let lines: Vec<&str> = text.split_inclusive('\n').collect();
  let mut out = String::with_capacity(text.len());
  let mut tokens = Vec::new();
  let mut i = 0;

  while i < lines.len() {
    let (content, _) = split_terminator(lines[i]);
    let Some(marker) = parse_fence_line(content) else {
      out.push_str(lines[i]);
      i += 1;
      continue;
    };

    let tracker = FenceTracker::new().process_line(content);
    let closing_at = (i + 1..lines.len())
      .find(|&j| tracker.closes(split_terminator(lines[j]).0));

    let Some(j) = closing_at else {
      out.push_str(lines[i]);
      i += 1;
      continue;
    };

    let (closing, terminator) = split_terminator(lines[j]);
    let token = FenceToken {
      index:    first_index + tokens.len(),
      language: marker.language().map(str::to_string),
      body:     lines[i + 1..j].concat(),
      opening:  lines[i].to_string(),
      closing:  closing.to_string(),
    };
    out.push_str(&token.marker());
    out.push_str(terminator);
    tokens.push(token);
    i = j + 1;
  }

  (out, tokens)
}

/// Put every fence back in place of its marker, in a single pass.
///
/// Markers whose token is missing are left untouched.
#[must_use]
pub fn restore_fences(text: &str, tokens: &[FenceToken]) -> String {
  if tokens.is_empty() {
    return text.to_string();
  }

  let by_index: HashMap<usize, &FenceToken> =
    tokens.iter().map(|token| (token.index, token)).collect();

  MARKER_RE
    .replace_all(text, |caps: &regex::Captures| {
      caps[1]
        .parse::<usize>()
        .ok()
        .and_then(|index| by_index.get(&index))
        .map_or_else(|| caps[0].to_string(), |token| token.to_markdown())
    })
    .into_owned()
}

/// Whether the text contains any fence placeholder marker.
#[must_use]
pub fn has_markers(text: &str) -> bool {
  text.contains(MARKER_START)
}

/// Collapse doubled fence openings into a single fence.
///
/// Some documents label a block twice, producing an outer fence whose body is
/// itself a labelled fence:
///
/// ````markdown
/// ```json
/// ```jsonc
/// {"a": 1}
/// ```
/// ```
/// ````
///
/// The outer opening line and the orphaned extra closing line are removed and
/// the outer label (when present) is carried onto the inner fence. Documents
/// without this artifact are returned unchanged.
#[must_use]
pub fn collapse_double_fences(text: &str) -> String {
  let lines: Vec<&str> = text.split_inclusive('\n').collect();
  let mut out = String::with_capacity(text.len());
  let mut skip = vec![false; lines.len()];
  let mut tracker = FenceTracker::new();
  let mut i = 0;

  while i < lines.len() {
    if skip[i] {
      i += 1;
      continue;
    }

    // only a line that opens a fence can start a doubled fence
    if !tracker.in_code_block()
      && let Some((replacement, drop_at)) = double_fence_at(&lines, i)
    {
      log::trace!("Collapsing doubled fence opening at line {}", i + 1);
      tracker = tracker.process_line(split_terminator(&replacement).0);
      out.push_str(&replacement);
      skip[drop_at] = true;
      // the inner opening line (i + 1) is replaced by `replacement`
      i += 2;
      continue;
    }

    tracker = tracker.process_line(split_terminator(lines[i]).0);
    out.push_str(lines[i]);
    i += 1;
  }

  out
}

/// Detect a doubled fence starting at `i`.
///
/// Returns the merged opening line and the index of the extra closing line.
fn double_fence_at(lines: &[&str], i: usize) -> Option<(String, usize)> {
  let (outer_line, _) = split_terminator(lines.get(i)?);
  let outer = parse_fence_line(outer_line)?;
  let (inner_line, inner_terminator) = split_terminator(lines.get(i + 1)?);
  let inner = parse_fence_line(inner_line)?;

  if inner.fence_char != outer.fence_char || inner.info.is_empty() {
    return None;
  }

  let tracker = FenceTracker::new().process_line(inner_line);
  let inner_close = (i + 2..lines.len())
    .find(|&k| tracker.closes(split_terminator(lines[k]).0))?;

  let outer_tracker = FenceTracker::new().process_line(outer_line);
  let extra_close = (inner_close + 1..lines.len())
    .find(|&k| !lines[k].trim().is_empty())
    .filter(|&k| outer_tracker.closes(split_terminator(lines[k]).0))?;

  let label = outer.language().or_else(|| inner.language())?;
  let rest = inner
    .info
    .split_once(char::is_whitespace)
    .map(|(_, rest)| rest.trim_start())
    .filter(|rest| !rest.is_empty());

  let mut merged = format!("{}{}{label}", inner.indent, inner.run);
  if let Some(rest) = rest {
    merged.push(' ');
    merged.push_str(rest);
  }
  merged.push_str(inner_terminator);

  Some((merged, extra_close))
}
