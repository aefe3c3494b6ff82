/// A code fence line split into its parts.
///
/// The line must be given without its line terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceMarker<'a> {
  /// Leading whitespace before the fence run.
  pub indent:     &'a str,
  /// The run of fence characters (three or more).
  pub run:        &'a str,
  /// Either '`' or '~'.
  pub fence_char: char,
  /// Info string after the run, trimmed.
  pub info:       &'a str,
}

impl FenceMarker<'_> {
  /// Number of fence characters in the run.
  #[must_use]
  pub const fn count(&self) -> usize {
    self.run.len()
  }

  /// First word of the info string, if any.
  #[must_use]
  pub fn language(&self) -> Option<&str> {
    self.info.split_whitespace().next()
  }
}

/// Split a line into its content and its terminator (`"\n"`, `"\r\n"` or
/// nothing).
pub(crate) fn split_terminator(line: &str) -> (&str, &str) {
  if let Some(content) = line.strip_suffix("\r\n") {
    (content, "\r\n")
  } else if let Some(content) = line.strip_suffix('\n') {
    (content, "\n")
  } else {
    (line, "")
  }
}

/// Parse a line as a code fence marker.
///
/// Returns `None` for anything that is not a run of at least three backticks
/// or tildes. Backtick fences may not carry backticks in their info string.
#[must_use]
pub fn parse_fence_line(line: &str) -> Option<FenceMarker<'_>> {
  let line = line.strip_suffix('\r').unwrap_or(line);
  let trimmed = line.trim_start_matches([' ', '\t']);
  let indent = &line[..line.len() - trimmed.len()];

  let fence_char = trimmed.chars().next()?;
  if fence_char != '`' && fence_char != '~' {
    return None;
  }

  let count = trimmed.chars().take_while(|&c| c == fence_char).count();
  if count < 3 {
    return None;
  }

  // fence chars are ASCII, so count == byte length
  let (run, rest) = trimmed.split_at(count);
  let info = rest.trim();
  if fence_char == '`' && info.contains('`') {
    return None;
  }

  Some(FenceMarker {
    indent,
    run,
    fence_char,
    info,
  })
}

/// State tracking for code fence detection in markdown.
///
/// This tracks whether we're currently inside a fenced code block and
/// maintains the fence character and count for proper closing detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FenceTracker {
  in_code_block:    bool,
  code_fence_char:  Option<char>,
  code_fence_count: usize,
}

impl FenceTracker {
  /// Create a new fence tracker.
  #[must_use]
  pub const fn new() -> Self {
    Self {
      in_code_block:    false,
      code_fence_char:  None,
      code_fence_count: 0,
    }
  }

  /// Check if currently inside a code block.
  #[must_use]
  pub const fn in_code_block(&self) -> bool {
    self.in_code_block
  }

  /// Whether `line` would close the currently open fence.
  #[must_use]
  pub fn closes(&self, line: &str) -> bool {
    if !self.in_code_block {
      return false;
    }
    parse_fence_line(line).is_some_and(|marker| {
      self.code_fence_char == Some(marker.fence_char)
        && marker.count() >= self.code_fence_count
        && marker.info.is_empty()
    })
  }

  /// Process a line and update fence state.
  ///
  /// Returns the updated state after processing the line.
  /// Call this for each line to maintain accurate fence tracking.
  #[must_use]
  pub fn process_line(&self, line: &str) -> Self {
    if self.in_code_block {
      if self.closes(line) {
        return Self::new();
      }
      return *self;
    }

    match parse_fence_line(line) {
      Some(marker) => {
        Self {
          in_code_block:    true,
          code_fence_char:  Some(marker.fence_char),
          code_fence_count: marker.count(),
        }
      },
      None => *self,
    }
  }
}
