//! Code fence recognition for line-by-line scanning.
//!
//! Used by block extraction and by text transforms that must leave code alone.
//!
//! Code fences in `CommonMark` use backticks or tildes (three or more). The
//! closing fence must use the same character and be at least as long as the
//! opening fence.

/// An opening fence line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OpeningFence<'a> {
    /// Character used for the fence (backtick or tilde).
    pub(crate) marker: char,
    /// Length of the fence run (minimum length for closing).
    pub(crate) len: usize,
    /// Whitespace before the fence.
    pub(crate) indent: &'a str,
    /// Info string after the fence, trimmed.
    pub(crate) info: &'a str,
}

impl OpeningFence<'_> {
    /// First word of the info string (`mermaid` in ```` ```mermaid title=x ````).
    pub(crate) fn language(&self) -> &str {
        self.info.split_whitespace().next().unwrap_or_default()
    }

    /// Check if `line` closes this fence.
    pub(crate) fn is_closed_by(&self, line: &str) -> bool {
        is_closing_fence(line, self.marker, self.len)
    }

    /// Remove the fence's indentation from a content line.
    pub(crate) fn strip_indent<'l>(&self, line: &'l str) -> &'l str {
        let width = self.indent.chars().count();
        let skip = line
            .char_indices()
            .take(width)
            .take_while(|(_, c)| *c == ' ' || *c == '\t')
            .last()
            .map_or(0, |(i, c)| i + c.len_utf8());
        &line[skip..]
    }
}

/// Tracks code fence state during line-by-line processing.
///
/// Lets text transforms skip the inside of fenced code blocks.
#[derive(Debug, Default)]
pub struct FenceTracker {
    /// Character and length of the open fence.
    open: Option<(char, usize)>,
}

impl FenceTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if currently inside a fenced code block.
    #[must_use]
    pub fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Update fence state based on a line.
    ///
    /// Returns `true` if the line is a fence marker (opening or closing).
    pub fn update(&mut self, line: &str) -> bool {
        match self.open {
            Some((marker, len)) => {
                let closing = is_closing_fence(line, marker, len);
                if closing {
                    self.open = None;
                }
                closing
            }
            None => match parse_opening(line) {
                Some(fence) => {
                    self.open = Some((fence.marker, fence.len));
                    true
                }
                None => false,
            },
        }
    }
}

/// Columns before the first non-blank character; tabs stop every 4 columns.
fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .fold(0, |col, c| if c == '\t' { col + 4 - col % 4 } else { col + 1 })
}

/// Content column of a list item line (`- x`, `10. x`), if it is one.
fn list_item_content_column(line: &str) -> Option<usize> {
    let indent = indent_width(line);
    let trimmed = line.trim_start_matches([' ', '\t']);
    let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    let marker_len = match trimmed.as_bytes().get(digits)? {
        b'-' | b'*' | b'+' if digits == 0 => 1,
        b'.' | b')' if (1..=9).contains(&digits) => digits + 1,
        _ => return None,
    };

    let rest = &trimmed[marker_len..];
    let spaces = rest.chars().take_while(|c| *c == ' ').count();
    if rest.trim().is_empty() || spaces > 4 {
        Some(indent + marker_len + 1)
    } else if spaces == 0 {
        None
    } else {
        Some(indent + marker_len + spaces)
    }
}

/// Tracks the list items enclosing each line, so that an indented fence
/// inside a list item is told apart from an indented code block.
#[derive(Debug, Default)]
pub(crate) struct ListContext {
    /// Content columns of the open list items, outermost first.
    columns: Vec<usize>,
    after_blank: bool,
}

impl ListContext {
    /// Feed the next line outside fenced blocks.
    pub(crate) fn observe(&mut self, line: &str) {
        if line.trim().is_empty() {
            self.after_blank = true;
            return;
        }

        let indent = indent_width(line);
        if self.after_blank {
            while self.columns.last().is_some_and(|&col| indent < col) {
                self.columns.pop();
            }
        }
        if let Some(col) = list_item_content_column(line) {
            while self.columns.last().is_some_and(|&open| open > indent) {
                self.columns.pop();
            }
            self.columns.push(col);
        }
        self.after_blank = false;
    }

    /// Whether a fence on `line` opens a fenced block rather than sitting in
    /// indented code (4+ columns past the enclosing content column).
    pub(crate) fn allows_fence(&self, line: &str) -> bool {
        let indent = indent_width(line);
        let base = self
            .columns
            .iter()
            .rev()
            .find(|&&col| col <= indent)
            .copied()
            .unwrap_or(0);
        indent - base < 4
    }
}

/// Check if a line is a valid closing fence.
///
/// The closing fence must:
/// - Use the same character as opening
/// - Be at least as long as opening
/// - Contain only fence characters (optionally followed by whitespace)
fn is_closing_fence(line: &str, marker: char, min_len: usize) -> bool {
    let trimmed = line.trim_start();
    let count = trimmed.chars().take_while(|&c| c == marker).count();
    if count < min_len {
        return false;
    }
    // Fence characters are ASCII, so `count` is also a byte offset.
    trimmed[count..].chars().all(char::is_whitespace)
}

/// Detect if a line opens a code fence.
pub(crate) fn parse_opening(line: &str) -> Option<OpeningFence<'_>> {
    let trimmed = line.trim_start();
    let indent = &line[..line.len() - trimmed.len()];

    let marker = trimmed.chars().next()?;
    if marker != '`' && marker != '~' {
        return None;
    }

    let len = trimmed.chars().take_while(|&c| c == marker).count();
    if len < 3 {
        return None;
    }

    let info = trimmed[len..].trim();
    // A backtick fence's info string cannot contain backticks (it would be inline code).
    if marker == '`' && info.contains('`') {
        return None;
    }

    Some(OpeningFence {
        marker,
        len,
        indent,
        info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backtick_fence_with_language() {
        let fence = parse_opening("```mermaid\n").unwrap();
        assert_eq!(fence.marker, '`');
        assert_eq!(fence.len, 3);
        assert_eq!(fence.indent, "");
        assert_eq!(fence.language(), "mermaid");
    }

    #[test]
    fn test_tilde_fence_with_attributes() {
        let fence = parse_opening("~~~~rtl dir=auto").unwrap();
        assert_eq!(fence.marker, '~');
        assert_eq!(fence.len, 4);
        assert_eq!(fence.language(), "rtl");
    }

    #[test]
    fn test_fence_without_language() {
        let fence = parse_opening("```").unwrap();
        assert_eq!(fence.language(), "");
    }

    #[test]
    fn test_indented_fence() {
        let fence = parse_opening("  ```mermaid").unwrap();
        assert_eq!(fence.indent, "  ");
        assert!(fence.is_closed_by("  ```"));
        assert!(fence.is_closed_by("```"));
    }

    #[test]
    fn test_regular_line_no_fence() {
        assert!(parse_opening("This is a regular line").is_none());
        assert!(parse_opening("``inline code``").is_none());
        assert!(parse_opening("```foo`bar").is_none());
    }

    #[test]
    fn test_closing_fence_rules() {
        let fence = parse_opening("````").unwrap();
        // Shorter fence doesn't close
        assert!(!fence.is_closed_by("```"));
        // Wrong char doesn't close
        assert!(!fence.is_closed_by("~~~~"));
        // Info string doesn't close
        assert!(!fence.is_closed_by("````rust"));
        // Longer fence and trailing whitespace close
        assert!(fence.is_closed_by("`````  \r\n"));
    }

    #[test]
    fn test_tracker_skips_fence_contents() {
        let mut tracker = FenceTracker::new();
        assert!(!tracker.update("text"));
        assert!(!tracker.in_fence());

        assert!(tracker.update("````md"));
        assert!(tracker.in_fence());
        assert!(!tracker.update("```"));
        assert!(tracker.in_fence());

        assert!(tracker.update("````"));
        assert!(!tracker.in_fence());
    }

    fn fence_allowed(markdown: &str) -> Vec<bool> {
        let mut context = ListContext::default();
        markdown
            .lines()
            .filter_map(|line| {
                context.observe(line);
                parse_opening(line).map(|_| context.allows_fence(line))
            })
            .collect()
    }

    #[test]
    fn test_indent_width_expands_tabs() {
        assert_eq!(indent_width("  x"), 2);
        assert_eq!(indent_width("\tx"), 4);
        assert_eq!(indent_width("  \tx"), 4);
    }

    #[test]
    fn test_list_item_content_column() {
        assert_eq!(list_item_content_column("- item"), Some(2));
        assert_eq!(list_item_content_column("  10. item"), Some(6));
        assert_eq!(list_item_content_column("1)   item"), Some(5));
        assert_eq!(list_item_content_column("-item"), None);
        assert_eq!(list_item_content_column("plain"), None);
    }

    #[test]
    fn test_deeply_indented_fence_is_code() {
        assert_eq!(fence_allowed("Example:\n\n    ```mermaid\n"), [false]);
        assert_eq!(fence_allowed("   ```mermaid\n"), [true]);
    }

    #[test]
    fn test_fence_inside_list_item() {
        assert_eq!(fence_allowed("- item\n\n    ```mermaid\n"), [true]);
        assert_eq!(fence_allowed("- item\n\n      ```mermaid\n"), [false]);
    }

    #[test]
    fn test_list_ends_at_outdented_paragraph() {
        assert_eq!(
            fence_allowed("- item\n\nText\n\n    ```mermaid\n"),
            [false]
        );
    }

    #[test]
    fn test_strip_indent() {
        let fence = parse_opening("   ```mermaid").unwrap();
        assert_eq!(fence.strip_indent("     graph TD\n"), "  graph TD\n");
        assert_eq!(fence.strip_indent(" A\n"), "A\n");
        assert_eq!(fence.strip_indent("B\n"), "B\n");
    }
}
