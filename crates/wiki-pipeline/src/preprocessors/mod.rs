//! Built-in preprocessors.
//!
//! All of them work line by line on prose only: fenced code blocks and
//! inline code spans are copied through untouched.

mod attachments;
mod highlight;
mod task_list;

pub use attachments::Attachments;
pub use highlight::Highlight;
pub use task_list::TaskList;

use wiki_blocks::FenceTracker;

/// Apply `transform` to every line outside fenced code blocks.
///
/// Lines keep their terminators; fence lines themselves are never transformed.
pub(crate) fn map_prose_lines(body: &str, mut transform: impl FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(body.len());
    let mut fences = FenceTracker::new();

    for line in body.split_inclusive('\n') {
        if fences.update(line) || fences.in_fence() {
            out.push_str(line);
        } else {
            out.push_str(&transform(line));
        }
    }

    out
}

/// Apply `transform` to the parts of `line` that are not inline code.
///
/// A backtick run opens a code span only if a run of the same length closes
/// it later on the line; unmatched backticks are ordinary text.
pub(crate) fn map_outside_code_spans(
    line: &str,
    mut transform: impl FnMut(&str) -> String,
) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(start) = rest.find('`') {
        let run = rest[start..].bytes().take_while(|&b| b == b'`').count();
        let Some(close) = find_backtick_run(&rest[start + run..], run) else {
            break;
        };

        let end = start + run + close + run;
        out.push_str(&transform(&rest[..start]));
        out.push_str(&rest[start..end]);
        rest = &rest[end..];
    }
    out.push_str(&transform(rest));

    out
}

/// Byte offset of the first backtick run of exactly `len` in `text`.
fn find_backtick_run(text: &str, len: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let run = bytes[i..].iter().take_while(|&&b| b == b'`').count();
            if run == len {
                return Some(i);
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shout(text: &str) -> String {
        text.to_uppercase()
    }

    #[test]
    fn test_prose_lines_skip_fences() {
        let input = "a\n```rust\nlet x = 1;\n```\nb\n";
        assert_eq!(
            map_prose_lines(input, shout),
            "A\n```rust\nlet x = 1;\n```\nB\n"
        );
    }

    #[test]
    fn test_prose_lines_unterminated_fence() {
        assert_eq!(map_prose_lines("a\n~~~\nb\nc", shout), "A\n~~~\nb\nc");
    }

    #[test]
    fn test_code_spans_are_kept() {
        assert_eq!(
            map_outside_code_spans("a `b` c ``d ` e`` f", shout),
            "A `b` C ``d ` e`` F"
        );
    }

    #[test]
    fn test_unmatched_backticks_are_text() {
        assert_eq!(map_outside_code_spans("a ``b` c", shout), "A ``B` C");
    }
}
