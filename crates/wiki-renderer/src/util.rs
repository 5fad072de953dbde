//! Shared utility functions for markdown rendering.

use std::fmt::Write;
use std::sync::LazyLock;

use pulldown_cmark::HeadingLevel;
use regex::Regex;

use crate::state::escape_html;

/// Bare URLs recognised by linkify. Trailing punctuation is left out of the match.
static BARE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:https?://|www\.)[^\s<>"]*[^\s<>"'.,:;!?)\]]"#).unwrap()
});

/// Split a slash-separated path into its directory and final element.
///
/// Mirrors POSIX `dirname`/`basename` for the cases links produce:
///
/// ```
/// use wiki_renderer::split_dir_base;
///
/// assert_eq!(split_dir_base("/team/spec.pdf"), ("/team", "spec.pdf"));
/// assert_eq!(split_dir_base("/spec.pdf"), ("/", "spec.pdf"));
/// assert_eq!(split_dir_base("spec.pdf"), (".", "spec.pdf"));
/// ```
#[must_use]
pub fn split_dir_base(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some(("", base)) => ("/", base),
        Some((dir, base)) => (dir, base),
        None => (".", path),
    }
}

/// Escape `text` for HTML and wrap bare URLs in anchors.
pub(crate) fn linkify(text: &str, out: &mut String) -> std::fmt::Result {
    let mut last = 0;
    for url in BARE_URL_RE.find_iter(text) {
        // Require a boundary before the match so `xhttp://` stays text.
        let preceded_by_word = text[..url.start()]
            .chars()
            .next_back()
            .is_some_and(char::is_alphanumeric);
        if preceded_by_word {
            continue;
        }

        out.push_str(&escape_html(&text[last..url.start()]));
        let end = balanced_paren_end(text, url.start(), url.end());
        let shown = &text[url.start()..end];
        let href = if shown.starts_with("www.") {
            format!("http://{shown}")
        } else {
            shown.to_owned()
        };
        write!(
            out,
            r#"<a href="{}">{}</a>"#,
            escape_html(&href),
            escape_html(shown)
        )?;
        last = end;
    }
    out.push_str(&escape_html(&text[last..]));
    Ok(())
}

/// Extend a match over closing parens that balance an opening one inside it,
/// as in `https://en.wikipedia.org/wiki/Rust_(programming_language)`.
fn balanced_paren_end(text: &str, start: usize, mut end: usize) -> usize {
    let mut depth = text[start..end].chars().fold(0isize, |depth, c| match c {
        '(' => depth + 1,
        ')' => depth - 1,
        _ => depth,
    });
    while depth > 0 && text[end..].starts_with(')') {
        end += 1;
        depth -= 1;
    }
    end
}

/// Convert heading level enum to number (1-6).
#[must_use]
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
