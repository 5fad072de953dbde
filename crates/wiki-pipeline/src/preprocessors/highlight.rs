//! `==text==` to `<mark>`.

use std::sync::LazyLock;

use regex::Regex;

use super::{map_outside_code_spans, map_prose_lines};
use crate::registry::Preprocessor;

/// The marked text may not start or end with whitespace, nor contain `=`.
static HIGHLIGHT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"==([^=\s](?:[^=]*[^=\s])?)==").unwrap());

#[derive(Clone, Copy, Debug, Default)]
pub struct Highlight;

impl Preprocessor for Highlight {
    fn name(&self) -> &'static str {
        "highlight"
    }

    fn process(&self, body: &str, _doc_path: &str) -> String {
        map_prose_lines(body, |line| {
            map_outside_code_spans(line, |text| {
                HIGHLIGHT_RE.replace_all(text, "<mark>$1</mark>").into_owned()
            })
        })
    }
}
