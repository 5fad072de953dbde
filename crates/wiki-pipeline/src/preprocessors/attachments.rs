//! Relative link targets to attachment URLs.
//!
//! A page's attachments are served from `/api/files/{doc_path}/`, so
//! `[Spec](spec.pdf)` on page `team/page` becomes
//! `[Spec](/api/files/team/page/spec.pdf)`. Absolute paths, URLs with a
//! scheme, fragments and queries are left alone.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use wiki_renderer::FILES_PREFIX;

use super::{map_outside_code_spans, map_prose_lines};
use crate::registry::Preprocessor;

/// `[text](target "title")` and `![alt](target)`.
static LINK_TARGET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(!?\[[^\]]*\])\(([^)\s]+)((?:\s+"[^"]*")?)\)"#).unwrap()
});

/// `scheme:` at the start of a target.
static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").unwrap());

/// Rewrites relative link and image targets to the page's attachment route.
#[derive(Clone, Copy, Debug, Default)]
pub struct Attachments;

impl Preprocessor for Attachments {
    fn name(&self) -> &'static str {
        "attachments"
    }

    fn process(&self, body: &str, doc_path: &str) -> String {
        let doc_path = doc_path.trim_matches('/');
        if doc_path.is_empty() {
            return body.to_owned();
        }

        map_prose_lines(body, |line| {
            map_outside_code_spans(line, |text| rewrite_targets(text, doc_path))
        })
    }
}

fn rewrite_targets(text: &str, doc_path: &str) -> String {
    LINK_TARGET_RE
        .replace_all(text, |caps: &Captures<'_>| {
            match attachment_url(&caps[2], doc_path) {
                Some(url) => format!("{}({url}{})", &caps[1], &caps[3]),
                None => caps[0].to_owned(),
            }
        })
        .into_owned()
}

/// Attachment URL for `target` on page `doc_path`.
///
/// `.` segments are dropped and `..` climbs out of the page directory.
/// Returns `None` for targets that are not relative, or that climb above
/// the files root.
fn attachment_url(target: &str, doc_path: &str) -> Option<String> {
    if !is_relative(target) {
        return None;
    }

    let (path, suffix) = target
        .find(['?', '#'])
        .map_or((target, ""), |i| target.split_at(i));

    let mut segments: Vec<&str> = doc_path.split('/').filter(|s| !s.is_empty()).collect();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            name => segments.push(name),
        }
    }

    Some(format!("{FILES_PREFIX}/{}{suffix}", segments.join("/")))
}

fn is_relative(target: &str) -> bool {
    !target.starts_with(['/', '#', '?', '<']) && !SCHEME_RE.is_match(target)
}
