//! Link node hook.
//!
//! A [`LinkRenderer`] owns the markup of every inline or reference link the
//! renderer meets. The renderer calls [`enter`](LinkRenderer::enter) once the
//! whole link has been read (so the hook can see its text), optionally renders
//! the link's children, then calls [`leave`](LinkRenderer::leave).
//!
//! A hook that writes the display text itself MUST return
//! [`WalkStatus::SkipChildren`] from `enter`; returning
//! [`WalkStatus::Continue`] makes the renderer emit the children as well and
//! the text appears twice.
//!
//! Autolinks (`<https://...>`) and linkified bare URLs are not links in this
//! sense and never reach the hook.

use std::fmt::Write;

use crate::state::escape_html;
use crate::util::split_dir_base;

/// File-serving route that attachments live under.
pub const FILES_PREFIX: &str = "/api/files";

/// [`FILES_PREFIX`] as a directory; only paths below it are attachments.
const FILES_DIR: &str = "/api/files/";

/// Extension of documents opened in the built-in PDF viewer.
const PDF_EXTENSION: &str = ".pdf";

/// What the renderer does with a link's children after [`LinkRenderer::enter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkStatus {
    /// Render the children between `enter` and `leave`.
    Continue,
    /// Drop the children; the hook already wrote the visible text.
    SkipChildren,
}

/// A link as seen by the hook.
#[derive(Clone, Copy, Debug)]
pub struct LinkNode<'a> {
    /// Destination exactly as written in the document.
    pub dest_url: &'a str,
    /// Link title (`[text](url "title")`), empty if absent.
    pub title: &'a str,
    /// Plain text of the link's children, unescaped.
    pub text: &'a str,
}

/// Render-time hook for link nodes.
pub trait LinkRenderer: Send + Sync {
    /// Called when entering a link node.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    fn enter(&self, link: &LinkNode<'_>, out: &mut String) -> Result<WalkStatus, std::fmt::Error>;

    /// Called when leaving a link node, whatever `enter` returned.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    fn leave(&self, link: &LinkNode<'_>, out: &mut String) -> std::fmt::Result;
}

/// Link hook that sends attached PDFs to the viewer and everything else to a
/// new browsing context.
///
/// - `/api/files/team/spec.pdf` → `<a href="/team?mode=pdf&file=spec.pdf">`
/// - anything else → `<a href="..." target="_blank">`
///
/// Both prefix and extension are matched case-insensitively.
#[derive(Clone, Copy, Debug, Default)]
pub struct PdfLinkRenderer;

impl PdfLinkRenderer {
    /// Viewer href for a file-serving PDF link, or `None` if `dest` is not one.
    #[must_use]
    pub fn viewer_href(dest: &str) -> Option<String> {
        let prefix = dest.get(..FILES_DIR.len())?;
        if !prefix.eq_ignore_ascii_case(FILES_DIR) {
            return None;
        }
        let suffix_start = dest.len().checked_sub(PDF_EXTENSION.len())?;
        let suffix = dest.get(suffix_start..)?;
        if !suffix.eq_ignore_ascii_case(PDF_EXTENSION) {
            return None;
        }

        let stripped = &dest[FILES_PREFIX.len()..];
        let (dir, base) = split_dir_base(stripped);
        Some(format!(
            "{}?mode=pdf&file={}",
            escape_html(dir),
            escape_html(base)
        ))
    }
}

impl LinkRenderer for PdfLinkRenderer {
    fn enter(&self, link: &LinkNode<'_>, out: &mut String) -> Result<WalkStatus, std::fmt::Error> {
        let text = escape_html(link.text);
        match Self::viewer_href(link.dest_url) {
            Some(href) => write!(out, r#"<a href="{href}">{text}"#)?,
            None => write!(
                out,
                r#"<a href="{}" target="_blank">{text}"#,
                escape_html(link.dest_url)
            )?,
        }
        Ok(WalkStatus::SkipChildren)
    }

    fn leave(&self, _link: &LinkNode<'_>, out: &mut String) -> std::fmt::Result {
        out.push_str("</a>");
        Ok(())
    }
}
