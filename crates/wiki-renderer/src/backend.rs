//! Render backend trait for format-specific rendering.
//!
//! The renderer handles structure (paragraphs, lists, tables, inline
//! formatting) itself and asks the backend for the elements whose markup is a
//! matter of taste: code blocks, quotes, alerts, images and footnotes.

use pulldown_cmark::BlockQuoteKind;

/// GitHub-style alert kinds (`> [!NOTE]`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl From<BlockQuoteKind> for AlertKind {
    fn from(kind: BlockQuoteKind) -> Self {
        match kind {
            BlockQuoteKind::Note => Self::Note,
            BlockQuoteKind::Tip => Self::Tip,
            BlockQuoteKind::Important => Self::Important,
            BlockQuoteKind::Warning => Self::Warning,
            BlockQuoteKind::Caution => Self::Caution,
        }
    }
}

/// Backend trait for format-specific rendering operations.
pub trait RenderBackend {
    /// Render a code block.
    ///
    /// # Arguments
    ///
    /// * `lang` - Optional language identifier (e.g., "rust", "python")
    /// * `content` - The code content
    /// * `out` - Output buffer to write to
    fn code_block(lang: Option<&str>, content: &str, out: &mut String) -> std::fmt::Result;

    fn blockquote_start(out: &mut String);

    fn blockquote_end(out: &mut String);

    fn alert_start(kind: AlertKind, out: &mut String) -> std::fmt::Result;

    fn alert_end(kind: AlertKind, out: &mut String);

    /// Render an image.
    ///
    /// `title` is empty when the image has no title.
    fn image(src: &str, alt: &str, title: &str, out: &mut String) -> std::fmt::Result;

    /// Render a footnote reference (`[^label]`) with its display number.
    fn footnote_reference(label: &str, number: usize, out: &mut String) -> std::fmt::Result;

    /// Render the opening of a footnote definition (`[^label]: ...`).
    fn footnote_definition_start(label: &str, number: usize, out: &mut String)
    -> std::fmt::Result;

    fn footnote_definition_end(out: &mut String) {
        out.push_str("</div>");
    }

    /// Render a hard break.
    ///
    /// Also used for soft breaks when hard wraps are enabled.
    fn hard_break(out: &mut String) {
        out.push_str("<br>\n");
    }

    fn horizontal_rule(out: &mut String) {
        out.push_str("<hr>");
    }
}
