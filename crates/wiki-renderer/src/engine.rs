//! Markup engine seam.
//!
//! The document pipeline only needs "markdown in, HTML out". [`MarkupEngine`]
//! is that contract; [`WikiMarkdown`] is the engine documents are rendered with.

use std::sync::Arc;

use crate::html::HtmlBackend;
use crate::link::{LinkRenderer, PdfLinkRenderer};
use crate::renderer::MarkdownRenderer;

/// Error produced when markdown cannot be converted.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Writing to the output buffer failed.
    #[error("failed to write html: {0}")]
    Format(#[from] std::fmt::Error),
    /// The event stream closed a link that was never opened, or left one open.
    #[error("malformed link structure in event stream")]
    UnbalancedLink,
}

/// Converts markdown text to HTML.
pub trait MarkupEngine: Send + Sync {
    /// Convert `markdown` to an HTML fragment.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] if conversion fails.
    fn convert(&self, markdown: &str) -> Result<String, ConvertError>;
}

/// Engine switches that are not fixed by the wiki dialect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    /// Single newlines inside paragraphs become `<br>`.
    pub hard_wraps: bool,
    /// Bare URLs in text become anchors.
    pub linkify: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            hard_wraps: true,
            linkify: true,
        }
    }
}

/// The wiki's markdown dialect.
///
/// `CommonMark` plus tables, strikethrough, footnotes, definition lists,
/// heading ids and attributes, GitHub alerts and raw HTML passthrough.
/// Links go through [`PdfLinkRenderer`] unless another hook is installed.
#[derive(Clone)]
pub struct WikiMarkdown {
    options: EngineOptions,
    link_renderer: Arc<dyn LinkRenderer>,
}

impl WikiMarkdown {
    #[must_use]
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            link_renderer: Arc::new(PdfLinkRenderer),
        }
    }

    /// Replace the link hook.
    #[must_use]
    pub fn with_link_renderer(mut self, link_renderer: Arc<dyn LinkRenderer>) -> Self {
        self.link_renderer = link_renderer;
        self
    }

    #[must_use]
    pub fn options(&self) -> EngineOptions {
        self.options
    }
}

impl Default for WikiMarkdown {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl MarkupEngine for WikiMarkdown {
    fn convert(&self, markdown: &str) -> Result<String, ConvertError> {
        MarkdownRenderer::<HtmlBackend>::new()
            .with_link_renderer(Arc::clone(&self.link_renderer))
            .with_hard_wraps(self.options.hard_wraps)
            .with_linkify(self.options.linkify)
            .render_markdown(markdown)
    }
}
