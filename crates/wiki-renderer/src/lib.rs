//! Markdown to HTML conversion for wiki documents.
//!
//! This crate provides a generic [`MarkdownRenderer`] that walks
//! `pulldown-cmark` events and produces HTML through the [`RenderBackend`]
//! trait, plus the [`MarkupEngine`] seam the document pipeline converts with.
//!
//! # Architecture
//!
//! - [`HtmlBackend`]: semantic HTML5 for code blocks, alerts, images and footnotes
//! - [`LinkRenderer`]: hook that owns the markup of link nodes
//! - [`PdfLinkRenderer`]: sends attached PDFs to the viewer, other links to a new tab
//! - [`WikiMarkdown`]: the wiki dialect, wiring the above together
//!
//! # Example
//!
//! ```
//! use wiki_renderer::{MarkupEngine, WikiMarkdown};
//!
//! let html = WikiMarkdown::default()
//!     .convert("[Spec](/api/files/team/spec.pdf)")
//!     .unwrap();
//! assert_eq!(html, r#"<p><a href="/team?mode=pdf&file=spec.pdf">Spec</a></p>"#);
//! ```

mod backend;
mod engine;
mod html;
mod link;
mod renderer;
mod state;
mod util;

pub use backend::{AlertKind, RenderBackend};
pub use engine::{ConvertError, EngineOptions, MarkupEngine, WikiMarkdown};
pub use html::HtmlBackend;
pub use link::{FILES_PREFIX, LinkNode, LinkRenderer, PdfLinkRenderer, WalkStatus};
pub use renderer::MarkdownRenderer;
pub use state::{escape_html, slugify};
pub use util::split_dir_base;

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(WikiMarkdown: Send, Sync);
    static_assertions::assert_impl_all!(PdfLinkRenderer: Send, Sync);
    static_assertions::assert_impl_all!(ConvertError: Send, Sync);
}
