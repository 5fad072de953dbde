//! Wiki document rendering pipeline.
//!
//! Raw document text goes through:
//!
//! 1. frontmatter splitting, which picks the layout
//! 2. for the default layout: the [`PreprocessorRegistry`], block
//!    extraction, markdown conversion with the PDF link hook, then diagram
//!    and directional block restoration
//! 3. for `kanban` and `links`: the matching layout renderer
//!
//! The result is always HTML. Content problems degrade to a fallback
//! rendering or a visible error fragment; only [`render_file`] can fail, when
//! the file cannot be read.
//!
//! # Example
//!
//! ```
//! let html = wiki_pipeline::render_document("Some ==important== text", None);
//! assert_eq!(html, "<p>Some <mark>important</mark> text</p>");
//! ```

mod file;
mod pipeline;
mod preprocessors;
mod registry;

use std::path::Path;
use std::sync::LazyLock;

pub use file::{RenderError, document_path};
pub use pipeline::Pipeline;
pub use preprocessors::{Attachments, Highlight, TaskList};
pub use registry::{Preprocessor, PreprocessorRegistry, RegistryError, global, install};

static DEFAULT_PIPELINE: LazyLock<Pipeline> = LazyLock::new(Pipeline::default);

/// Render document text with the default pipeline.
///
/// `doc_path` locates the document under the content root (`team/page`) and
/// is used to resolve relative attachment links.
#[must_use]
pub fn render_document(text: &str, doc_path: Option<&str>) -> String {
    DEFAULT_PIPELINE.render(text, doc_path.unwrap_or_default())
}

/// Render document text that has no location, such as an editor preview.
#[must_use]
pub fn render_preview(text: &str) -> String {
    DEFAULT_PIPELINE.render_preview(text)
}

/// Read and render a file under the default content root (`data/documents`).
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the file cannot be read.
pub fn render_file(path: &Path) -> Result<String, RenderError> {
    DEFAULT_PIPELINE.render_file(path)
}
