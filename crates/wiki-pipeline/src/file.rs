//! Rendering documents from disk.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::pipeline::Pipeline;

/// File name a page directory keeps its text in.
const DOCUMENT_FILE_NAME: &str = "document.md";

/// Error returned when a document file cannot be rendered.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Pipeline {
    /// Read and render a document file.
    ///
    /// The document path is derived from the file's location under the
    /// content root, see [`document_path`].
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Io`] if the file cannot be read.
    pub fn render_file(&self, path: &Path) -> Result<String, RenderError> {
        let text = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc_path = document_path(path, self.content_root());
        tracing::debug!(file = %path.display(), doc_path = %doc_path, "Rendering file");

        Ok(self.render(&text, &doc_path))
    }
}

/// Page path of `file` relative to `root`, with `/` separators.
///
/// The extension is dropped, and a `document.md` stands for its directory:
///
/// - `{root}/team/page.md` → `team/page`
/// - `{root}/team/page/document.md` → `team/page`
///
/// A file outside `root` falls back to the name of its directory.
#[must_use]
pub fn document_path(file: &Path, root: &Path) -> String {
    match relative_to(file, root) {
        Some(relative) => page_path(&relative),
        None => file
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

fn relative_to(file: &Path, root: &Path) -> Option<PathBuf> {
    let relative = match file.strip_prefix(root) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => {
            let file = std::path::absolute(file).ok()?;
            let root = std::path::absolute(root).ok()?;
            file.strip_prefix(&root).ok()?.to_path_buf()
        }
    };

    if relative.components().any(|c| c == Component::ParentDir) {
        return None;
    }
    Some(relative)
}

fn page_path(relative: &Path) -> String {
    let page = if relative.file_name() == Some(OsStr::new(DOCUMENT_FILE_NAME)) {
        relative.parent().map(Path::to_path_buf).unwrap_or_default()
    } else {
        relative.with_extension("")
    };

    page.components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
