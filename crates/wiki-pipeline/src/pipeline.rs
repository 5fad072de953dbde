//! Layout dispatch and protected conversion.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use wiki_blocks::{BlockFamily, BlockStash};
use wiki_config::{Config, DEFAULT_CONTENT_ROOT};
use wiki_layouts::{KanbanRenderer, Layout, split_frontmatter};
use wiki_renderer::{ConvertError, EngineOptions, MarkupEngine, WikiMarkdown, escape_html};

use crate::registry::{self, PreprocessorRegistry};

/// Document renderer.
///
/// Splits off frontmatter, picks the layout and renders the body:
///
/// - `kanban`: board renderer, each cell through the preprocessors and the
///   protected conversion
/// - `links`: link-list renderer, falling back to the default path on error
/// - anything else: preprocessors, then the protected conversion
///
/// Rendering never fails. Conversion errors become a visible
/// `<p>Error rendering markdown: ...</p>` fragment.
///
/// # Example
///
/// ```
/// use wiki_pipeline::Pipeline;
///
/// let pipeline = Pipeline::default();
/// let html = pipeline.render("[Manual](/api/files/docs/manual.pdf)", "");
/// assert_eq!(html, r#"<p><a href="/docs?mode=pdf&file=manual.pdf">Manual</a></p>"#);
/// ```
pub struct Pipeline {
    engine: Box<dyn MarkupEngine>,
    /// `None` uses the process-wide registry.
    registry: Option<PreprocessorRegistry>,
    content_root: PathBuf,
}

impl Pipeline {
    /// Create a pipeline converting with [`WikiMarkdown`].
    #[must_use]
    pub fn new(options: EngineOptions) -> Self {
        Self {
            engine: Box::new(WikiMarkdown::new(options)),
            registry: None,
            content_root: PathBuf::from(DEFAULT_CONTENT_ROOT),
        }
    }

    /// Create a pipeline from loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(EngineOptions {
            hard_wraps: config.render.hard_wraps,
            linkify: config.render.linkify,
        })
        .with_content_root(config.content_resolved.root.clone())
    }

    /// Replace the markup engine.
    #[must_use]
    pub fn with_engine(mut self, engine: impl MarkupEngine + 'static) -> Self {
        self.engine = Box::new(engine);
        self
    }

    /// Use `registry` instead of the process-wide one.
    #[must_use]
    pub fn with_registry(mut self, registry: PreprocessorRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set the directory document paths are relative to.
    #[must_use]
    pub fn with_content_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.content_root = root.into();
        self
    }

    #[must_use]
    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    /// Preprocessors this pipeline runs.
    #[must_use]
    pub fn registry(&self) -> &PreprocessorRegistry {
        match &self.registry {
            Some(registry) => registry,
            None => registry::global(),
        }
    }

    /// Render a document located at `doc_path` (`team/page`, or empty).
    #[must_use]
    pub fn render(&self, text: &str, doc_path: &str) -> String {
        let (metadata, body) = split_frontmatter(text);
        let layout = metadata.map(|m| m.layout).unwrap_or_default();
        tracing::debug!(layout = %layout, doc_path, "Rendering document");

        match layout {
            Layout::Kanban => self.render_kanban(body, doc_path),
            Layout::Links => self.render_link_list(body, doc_path),
            Layout::Default => self.render_default(body, doc_path),
        }
    }

    /// Render a document without a location; relative links are left as written.
    #[must_use]
    pub fn render_preview(&self, text: &str) -> String {
        self.render(text, "")
    }

    fn render_default(&self, body: &str, doc_path: &str) -> String {
        let body = self.registry().apply(body, doc_path);
        self.convert_protected(&body, doc_path)
    }

    fn render_link_list(&self, body: &str, doc_path: &str) -> String {
        match wiki_layouts::render_links(body) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    doc_path,
                    "Links layout failed, rendering as markdown"
                );
                self.render_default(body, doc_path)
            }
        }
    }

    /// Board rendering.
    ///
    /// Cells run through the registry with `doc_path` bound, then block
    /// extraction, conversion, diagram restoration and direction restoration.
    /// The stash is shared by the extraction and restoration stages and reset
    /// for every cell.
    fn render_kanban(&self, body: &str, doc_path: &str) -> String {
        let stash = RefCell::new(BlockStash::new());

        let mut renderer = KanbanRenderer::new(|markdown: &str| self.convert(markdown));
        for preprocessor in self.registry().iter() {
            renderer = renderer
                .with_preprocessor(move |markdown: &str| preprocessor.process(markdown, doc_path));
        }

        renderer
            .with_preprocessor(|markdown: &str| {
                let mut stash = stash.borrow_mut();
                *stash = BlockStash::new();
                stash.extract(markdown)
            })
            .with_postprocessor(|html: &str| restore_diagrams(&stash.borrow(), html))
            .with_postprocessor(|html: &str| {
                self.restore_directions(&stash.borrow(), html, doc_path)
            })
            .render(body)
    }

    /// Convert preprocessed markdown with diagram and directional blocks
    /// protected from the engine.
    fn convert_protected(&self, markdown: &str, doc_path: &str) -> String {
        let mut stash = BlockStash::new();
        let extracted = stash.extract(markdown);
        let html = self.convert(&extracted);
        let html = restore_diagrams(&stash, &html);
        self.restore_directions(&stash, &html, doc_path)
    }

    /// Directional content is markdown the preprocessors skipped as fenced
    /// code. It runs through them now, then gets a protected conversion of
    /// its own so diagrams nested in it are restored too.
    fn restore_directions(&self, stash: &BlockStash, html: &str, doc_path: &str) -> String {
        let restored = stash.restore_directions(html, |content| {
            let content = self.registry().apply(content, doc_path);
            self.convert_protected(&content, doc_path)
        });
        report_unmatched(BlockFamily::Direction, &restored.unmatched);
        restored.html
    }

    fn convert(&self, markdown: &str) -> String {
        self.engine.convert(markdown).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Markdown conversion failed");
            error_fragment(&e)
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("registry", self.registry())
            .field("content_root", &self.content_root)
            .finish_non_exhaustive()
    }
}

fn restore_diagrams(stash: &BlockStash, html: &str) -> String {
    let restored = stash.restore_diagrams(html);
    report_unmatched(BlockFamily::Diagram, &restored.unmatched);
    restored.html
}

fn report_unmatched(family: BlockFamily, tokens: &[String]) {
    for token in tokens {
        tracing::error!(
            family = %family,
            token = %token,
            "Placeholder token missing from converted HTML"
        );
    }
}

fn error_fragment(error: &ConvertError) -> String {
    format!(
        "<p>Error rendering markdown: {}</p>",
        escape_html(&error.to_string())
    )
}
