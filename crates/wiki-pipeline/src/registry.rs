//! Ordered registry of markdown preprocessors.
//!
//! Preprocessors are text-to-text transforms run on the document body before
//! conversion, in registration order, each seeing the previous one's output.
//! The process-wide registry is installed once at startup and read-only
//! afterwards; [`global`] falls back to [`PreprocessorRegistry::builtin`]
//! when nothing was installed.

use std::fmt;
use std::sync::OnceLock;

use crate::preprocessors::{Attachments, Highlight, TaskList};

static GLOBAL: OnceLock<PreprocessorRegistry> = OnceLock::new();

/// A named transform over the document body.
///
/// `doc_path` is the page's path relative to the content root (`team/page`),
/// or empty when the document has no location.
///
/// Implementations must not fail: malformed input is passed through as well
/// as they can. They must also accept text already rewritten by other
/// preprocessors, including their own output.
pub trait Preprocessor: Send + Sync {
    /// Name the preprocessor is registered under.
    fn name(&self) -> &str;

    /// Transform `body`.
    fn process(&self, body: &str, doc_path: &str) -> String;
}

/// Adapter for registering a closure as a [`Preprocessor`].
struct FnPreprocessor<F> {
    name: String,
    transform: F,
}

impl<F> Preprocessor for FnPreprocessor<F>
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, body: &str, doc_path: &str) -> String {
        (self.transform)(body, doc_path)
    }
}

/// Error returned by registry operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A preprocessor with this name is already registered.
    #[error("preprocessor already registered: {0}")]
    Duplicate(String),
    /// The process-wide registry was already installed or used.
    #[error("preprocessor registry is already installed")]
    AlreadyInstalled,
}

/// Ordered collection of preprocessors.
///
/// # Example
///
/// ```
/// use wiki_pipeline::PreprocessorRegistry;
///
/// let mut registry = PreprocessorRegistry::new();
/// registry
///     .register_fn("shout", |body: &str, _doc_path: &str| body.to_uppercase())
///     .unwrap();
/// assert_eq!(registry.apply("hello", ""), "HELLO");
/// ```
#[derive(Default)]
pub struct PreprocessorRegistry {
    entries: Vec<Box<dyn Preprocessor>>,
}

impl PreprocessorRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in preprocessors: `attachments`, `task-list`,
    /// `highlight`, in that order.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                Box::new(Attachments),
                Box::new(TaskList),
                Box::new(Highlight),
            ],
        }
    }

    /// Append a preprocessor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if the name is taken.
    pub fn register<P>(&mut self, preprocessor: P) -> Result<(), RegistryError>
    where
        P: Preprocessor + 'static,
    {
        if self.entries.iter().any(|p| p.name() == preprocessor.name()) {
            return Err(RegistryError::Duplicate(preprocessor.name().to_owned()));
        }
        self.entries.push(Box::new(preprocessor));
        Ok(())
    }

    /// Append a closure under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if the name is taken.
    pub fn register_fn<F>(
        &mut self,
        name: impl Into<String>,
        transform: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        self.register(FnPreprocessor {
            name: name.into(),
            transform,
        })
    }

    /// Run every preprocessor over `body` in registration order.
    #[must_use]
    pub fn apply(&self, body: &str, doc_path: &str) -> String {
        self.entries.iter().fold(body.to_owned(), |text, preprocessor| {
            preprocessor.process(&text, doc_path)
        })
    }

    /// Registered preprocessors in order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Preprocessor> + '_ {
        self.entries.iter().map(Box::as_ref)
    }

    /// Registered names in order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|p| p.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for PreprocessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreprocessorRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// Install the process-wide registry.
///
/// Call once at startup, before the first render.
///
/// # Errors
///
/// Returns [`RegistryError::AlreadyInstalled`] if a registry was installed
/// before, or if [`global`] was already called.
pub fn install(registry: PreprocessorRegistry) -> Result<(), RegistryError> {
    GLOBAL
        .set(registry)
        .map_err(|_| RegistryError::AlreadyInstalled)
}

/// The process-wide registry.
pub fn global() -> &'static PreprocessorRegistry {
    GLOBAL.get_or_init(PreprocessorRegistry::builtin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_order() {
        assert_eq!(
            PreprocessorRegistry::builtin().names(),
            ["attachments", "task-list", "highlight"]
        );
    }

    #[test]
    fn test_apply_runs_in_order() {
        let mut registry = PreprocessorRegistry::new();
        registry
            .register_fn("a", |body: &str, _: &str| format!("{body}a"))
            .unwrap();
        registry
            .register_fn("b", |body: &str, _: &str| format!("{body}b"))
            .unwrap();
        assert_eq!(registry.apply("x", ""), "xab");
    }

    #[test]
    fn test_apply_passes_doc_path() {
        let mut registry = PreprocessorRegistry::new();
        registry
            .register_fn("path", |body: &str, doc_path: &str| format!("{body}@{doc_path}"))
            .unwrap();
        assert_eq!(registry.apply("x", "team/page"), "x@team/page");
    }

    #[test]
    fn test_empty_registry_is_identity() {
        let registry = PreprocessorRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.apply("body", "p"), "body");
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = PreprocessorRegistry::builtin();
        let err = registry
            .register_fn("highlight", |body: &str, _: &str| body.to_owned())
            .unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("highlight".to_owned()));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_builtin_chain() {
        let html = PreprocessorRegistry::builtin().apply("- [x] ==see== [a](a.pdf)\n", "docs");
        assert_eq!(
            html,
            "- <input type=\"checkbox\" class=\"task-checkbox\" disabled checked> <mark>see</mark> [a](/api/files/docs/a.pdf)\n"
        );
    }

    #[test]
    fn test_install_after_use_fails() {
        let _ = global();
        assert_eq!(
            install(PreprocessorRegistry::new()),
            Err(RegistryError::AlreadyInstalled)
        );
        assert_eq!(global().len(), 3);
    }

    #[test]
    fn test_debug_lists_names() {
        let debug = format!("{:?}", PreprocessorRegistry::builtin());
        assert_eq!(
            debug,
            r#"PreprocessorRegistry { names: ["attachments", "task-list", "highlight"] }"#
        );
    }
}
