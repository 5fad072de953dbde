//! Configuration for the wiki renderer.
//!
//! Parses `wiki.toml` with serde and discovers it in the current directory or
//! its parents. CLI settings are applied during load via [`CliSettings`].
//!
//! ```toml
//! [content]
//! root = "data/documents"
//!
//! [render]
//! hard_wraps = true
//! linkify = true
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `content.root` supports `${VAR}` and `${VAR:-default}`.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "wiki.toml";

/// Content root used when nothing else is configured.
pub const DEFAULT_CONTENT_ROOT: &str = "data/documents";

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the content root.
    pub content_root: Option<PathBuf>,
    /// Override hard line wraps.
    pub hard_wraps: Option<bool>,
    /// Override bare URL linking.
    pub linkify: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content configuration (root as a string from TOML).
    content: ContentConfigRaw,
    /// Markdown conversion switches.
    pub render: RenderConfig,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new(""))
    }
}

/// Raw content configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    root: Option<String>,
}

/// Resolved content configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentConfig {
    /// Directory documents live under; document paths are relative to it.
    pub root: PathBuf,
}

/// Markdown conversion switches.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// Single newlines inside paragraphs become line breaks.
    pub hard_wraps: bool,
    /// Bare URLs become links.
    pub linkify: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            hard_wraps: true,
            linkify: true,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`content.root`").
        field: String,
        /// Error message (e.g., "${`WIKI_DATA`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `wiki.toml` in current directory and parents,
    /// falling back to defaults relative to the current directory.
    ///
    /// CLI settings are applied last and take precedence over file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if reading,
    /// parsing, expansion or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            tracing::debug!(path = %discovered.display(), "Discovered config file");
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_base(Path::new(""))
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(root) = &settings.content_root {
            self.content_resolved.root.clone_from(root);
        }
        if let Some(hard_wraps) = settings.hard_wraps {
            self.render.hard_wraps = hard_wraps;
        }
        if let Some(linkify) = settings.linkify {
            self.render.linkify = linkify;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
    }

    fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    /// Create default config with the content root under `base`.
    fn default_with_base(base: &Path) -> Self {
        Self {
            content: ContentConfigRaw::default(),
            render: RenderConfig::default(),
            content_resolved: ContentConfig {
                root: base.join(DEFAULT_CONTENT_ROOT),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;
        config.validate()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `content.root` is set but empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(root) = &self.content.root
            && root.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "content.root cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(root) = &self.content.root {
            self.content.root = Some(expand::expand_env(root, "content.root")?);
        }
        Ok(())
    }

    /// Resolve the content root against the config file directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let root = self.content.root.as_deref().unwrap_or(DEFAULT_CONTENT_ROOT);
        self.content_resolved = ContentConfig {
            root: config_dir.join(root),
        };
    }
}
