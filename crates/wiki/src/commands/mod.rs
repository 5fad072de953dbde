//! CLI command implementations.

pub(crate) mod preview;
pub(crate) mod render;

use std::path::PathBuf;

use clap::Args;
use wiki_config::{CliSettings, Config};
use wiki_pipeline::Pipeline;

use crate::error::CliError;

pub(crate) use preview::PreviewArgs;
pub(crate) use render::RenderArgs;

/// Options shared by all rendering commands.
#[derive(Args, Debug)]
pub(crate) struct RenderOptions {
    /// Path to configuration file (default: auto-discover wiki.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory documents live under (overrides config).
    #[arg(long, env = "WIKI_CONTENT_ROOT")]
    content_root: Option<PathBuf>,

    /// Turn single newlines into line breaks (default: enabled).
    #[arg(long)]
    hard_wraps: Option<bool>,

    /// Keep single newlines as soft breaks.
    #[arg(long, conflicts_with = "hard_wraps")]
    no_hard_wraps: bool,

    /// Turn bare URLs into links (default: enabled).
    #[arg(long)]
    linkify: Option<bool>,

    /// Leave bare URLs as text.
    #[arg(long, conflicts_with = "linkify")]
    no_linkify: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderOptions {
    /// Load configuration with these options applied on top.
    fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            content_root: self.content_root.clone(),
            hard_wraps: self.resolve_hard_wraps(),
            linkify: self.resolve_linkify(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::info!(
            config = ?config.config_path,
            content_root = %config.content_resolved.root.display(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Build the pipeline from configuration.
    pub(crate) fn pipeline(&self) -> Result<Pipeline, CliError> {
        Ok(Pipeline::from_config(&self.load_config()?))
    }

    /// Resolve `hard_wraps` from --hard-wraps/--no-hard-wraps flags.
    fn resolve_hard_wraps(&self) -> Option<bool> {
        self.no_hard_wraps.then_some(false).or(self.hard_wraps)
    }

    /// Resolve `linkify` from --linkify/--no-linkify flags.
    fn resolve_linkify(&self) -> Option<bool> {
        self.no_linkify.then_some(false).or(self.linkify)
    }
}
