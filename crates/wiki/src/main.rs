//! Wiki CLI - document renderer.
//!
//! Provides commands for:
//! - `render`: Render a document file to HTML
//! - `preview`: Render markdown from stdin to HTML

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{PreviewArgs, RenderArgs};
use output::Output;

/// Wiki - document renderer.
#[derive(Parser, Debug)]
#[command(name = "wiki", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a document file.
    Render(RenderArgs),
    /// Render markdown read from stdin, without a document location.
    Preview(PreviewArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Render(args) => args.options.verbose,
            Self::Preview(args) => args.options.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(&output),
        Commands::Preview(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from(["wiki", "render", "page.md", "--verbose"]).unwrap();
        assert!(matches!(cli.command, Commands::Render(_)));
        assert!(cli.command.verbose());
    }

    #[test]
    fn test_parse_preview_defaults() {
        let cli = Cli::try_parse_from(["wiki", "preview"]).unwrap();
        assert!(matches!(cli.command, Commands::Preview(_)));
        assert!(!cli.command.verbose());
    }

    #[test]
    fn test_render_requires_file() {
        assert!(Cli::try_parse_from(["wiki", "render"]).is_err());
    }

    #[test]
    fn test_conflicting_wrap_flags() {
        let result = Cli::try_parse_from([
            "wiki",
            "preview",
            "--hard-wraps",
            "true",
            "--no-hard-wraps",
        ]);
        assert!(result.is_err());
    }
}
