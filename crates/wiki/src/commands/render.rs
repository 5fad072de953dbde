//! `wiki render` command implementation.

use std::path::PathBuf;

use clap::Args;

use super::RenderOptions;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args, Debug)]
pub(crate) struct RenderArgs {
    /// Document file to render.
    file: PathBuf,

    #[command(flatten)]
    pub options: RenderOptions,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the file cannot be read.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let pipeline = self.options.pipeline()?;
        let html = pipeline.render_file(&self.file)?;
        output.html(&html)?;
        Ok(())
    }
}
