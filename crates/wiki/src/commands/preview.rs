//! `wiki preview` command implementation.

use clap::Args;

use super::RenderOptions;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the preview command.
#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    #[command(flatten)]
    pub options: RenderOptions,
}

impl PreviewArgs {
    /// Render markdown read from stdin. Relative links are left as written.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or stdin cannot be read.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let pipeline = self.options.pipeline()?;
        let text = std::io::read_to_string(std::io::stdin())?;
        output.html(&pipeline.render_preview(&text))?;
        Ok(())
    }
}
