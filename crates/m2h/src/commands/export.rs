//! `m2h export` command implementation.

use clap::Args;
use m2h_config::CliSettings;
use m2h_renderer::Pipeline;

use super::{RenderArgs, render_options};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the export command.
#[derive(Args)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    pub render: RenderArgs,
}

impl ExportArgs {
    /// Execute the export command.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is invalid, configuration fails, or
    /// the document cannot be rendered or written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let source = self.render.source()?;
        let config = self.render.load_config(source, CliSettings::default())?;

        let pipeline = Pipeline::new(render_options(&config.render));
        let written = pipeline.export(source)?;

        output.success(&format!("Exported {}", written.display()));
        Ok(())
    }
}
