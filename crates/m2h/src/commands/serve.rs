//! `m2h serve` command implementation.

use clap::Args;
use m2h_config::CliSettings;
use m2h_server::{run_server, server_config_from_m2h_config};

use super::{RenderArgs, render_options};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    #[command(flatten)]
    pub render: RenderArgs,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Disable live reload.
    #[arg(long)]
    no_live_reload: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is invalid, configuration fails, or
    /// the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let source = self.render.source()?;
        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            live_reload_enabled: self.no_live_reload.then_some(false),
            ..CliSettings::default()
        };
        let config = self.render.load_config(source, cli_settings)?;

        output.highlight(&format!(
            "Serving {} at http://{}:{}",
            source.display(),
            config.server.host,
            config.server.port
        ));
        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }
        if config.live_reload.enabled {
            output.info("Live reload: enabled");
        } else {
            output.info("Live reload: disabled");
        }
        output.info("Press Ctrl-C to export and stop");

        let server_config = server_config_from_m2h_config(
            &config,
            source.to_path_buf(),
            render_options(&config.render),
        );
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
