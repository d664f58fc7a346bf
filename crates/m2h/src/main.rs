//! m2h CLI - Markdown to HTML converter.
//!
//! Provides commands for:
//! - `export`: Render a markdown document to an HTML file next to it
//! - `serve`: Preview a markdown document with live reload

mod commands;
mod error;
mod output;

use std::future::Future;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ExportArgs, ServeArgs};
use error::CliError;
use output::Output;

/// How long runtime teardown waits for blocking tasks still running.
const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// m2h - Markdown to HTML converter.
#[derive(Parser)]
#[command(name = "m2h", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the document to HTML once.
    Export(ExportArgs),
    /// Serve a live preview of the document.
    Serve(ServeArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Export(args) => args.render.verbose,
            Self::Serve(args) => args.render.verbose,
        }
    }
}

fn main() -> ExitCode {
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
        Commands::Export(args) => args.execute(),
        Commands::Serve(args) => block_on(args.execute()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.error(&format!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}

/// Run `future` on a fresh runtime.
///
/// Teardown is bounded by [`RUNTIME_SHUTDOWN_TIMEOUT`], so a blocking task
/// that outlived its timeout (such as a stuck final export) cannot hold the
/// process open.
fn block_on<F>(future: F) -> Result<(), CliError>
where
    F: Future<Output = Result<(), CliError>>,
{
    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(future);
    rt.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);
    result
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
    fn test_src_is_required() {
        assert!(Cli::try_parse_from(["m2h", "export"]).is_err());
    }

    #[test]
    fn test_serve_flags_parse() {
        let cli = Cli::try_parse_from([
            "m2h",
            "serve",
            "--src",
            "notes.md",
            "--port",
            "9000",
            "--no-live-reload",
            "-v",
        ])
        .unwrap();

        assert!(cli.command.verbose());
        assert!(matches!(cli.command, Commands::Serve(_)));
    }

    #[test]
    fn test_block_on_does_not_wait_for_stuck_blocking_task() {
        let start = std::time::Instant::now();

        let result = block_on(async {
            drop(tokio::task::spawn_blocking(|| {
                std::thread::sleep(Duration::from_secs(30));
            }));
            Ok(())
        });

        assert!(result.is_ok());
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_block_on_returns_future_error() {
        let result = block_on(async { Err(CliError::from(std::io::Error::other("boom"))) });

        assert!(result.unwrap_err().to_string().contains("boom"));
    }
}
