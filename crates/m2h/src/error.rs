//! CLI error types.

use std::path::PathBuf;

use m2h_config::ConfigError;
use m2h_renderer::RenderError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("Invalid source file: {} (expected an existing .md or .markdown file)", .0.display())]
    InvalidSource(PathBuf),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Server(String),
}
