//! Error types for the rendering pipeline.

use std::path::PathBuf;

/// Errors that abort a render.
///
/// Problems with optional inputs (a stylesheet that cannot be read, a source
/// file whose timestamp cannot be determined) are logged and skipped instead.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The markdown source does not exist.
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    /// Reading the source or writing the output failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The YAML front matter block could not be parsed.
    #[error("Invalid front matter in {}: {source}", path.display())]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl RenderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::SourceNotFound(path)
        } else {
            Self::Io { path, source }
        }
    }
}
