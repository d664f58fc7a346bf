//! CLI command implementations.

pub(crate) mod export;
pub(crate) mod serve;

use std::path::{Path, PathBuf};

use clap::Args;
use m2h_config::{CliSettings, Config, RenderConfig};
use m2h_renderer::{DEFAULT_STYLESHEET, RenderOptions};

use crate::error::CliError;

pub(crate) use export::ExportArgs;
pub(crate) use serve::ServeArgs;

/// Extensions accepted for the source document.
const SOURCE_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Arguments shared by every command that renders a document.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown document to convert.
    #[arg(short, long)]
    src: PathBuf,

    /// Base stylesheet URL or path (overrides config).
    #[arg(long)]
    css: Option<String>,

    /// Omit the base stylesheet.
    #[arg(long)]
    plain: bool,

    /// Suffix appended to the output file name, before `.html`.
    #[arg(long)]
    suffix: Option<String>,

    /// Document title (overrides front matter).
    #[arg(short, long)]
    title: Option<String>,

    /// Path to configuration file (default: auto-discover m2h.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Validated source path.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidSource` unless the path names an existing
    /// markdown file.
    pub(crate) fn source(&self) -> Result<&Path, CliError> {
        validate_source(&self.src)
    }

    /// Load configuration with these arguments applied on top.
    ///
    /// The config file is discovered from the source document's directory.
    pub(crate) fn load_config(
        &self,
        source: &Path,
        mut settings: CliSettings,
    ) -> Result<Config, CliError> {
        settings.title.clone_from(&self.title);
        settings.css.clone_from(&self.css);
        settings.plain = self.plain.then_some(true);
        settings.suffix.clone_from(&self.suffix);

        let search_from = source.parent().unwrap_or(Path::new(""));
        let config = Config::load(self.config.as_deref(), search_from, Some(&settings))?;
        match &config.config_path {
            Some(path) => tracing::debug!(path = %path.display(), "Loaded configuration file"),
            None => tracing::debug!("No configuration file found, using defaults"),
        }
        Ok(config)
    }
}

/// Check that `path` is an existing file with a markdown extension.
fn validate_source(path: &Path) -> Result<&Path, CliError> {
    let has_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SOURCE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        });

    if has_extension && path.is_file() {
        Ok(path)
    } else {
        Err(CliError::InvalidSource(path.to_path_buf()))
    }
}

/// Build render options from the `[render]` config section.
pub(crate) fn render_options(render: &RenderConfig) -> RenderOptions {
    RenderOptions {
        title: render.title.clone(),
        stylesheet: Some(
            render
                .css
                .clone()
                .unwrap_or_else(|| DEFAULT_STYLESHEET.to_owned()),
        ),
        plain: render.plain,
        suffix: render.suffix.clone(),
        lang: render.lang.clone(),
    }
}
