//! Configuration management for m2h.
//!
//! Parses `m2h.toml` configuration files with serde. When no file is given
//! explicitly, the directory of the source document and its parents are
//! searched.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `render.css`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override document title.
    pub title: Option<String>,
    /// Override base stylesheet.
    pub css: Option<String>,
    /// Override plain mode.
    pub plain: Option<bool>,
    /// Override output suffix.
    pub suffix: Option<String>,
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override live reload enabled flag.
    pub live_reload_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "m2h.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering configuration.
    pub render: RenderConfig,
    /// Preview server configuration.
    pub server: ServerConfig,
    /// Live reload configuration.
    pub live_reload: LiveReloadConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Title override.
    pub title: Option<String>,
    /// Base stylesheet URL or path. `None` selects the built-in default.
    pub css: Option<String>,
    /// Omit the base stylesheet.
    pub plain: bool,
    /// Suffix appended to exported file names.
    pub suffix: String,
    /// Document language.
    pub lang: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: None,
            css: None,
            plain: false,
            suffix: String::new(),
            lang: "ja".to_owned(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

/// Live reload configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LiveReloadConfig {
    /// Whether live reload is enabled.
    pub enabled: bool,
    /// Quiet period after the last change before clients reload.
    pub debounce_ms: u64,
}

impl Default for LiveReloadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: 300,
        }
    }
}

impl LiveReloadConfig {
    /// Debounce window as a [`Duration`].
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`M2H_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn is_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `m2h.toml` in `search_from` and its parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        search_from: &Path,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config(search_from) {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(title) = &settings.title {
            self.render.title = Some(title.clone());
        }
        if let Some(css) = &settings.css {
            self.render.css = Some(css.clone());
        }
        if let Some(plain) = settings.plain {
            self.render.plain = plain;
        }
        if let Some(suffix) = &settings.suffix {
            self.render.suffix.clone_from(suffix);
        }
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(live_reload_enabled) = settings.live_reload_enabled {
            self.live_reload.enabled = live_reload_enabled;
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = if start.as_os_str().is_empty() {
            std::env::current_dir().ok()?
        } else {
            std::path::absolute(start).ok()?
        };
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_render()?;
        self.validate_server()?;
        self.validate_live_reload()?;
        Ok(())
    }

    fn validate_render(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.render.lang, "render.lang")?;
        if self.render.suffix.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "render.suffix cannot contain path separators".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_live_reload(&self) -> Result<(), ConfigError> {
        if self.live_reload.debounce_ms == 0 {
            return Err(ConfigError::Validation(
                "live_reload.debounce_ms must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        if let Some(css) = &self.render.css {
            self.render.css = Some(expand::expand_env(css, "render.css")?);
        }
        Ok(())
    }

    /// Resolve a relative local stylesheet against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        if let Some(css) = &self.render.css
            && !css.is_empty()
            && !is_url(css)
            && Path::new(css).is_relative()
        {
            self.render.css = Some(config_dir.join(css).to_string_lossy().into_owned());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.render.lang, "ja");
        assert_eq!(config.render.suffix, "");
        assert!(config.render.css.is_none());
        assert!(!config.render.plain);
        assert!(config.live_reload.enabled);
        assert_eq!(config.live_reload.debounce(), Duration::from_millis(300));
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[render]
title = "Handbook"
css = "https://example.com/style.css"
plain = true
suffix = "_out"
lang = "en"

[server]
host = "0.0.0.0"
port = 9000

[live_reload]
enabled = false
debounce_ms = 150
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.render.title.as_deref(), Some("Handbook"));
        assert_eq!(config.render.css.as_deref(), Some("https://example.com/style.css"));
        assert!(config.render.plain);
        assert_eq!(config.render.suffix, "_out");
        assert_eq!(config.render.lang, "en");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert!(!config.live_reload.enabled);
        assert_eq!(config.live_reload.debounce_ms, 150);
    }

    #[test]
    fn test_parse_unknown_field_type_error() {
        let result: Result<Config, _> = toml::from_str("[server]\nport = \"eighty\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_relative_css() {
        let mut config: Config = toml::from_str("[render]\ncss = \"theme/base.css\"\n").unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.render.css.as_deref(), Some("/project/theme/base.css"));
    }

    #[test]
    fn test_resolve_keeps_urls_and_absolute_paths() {
        let mut config: Config =
            toml::from_str("[render]\ncss = \"https://cdn.test/s.css\"\n").unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(config.render.css.as_deref(), Some("https://cdn.test/s.css"));

        let mut config: Config = toml::from_str("[render]\ncss = \"/etc/s.css\"\n").unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(config.render.css.as_deref(), Some("/etc/s.css"));
    }

    #[test]
    fn test_apply_cli_settings_render() {
        let mut config = Config::default();
        let overrides = CliSettings {
            title: Some("From CLI".to_owned()),
            css: Some("local.css".to_owned()),
            plain: Some(true),
            suffix: Some("_v2".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.render.title.as_deref(), Some("From CLI"));
        assert_eq!(config.render.css.as_deref(), Some("local.css"));
        assert!(config.render.plain);
        assert_eq!(config.render.suffix, "_v2");
        assert_eq!(config.server.port, 8080); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_server() {
        let mut config = Config::default();
        let overrides = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(9000),
            live_reload_enabled: Some(false),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert!(!config.live_reload.enabled);
        assert!(config.render.title.is_none()); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.live_reload.enabled);
    }

    #[test]
    fn test_expand_env_vars_server_host() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("M2H_TEST_HOST", "0.0.0.0");
        }

        let mut config: Config = toml::from_str("[server]\nhost = \"${M2H_TEST_HOST}\"\n").unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.server.host, "0.0.0.0");

        unsafe {
            std::env::remove_var("M2H_TEST_HOST");
        }
    }

    #[test]
    fn test_expand_env_vars_css_default() {
        let mut config: Config =
            toml::from_str("[render]\ncss = \"${M2H_TEST_CSS_UNSET:-https://cdn.test/a.css}\"\n")
                .unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.render.css.as_deref(), Some("https://cdn.test/a.css"));
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        let mut config: Config =
            toml::from_str("[server]\nhost = \"${M2H_TEST_MISSING_HOST}\"\n").unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("M2H_TEST_MISSING_HOST"));
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_server_port_zero() {
        let mut config = Config::default();
        config.server.port = 0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_validate_debounce_zero() {
        let mut config = Config::default();
        config.live_reload.debounce_ms = 0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("debounce_ms"));
    }

    #[test]
    fn test_validate_suffix_with_separator() {
        let mut config = Config::default();
        config.render.suffix = "../x".to_owned();

        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        let err = Config::load(Some(&missing), dir.path(), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_discovers_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILENAME),
            "[render]\nsuffix = \"_found\"\n[server]\nport = 4000\n",
        )
        .unwrap();
        let nested = dir.path().join("notes/2024");
        std::fs::create_dir_all(&nested).unwrap();

        let config = Config::load(None, &nested, None).unwrap();

        assert_eq!(config.render.suffix, "_found");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.config_path, Some(dir.path().join(CONFIG_FILENAME)));
    }

    #[test]
    fn test_load_cli_settings_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[server]\nport = 4000\n").unwrap();
        let settings = CliSettings {
            port: Some(5000),
            ..Default::default()
        };

        let config = Config::load(Some(&path), dir.path(), Some(&settings)).unwrap();

        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[live_reload]\ndebounce_ms = 0\n").unwrap();

        let err = Config::load(None, dir.path(), None).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
