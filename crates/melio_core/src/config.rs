//! Runtime configuration.
//!
//! # Responsibility
//! - Load `MelioConfig` from an optional TOML file with full defaults.
//! - Apply environment overrides after `.env` loading.
//! - Reject configurations the core cannot run with.
//!
//! # Invariants
//! - Every section has a usable default; an empty file is valid.
//! - Environment overrides win over file values.

use crate::model::canvas::Canvas;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_API_KEY: &str = "MELIO_API_KEY";
pub const ENV_MODEL: &str = "MELIO_MODEL";
pub const ENV_DB_PATH: &str = "MELIO_DB_PATH";
pub const ENV_USER_ID: &str = "MELIO_USER_ID";
pub const ENV_LOG_LEVEL: &str = "MELIO_LOG_LEVEL";

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_APP_ID: &str = "default-app-id";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        let canvas = Canvas::default();
        Self {
            width: canvas.width,
            height: canvas.height,
        }
    }
}

impl CanvasConfig {
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Base URL of the generative-language API, without trailing slash.
    pub api_base: String,
    pub model: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file for saved concepts. `None` keeps concepts in memory only.
    pub db_path: Option<PathBuf>,
    /// Namespace shared by all users of one deployment.
    pub app_id: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            app_id: DEFAULT_APP_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Pre-issued user identity. Anonymous identity is used when absent.
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace|debug|info|warn|error`; build-mode default when absent.
    pub level: Option<String>,
    /// Absolute log directory. File logging stays off when absent.
    pub dir: Option<PathBuf>,
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MelioConfig {
    pub canvas: CanvasConfig,
    pub synthesis: SynthesisConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// Configuration loading or validation failure.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config TOML: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

impl MelioConfig {
    /// Loads configuration from `.env`, an optional TOML file and the process
    /// environment, in that order of increasing precedence.
    ///
    /// # Errors
    /// - `Io` when `path` is given but unreadable.
    /// - `Parse` for malformed TOML.
    /// - `Invalid` when validation fails after overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if dotenv::dotenv().is_err() {
            info!("event=config_load module=config status=skip reason=no_dotenv");
        }

        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        info!(
            "event=config_load module=config status=ok file={} persistent_storage={} api_key_set={}",
            path.is_some(),
            config.storage.db_path.is_some(),
            !config.synthesis.api_key.is_empty()
        );
        Ok(config)
    }

    /// Parses a TOML document; missing sections take defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Applies overrides read through `lookup`; blank values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(api_key) = read(ENV_API_KEY) {
            self.synthesis.api_key = api_key;
        }
        if let Some(model) = read(ENV_MODEL) {
            self.synthesis.model = model;
        }
        if let Some(db_path) = read(ENV_DB_PATH) {
            self.storage.db_path = Some(PathBuf::from(db_path));
        }
        if let Some(user_id) = read(ENV_USER_ID) {
            self.session.user_id = Some(user_id);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            self.logging.level = Some(level);
        }
    }

    /// Checks values the core relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.canvas.width > 0.0 && self.canvas.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "canvas size must be positive, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        if self.synthesis.model.trim().is_empty() {
            return Err(ConfigError::Invalid("synthesis.model cannot be empty".to_string()));
        }
        if self.synthesis.api_base.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "synthesis.api_base cannot be empty".to_string(),
            ));
        }
        if self.storage.app_id.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.app_id cannot be empty".to_string()));
        }
        if self.synthesis.api_key.is_empty() {
            warn!("event=config_validate module=config status=warn reason=api_key_missing");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_document_uses_defaults() {
        let config = MelioConfig::from_toml_str("").unwrap();
        assert_eq!(config, MelioConfig::default());
        assert_eq!(config.synthesis.model, "gemini-2.0-flash");
        assert_eq!(config.storage.app_id, "default-app-id");
        config.validate().unwrap();
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = MelioConfig::from_toml_str(
            r#"
            [canvas]
            width = 900.0

            [storage]
            db_path = "/tmp/melio.sqlite3"
            "#,
        )
        .unwrap();
        assert_eq!(config.canvas.width, 900.0);
        assert_eq!(config.canvas.height, 720.0);
        assert_eq!(
            config.storage.db_path.as_deref(),
            Some(Path::new("/tmp/melio.sqlite3"))
        );
        assert_eq!(config.storage.app_id, "default-app-id");
    }

    #[test]
    fn env_overrides_win_and_blank_values_are_ignored() {
        let env: HashMap<&str, &str> = [
            (ENV_API_KEY, "secret"),
            (ENV_MODEL, "  "),
            (ENV_USER_ID, "user-42"),
        ]
        .into_iter()
        .collect();

        let mut config = MelioConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|value| value.to_string()));

        assert_eq!(config.synthesis.api_key, "secret");
        assert_eq!(config.synthesis.model, "gemini-2.0-flash");
        assert_eq!(config.session.user_id.as_deref(), Some("user-42"));
    }

    #[test]
    fn validate_rejects_non_positive_canvas() {
        let mut config = MelioConfig::default();
        config.canvas.height = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("canvas size"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = MelioConfig::from_toml_str("[canvas\nwidth = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
