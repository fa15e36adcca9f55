use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{EchoMindsError, EchoMindsResult};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_USER_ID: &str = "local-user";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EchoMindsConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_user_id")]
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChatConfig {
    /// Split `*action*`, `"dialogue"` and `(thought)` markup on the client when the
    /// backend sends no structured content.
    #[serde(default)]
    pub parse_markup_fallback: bool,

    /// Render translated channels instead of the original text when present.
    #[serde(default)]
    pub localized: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ThemeConfig {
    /// Overrides the location of the persisted theme preference.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_id: default_user_id(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl EchoMindsConfig {
    pub fn load() -> EchoMindsResult<Self> {
        Self::load_from_paths(get_config_paths())
    }

    pub fn load_from_paths(paths: Vec<PathBuf>) -> EchoMindsResult<Self> {
        load_dotenv_files();

        let mut builder = ConfigBuilder::builder();

        for path in paths {
            if path.exists() {
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("ECHOMINDS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let mut echominds_config: EchoMindsConfig = config.try_deserialize()?;

        echominds_config.apply_env_overrides();
        echominds_config.validate()?;

        Ok(echominds_config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("ECHOMINDS_API_URL") {
            self.api.base_url = url;
        }

        if let Ok(user) = std::env::var("ECHOMINDS_USER_ID") {
            self.api.user_id = user;
        }

        if let Ok(level) = std::env::var("ECHOMINDS_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> EchoMindsResult<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(EchoMindsError::MissingConfig("api.base_url".to_string()));
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(EchoMindsError::InvalidConfigValue {
                key: "api.base_url".to_string(),
                message: "Must start with http:// or https://".to_string(),
            });
        }

        if self.api.user_id.trim().is_empty() {
            return Err(EchoMindsError::InvalidConfigValue {
                key: "api.user_id".to_string(),
                message: "Must not be empty".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        let level_lower = self.logging.level.to_lowercase();
        if !valid_levels.contains(&level_lower.as_str()) && !level_lower.contains('=') {
            return Err(EchoMindsError::InvalidConfigValue {
                key: "logging.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Must be one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }

    pub fn user_id(&self) -> &str {
        &self.api.user_id
    }

    pub fn log_level(&self) -> &str {
        &self.logging.level
    }

    /// File backing the theme preference.
    pub fn theme_path(&self) -> PathBuf {
        self.theme.storage_path.clone().unwrap_or_else(|| {
            get_config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("theme.toml")
        })
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join("config").join("default.toml"));
        paths.push(cwd.join("config").join("local.toml"));
        paths.push(cwd.join("echominds.toml"));
    }

    if let Some(config_dir) = get_config_dir() {
        paths.push(config_dir.join("config.toml"));
    }

    paths
}

fn load_dotenv_files() {
    let current_dir = std::env::current_dir().ok();

    let env_paths = [
        current_dir.as_ref().map(|d| d.join(".env")),
        current_dir.as_ref().map(|d| d.join(".env.local")),
        get_config_dir().map(|d| d.join(".env")),
    ];

    for path in env_paths.iter().flatten() {
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("echominds"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EchoMindsConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.user_id, "local-user");
        assert_eq!(config.logging.level, "warn");
        assert!(!config.chat.parse_markup_fallback);
        assert!(!config.chat.localized);
        assert!(config.theme.storage_path.is_none());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(EchoMindsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_empty_base_url() {
        let mut config = EchoMindsConfig::default();
        config.api.base_url = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(EchoMindsError::MissingConfig(_))
        ));
    }

    #[test]
    fn test_validation_invalid_base_url() {
        let mut config = EchoMindsConfig::default();
        config.api.base_url = "localhost:8000".to_string();
        assert!(matches!(
            config.validate(),
            Err(EchoMindsError::InvalidConfigValue { .. })
        ));
    }

    #[test]
    fn test_validation_empty_user_id() {
        let mut config = EchoMindsConfig::default();
        config.api.user_id = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_log_levels() {
        let mut config = EchoMindsConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "echominds_core=debug".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let mut config = EchoMindsConfig::default();
        config.api.base_url = "https://api.example.com/".to_string();
        assert_eq!(config.base_url(), "https://api.example.com");
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("echominds.toml");
        std::fs::write(
            &path,
            r#"
[api]
base_url = "https://companions.example.com"

[chat]
parse_markup_fallback = true
"#,
        )
        .unwrap();

        let config = EchoMindsConfig::load_from_paths(vec![path]).unwrap();
        if std::env::var("ECHOMINDS_API_URL").is_err() {
            assert_eq!(config.api.base_url, "https://companions.example.com");
        }
        assert!(config.chat.parse_markup_fallback);
    }

    #[test]
    fn test_theme_path_override() {
        let mut config = EchoMindsConfig::default();
        config.theme.storage_path = Some(PathBuf::from("/tmp/echominds-theme.toml"));
        assert_eq!(
            config.theme_path(),
            PathBuf::from("/tmp/echominds-theme.toml")
        );
    }
}
