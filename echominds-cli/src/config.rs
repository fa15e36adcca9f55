use anyhow::Result;
use echominds_core::{ApiClient, EchoMindsConfig, FileThemeStorage, ThemeStore};
use std::sync::Arc;

/// Loaded configuration plus the backend client shared by every command.
pub struct CliContext {
    pub config: EchoMindsConfig,
    pub client: Arc<ApiClient>,
}

impl CliContext {
    pub fn new(mut config: EchoMindsConfig, api_url: Option<String>) -> Result<Self> {
        if let Some(url) = api_url {
            config.api.base_url = url;
            config.validate()?;
        }
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: EchoMindsConfig) -> Self {
        let client = Arc::new(ApiClient::from_config(&config));
        Self { config, client }
    }

    pub fn user_id(&self) -> &str {
        self.config.user_id()
    }

    pub fn theme_store(&self) -> ThemeStore<FileThemeStorage> {
        ThemeStore::load(FileThemeStorage::with_path(self.config.theme_path()))
    }
}
