//! Light/dark preference persisted across runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::config::get_config_dir;
use crate::error::{EchoMindsError, EchoMindsResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Class applied to the document root; the other theme's class is removed.
    pub fn css_class(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Theme {
    type Err = EchoMindsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(EchoMindsError::ValidationError(format!(
                "Unknown theme '{}', expected 'light' or 'dark'",
                other
            ))),
        }
    }
}

/// Durable key-value slot holding the theme preference.
pub trait ThemeStorage: Send + Sync {
    /// `None` when nothing is stored or the stored value is unusable.
    fn load(&self) -> Option<Theme>;

    fn save(&self, theme: Theme) -> EchoMindsResult<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ThemeFile {
    theme: String,
}

pub struct FileThemeStorage {
    path: PathBuf,
}

impl FileThemeStorage {
    pub fn new() -> Self {
        Self::with_path(Self::default_path())
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn default_path() -> PathBuf {
        get_config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("theme.toml")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> EchoMindsResult<Option<Theme>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        let file: ThemeFile = toml::from_str(&contents)?;
        Ok(Some(file.theme.parse()?))
    }
}

impl Default for FileThemeStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeStorage for FileThemeStorage {
    fn load(&self) -> Option<Theme> {
        match self.read() {
            Ok(theme) => theme,
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Ignoring unreadable theme preference");
                None
            }
        }
    }

    fn save(&self, theme: Theme) -> EchoMindsResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(&ThemeFile {
            theme: theme.as_str().to_string(),
        })?;
        fs::write(&self.path, contents)?;
        debug!(path = ?self.path, theme = %theme, "Theme preference saved");
        Ok(())
    }
}

/// In-process storage for tests and contexts without a config directory.
#[derive(Debug, Default)]
pub struct MemoryThemeStorage {
    value: Mutex<Option<Theme>>,
}

impl MemoryThemeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(theme: Theme) -> Self {
        Self {
            value: Mutex::new(Some(theme)),
        }
    }
}

impl ThemeStorage for MemoryThemeStorage {
    fn load(&self) -> Option<Theme> {
        self.value.lock().ok().and_then(|v| *v)
    }

    fn save(&self, theme: Theme) -> EchoMindsResult<()> {
        let mut value = self
            .value
            .lock()
            .map_err(|e| EchoMindsError::Internal(format!("theme storage poisoned: {}", e)))?;
        *value = Some(theme);
        Ok(())
    }
}

pub struct ThemeStore<S: ThemeStorage> {
    storage: S,
    theme: Theme,
}

impl<S: ThemeStorage> ThemeStore<S> {
    pub fn load(storage: S) -> Self {
        let theme = storage.load().unwrap_or_default();
        Self { storage, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn css_class(&self) -> &'static str {
        self.theme.css_class()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn toggle(&mut self) -> Theme {
        self.set(self.theme.toggled())
    }

    pub fn set(&mut self, theme: Theme) -> Theme {
        self.theme = theme;
        if let Err(e) = self.storage.save(theme) {
            warn!(error = %e, theme = %theme, "Failed to persist theme preference");
        }
        self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct BrokenStorage;

    impl ThemeStorage for BrokenStorage {
        fn load(&self) -> Option<Theme> {
            None
        }

        fn save(&self, _theme: Theme) -> EchoMindsResult<()> {
            Err(EchoMindsError::Internal("disk full".into()))
        }
    }

    #[test]
    fn test_defaults_to_dark_when_empty() {
        let store = ThemeStore::load(MemoryThemeStorage::new());
        assert_eq!(store.theme(), Theme::Dark);
        assert_eq!(store.css_class(), "dark");
    }

    #[test]
    fn test_toggle_round_trip_persists() {
        let mut store = ThemeStore::load(MemoryThemeStorage::new());

        assert_eq!(store.toggle(), Theme::Light);
        assert_eq!(store.storage().load(), Some(Theme::Light));
        assert_eq!(store.css_class(), "light");

        assert_eq!(store.toggle(), Theme::Dark);
        assert_eq!(store.storage().load(), Some(Theme::Dark));
        assert_eq!(store.css_class(), "dark");
    }

    #[test]
    fn test_initial_value_read_from_storage() {
        let store = ThemeStore::load(MemoryThemeStorage::with_value(Theme::Light));
        assert_eq!(store.theme(), Theme::Light);
        assert_eq!(store.css_class(), "light");
    }

    #[test]
    fn test_failed_save_still_changes_theme() {
        let mut store = ThemeStore::load(BrokenStorage);
        assert_eq!(store.set(Theme::Light), Theme::Light);
        assert_eq!(store.theme(), Theme::Light);
    }

    #[test]
    fn test_file_storage_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("theme.toml");
        let storage = FileThemeStorage::with_path(&path);
        assert_eq!(storage.load(), None);

        storage.save(Theme::Light).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("theme = \"light\""));

        let store = ThemeStore::load(FileThemeStorage::with_path(&path));
        assert_eq!(store.theme(), Theme::Light);
    }

    #[test]
    fn test_file_storage_unparsable_defaults_to_dark() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("theme.toml");
        fs::write(&path, "theme = \"sepia\"\n").unwrap();
        assert_eq!(ThemeStore::load(FileThemeStorage::with_path(&path)).theme(), Theme::Dark);

        fs::write(&path, "not toml at all [").unwrap();
        assert_eq!(ThemeStore::load(FileThemeStorage::with_path(&path)).theme(), Theme::Dark);
    }

    #[test]
    fn test_parse_theme() {
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!(" dark ".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("Dark".parse::<Theme>().is_err());
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
