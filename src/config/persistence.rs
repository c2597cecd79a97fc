//! Settings file storage
//!
//! `ConfigStore` names the directory holding `config.json` and reads or
//! writes `Settings` there. Readers never fail hard: the editor and the
//! CLI fall back to defaults and log why.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name under the platform config directory.
const APP_DIR_NAME: &str = "inkwell";

const CONFIG_FILE_NAME: &str = "config.json";

/// Written first, then renamed over the real file.
const STAGING_FILE_NAME: &str = "config.json.bak";

/// Location of the settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// The per-user location: `<config_dir>/inkwell/`.
    ///
    /// That is `%APPDATA%\inkwell` on Windows,
    /// `~/Library/Application Support/inkwell` on macOS and
    /// `~/.config/inkwell` on Linux.
    pub fn locate() -> Result<Self> {
        let base = dirs::config_dir().ok_or(Error::ConfigDirNotFound)?;
        Ok(Self::in_dir(base.join(APP_DIR_NAME)))
    }

    /// A store rooted at an explicit directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of `config.json`.
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    /// Read and sanitize the stored settings.
    ///
    /// A missing or blank file means nothing was saved yet and yields the
    /// defaults. Unreadable files and malformed JSON are errors.
    pub fn load(&self) -> Result<Settings> {
        let path = self.file_path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings at {}, using defaults", path.display());
                return Ok(Settings::default());
            }
            Err(e) => {
                return Err(Error::ConfigLoad {
                    path,
                    source: Box::new(e),
                })
            }
        };

        if contents.trim().is_empty() {
            return Ok(Settings::default());
        }

        let settings = Settings::from_json_sanitized(&contents).map_err(|e| Error::ConfigParse {
            message: format!("{}: {}", path.display(), e),
            source: Some(Box::new(e)),
        })?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load, or fall back to defaults with a logged warning.
    pub fn load_or_default(&self) -> Settings {
        self.load()
            .unwrap_or_warn_default(Settings::default(), "Could not load settings")
    }

    /// Write settings as pretty JSON. `config.json` is only ever replaced
    /// by a rename of the fully written staging file.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let save_error = |path: &Path, e: Box<dyn std::error::Error + Send + Sync>| {
            Error::ConfigSave {
                path: path.to_path_buf(),
                source: e,
            }
        };

        fs::create_dir_all(&self.dir).map_err(|e| save_error(&self.dir, Box::new(e)))?;

        let path = self.file_path();
        let staging = self.dir.join(STAGING_FILE_NAME);
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| save_error(&path, Box::new(e)))?;

        fs::write(&staging, json).map_err(|e| save_error(&staging, Box::new(e)))?;
        fs::rename(&staging, &path).map_err(|e| save_error(&path, Box::new(e)))?;

        info!("Saved settings to {}", path.display());
        Ok(())
    }
}

/// Settings from the per-user location, or defaults if anything goes wrong.
pub fn load_config() -> Settings {
    match ConfigStore::locate() {
        Ok(store) => store.load_or_default(),
        Err(e) => {
            warn!("{}. Using default settings.", e);
            Settings::default()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(temp: &TempDir) -> ConfigStore {
        ConfigStore::in_dir(temp.path().join(APP_DIR_NAME))
    }

    fn write_raw(store: &ConfigStore, content: &str) {
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.file_path(), content).unwrap();
    }

    #[test]
    fn test_locate_ends_in_app_dir() {
        if let Ok(store) = ConfigStore::locate() {
            assert!(store.file_path().ends_with("inkwell/config.json"));
        }
    }

    #[test]
    fn test_missing_and_blank_files_give_defaults() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        assert_eq!(store.load().unwrap(), Settings::default());

        write_raw(&store, "  \n");
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        write_raw(&store, "{ not json");

        assert!(matches!(store.load(), Err(Error::ConfigParse { .. })));
        assert_eq!(store.load_or_default(), Settings::default());
    }

    #[test]
    fn test_load_sanitizes() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        write_raw(&store, r#"{"echo_suppression_ms": 1, "authority_quiescence_ms": 99999}"#);

        let settings = store.load().unwrap();
        assert_eq!(settings.echo_suppression_ms, Settings::MIN_ECHO_SUPPRESSION_MS);
        assert_eq!(
            settings.authority_quiescence_ms,
            Settings::MAX_AUTHORITY_QUIESCENCE_MS
        );
    }

    #[test]
    fn test_save_creates_dir_and_leaves_no_staging_file() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        let settings = Settings {
            show_preview: false,
            export_directory: Some(PathBuf::from("/tmp/prints")),
            ..Settings::default()
        };

        store.save(&settings).unwrap();
        assert!(!store.dir().join(STAGING_FILE_NAME).exists());
        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn test_save_replaces_existing_file() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        write_raw(&store, r#"{"show_preview": false}"#);

        store.save(&Settings::default()).unwrap();
        assert!(store.load().unwrap().show_preview);
    }

    #[test]
    fn test_save_into_file_path_fails() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let store = ConfigStore::in_dir(&blocker);
        assert!(matches!(
            store.save(&Settings::default()),
            Err(Error::ConfigSave { .. })
        ));
    }
}
