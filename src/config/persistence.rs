//! Configuration file persistence
//!
//! Loads and saves [`Settings`] under the platform config directory with
//! graceful fallback to defaults.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
const APP_NAME: &str = "slipbox";

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Backup configuration file name (used during atomic writes)
const CONFIG_BACKUP_NAME: &str = "config.json.bak";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the application.
///
/// - **Windows**: `%APPDATA%\slipbox\`
/// - **macOS**: `~/Library/Application Support/slipbox/`
/// - **Linux**: `~/.config/slipbox/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the config directory cannot be determined
/// (e.g., if the HOME environment variable is not set).
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the configuration file.
pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Load configuration from the default config file location.
///
/// A missing, empty or corrupted file yields default settings; the failure
/// is logged, never returned.
pub fn load_config() -> Settings {
    get_config_file_path()
        .and_then(|path| load_config_from(&path))
        .unwrap_or_warn_default(Settings::default(), "Failed to load configuration")
}

/// Load configuration from an explicit file.
///
/// Returns defaults when the file does not exist or is empty.
///
/// # Errors
///
/// - `Error::ConfigLoad`: the file exists but cannot be read
/// - `Error::InvalidJson`: the file is not valid settings JSON
pub fn load_config_from(config_path: &Path) -> Result<Settings> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Settings::default());
        }
        Err(e) => {
            return Err(Error::ConfigLoad {
                path: config_path.to_path_buf(),
                source: Box::new(e),
            })
        }
    };

    if contents.trim().is_empty() {
        debug!("Config at {} is empty, using defaults", config_path.display());
        return Ok(Settings::default());
    }

    let settings = Settings::from_json_sanitized(&contents).map_err(|e| Error::InvalidJson {
        message: format!("config file {}: {}", config_path.display(), e),
        source: Some(Box::new(e)),
    })?;

    info!("Loaded settings from {}", config_path.display());
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Save configuration to the default config file location.
///
/// # Errors
///
/// - `Error::ConfigDirNotFound`: Config directory cannot be determined
/// - `Error::ConfigSave`: Failed to write the config file
pub fn save_config(settings: &Settings) -> Result<()> {
    save_config_to(settings, &get_config_file_path()?)
}

/// Save configuration to an explicit file, creating missing parent
/// directories.
///
/// The JSON goes to a sibling backup file that is then renamed over the
/// target, so the config on disk is always either the old or the new one.
pub fn save_config_to(settings: &Settings, config_path: &Path) -> Result<()> {
    if let Some(dir) = config_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(save_failed(dir))?;
    }

    let json = serde_json::to_string_pretty(settings).map_err(save_failed(config_path))?;
    let backup_path = config_path.with_file_name(CONFIG_BACKUP_NAME);
    fs::write(&backup_path, json).map_err(save_failed(&backup_path))?;
    fs::rename(&backup_path, config_path).map_err(save_failed(config_path))?;

    info!("Saved settings to {}", config_path.display());
    Ok(())
}

/// Map a write-side failure at `path` to `Error::ConfigSave`.
fn save_failed<E>(path: &Path) -> impl FnOnce(E) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    let path = path.to_path_buf();
    move |e| Error::ConfigSave {
        path,
        source: Box::new(e),
    }
}

/// Save configuration, ignoring errors.
///
/// Returns `true` if the save was successful, `false` otherwise.
pub fn save_config_silent(settings: &Settings) -> bool {
    match save_config(settings) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save configuration: {}", e);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContentMode;
    use tempfile::TempDir;

    /// Temporary config directory holding a `config.json` path.
    struct TestEnv {
        _temp_dir: TempDir,
        config_file: PathBuf,
    }

    impl TestEnv {
        fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let config_file = temp_dir.path().join(APP_NAME).join(CONFIG_FILE_NAME);
            Self {
                _temp_dir: temp_dir,
                config_file,
            }
        }

        fn write_config(&self, content: &str) {
            if let Some(dir) = self.config_file.parent() {
                fs::create_dir_all(dir).expect("Failed to create config dir");
            }
            fs::write(&self.config_file, content).expect("Failed to write config");
        }
    }

    #[test]
    fn test_get_config_dir_contains_app_name() {
        if let Ok(path) = get_config_dir() {
            assert!(path.to_string_lossy().contains(APP_NAME));
        }
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let env = TestEnv::new();
        let settings = load_config_from(&env.config_file).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let env = TestEnv::new();
        env.write_config("   \n");
        let settings = load_config_from(&env.config_file).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_corrupted_file_is_parse_error() {
        let env = TestEnv::new();
        env.write_config("{ invalid json }");
        let err = load_config_from(&env.config_file).unwrap_err();
        assert!(matches!(err, Error::InvalidJson { .. }));
    }

    #[test]
    fn test_load_sanitizes_values() {
        let env = TestEnv::new();
        env.write_config(r#"{"palette_offset": 1000.0, "line_height": 1.0}"#);
        let settings = load_config_from(&env.config_file).unwrap();
        assert_eq!(settings.palette_offset, Settings::MAX_PALETTE_OFFSET);
        assert_eq!(settings.line_height, Settings::MIN_LINE_HEIGHT);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let env = TestEnv::new();
        let original = Settings {
            auto_markdown: false,
            content_mode: ContentMode::Html,
            placeholder: "Write here".to_string(),
            ..Settings::default()
        };

        save_config_to(&original, &env.config_file).unwrap();
        let loaded = load_config_from(&env.config_file).unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_save_leaves_no_backup_behind() {
        let env = TestEnv::new();
        save_config_to(&Settings::default(), &env.config_file).unwrap();
        assert!(env.config_file.exists());
        assert!(!env.config_file.with_file_name(CONFIG_BACKUP_NAME).exists());
    }

    #[test]
    fn test_load_config_graceful_fallback() {
        // Whatever is on disk, the public loader always yields usable settings
        let settings = load_config();
        assert!(settings.palette_offset <= Settings::MAX_PALETTE_OFFSET);
    }
}
