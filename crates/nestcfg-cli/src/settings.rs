//! TOML-based settings for the `nestcfg` tool.
//!
//! Settings are read from the platform-appropriate file:
//! - Windows:  `%APPDATA%\nestcfg\settings.toml`
//! - Linux:    `~/.config/nestcfg/settings.toml`
//! - macOS:    `~/Library/Application Support/nestcfg/settings.toml`
//!
//! Example:
//!
//! ```toml
//! [format]
//! indent = "    "
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every field has a `#[serde(default = ...)]`, so a partial file (or no file at
//! all) still yields a complete [`CliSettings`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings could not be serialized to TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Settings schema types ─────────────────────────────────────────────────────

/// Top-level settings stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CliSettings {
    #[serde(default)]
    pub format: FormatSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// How config files are written back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormatSettings {
    /// Indentation unit, repeated once per header nesting level.
    #[serde(default = "default_indent")]
    pub indent: String,
}

/// Diagnostics output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// `tracing` level used when `RUST_LOG` is unset: `"error"`, `"warn"`,
    /// `"info"`, `"debug"` or `"trace"`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_indent() -> String {
    nestcfg_core::DEFAULT_INDENT.to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            indent: default_indent(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ── Settings repository ───────────────────────────────────────────────────────

/// Resolves the full path to the default settings file.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformConfigDir`] if the base directory cannot
/// be determined.
pub fn settings_file_path() -> Result<PathBuf, SettingsError> {
    platform_config_dir()
        .map(|dir| dir.join("settings.toml"))
        .ok_or(SettingsError::NoPlatformConfigDir)
}

/// Loads settings from `path`, returning defaults if the file does not exist.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system errors other than "not
/// found", and [`SettingsError::Parse`] if the TOML is malformed.
pub fn load_settings_from(path: &Path) -> Result<CliSettings, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            debug!("loaded settings from {}", path.display());
            Ok(toml::from_str(&content)?)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CliSettings::default()),
        Err(e) => Err(SettingsError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Loads settings from `explicit` if given, otherwise from the platform file.
///
/// A missing platform directory is not an error: defaults are used.
///
/// # Errors
///
/// See [`load_settings_from`].
pub fn load_settings(explicit: Option<&Path>) -> Result<CliSettings, SettingsError> {
    match explicit {
        Some(path) => load_settings_from(path),
        None => match settings_file_path() {
            Ok(path) => load_settings_from(&path),
            Err(SettingsError::NoPlatformConfigDir) => Ok(CliSettings::default()),
            Err(e) => Err(e),
        },
    }
}

/// Persists `settings` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system failures or
/// [`SettingsError::Serialize`] if serialization fails.
pub fn save_settings_to(settings: &CliSettings, path: &Path) -> Result<(), SettingsError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = render_settings(settings)?;
    std::fs::write(path, content).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Renders `settings` as the TOML text that [`save_settings_to`] writes.
///
/// # Errors
///
/// Returns [`SettingsError::Serialize`] if serialization fails.
pub fn render_settings(settings: &CliSettings) -> Result<String, SettingsError> {
    Ok(toml::to_string_pretty(settings)?)
}

/// Resolves the platform config base directory for `nestcfg`.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("nestcfg"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("nestcfg"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support").join("nestcfg"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("nestcfg_settings_{}", Uuid::new_v4()))
    }

    #[test]
    fn test_default_indent_is_tab() {
        let settings = CliSettings::default();
        assert_eq!(settings.format.indent, "\t");
    }

    #[test]
    fn test_default_log_level_is_warn() {
        let settings = CliSettings::default();
        assert_eq!(settings.logging.level, "warn");
    }

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let settings: CliSettings = toml::from_str("").expect("deserialize empty");
        assert_eq!(settings, CliSettings::default());
    }

    #[test]
    fn test_deserialize_partial_toml_overrides_defaults() {
        // Arrange
        let toml_str = r#"
[format]
indent = "  "
"#;

        // Act
        let settings: CliSettings = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(settings.format.indent, "  ");
        assert_eq!(settings.logging.level, "warn");
    }

    #[test]
    fn test_deserialize_invalid_toml_returns_error() {
        let result: Result<CliSettings, toml::de::Error> = toml::from_str("[[[ not valid toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_settings_from_missing_file_returns_default() {
        let path = temp_dir().join("settings.toml");
        let settings = load_settings_from(&path).expect("missing file is not an error");
        assert_eq!(settings, CliSettings::default());
    }

    #[test]
    fn test_load_settings_from_malformed_file_is_parse_error() {
        // Arrange
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(&path, "format = 3 = 4").unwrap();

        // Act
        let result = load_settings_from(&path);

        // Assert
        assert!(matches!(result, Err(SettingsError::Parse(_))));

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_and_load_settings_round_trip_via_temp_dir() {
        // Arrange
        let dir = temp_dir();
        let path = dir.join("nested").join("settings.toml");
        let mut settings = CliSettings::default();
        settings.format.indent = "    ".to_string();
        settings.logging.level = "debug".to_string();

        // Act
        save_settings_to(&settings, &path).expect("save");
        let loaded = load_settings(Some(&path)).expect("load");

        // Assert
        assert_eq!(loaded, settings);

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_render_settings_parses_back() {
        let mut settings = CliSettings::default();
        settings.format.indent = "  ".to_string();

        let text = render_settings(&settings).expect("render");
        let parsed: CliSettings = toml::from_str(&text).expect("parse rendered");

        assert!(text.contains("[format]"));
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_settings_file_path_ends_with_settings_toml() {
        if let Ok(path) = settings_file_path() {
            assert!(
                path.ends_with("settings.toml"),
                "settings file must be named settings.toml, got {path:?}"
            );
        }
        // NoPlatformConfigDir (e.g. in a stripped CI env) is also acceptable.
    }
}
