//! Hierarchical packager settings loader
//!
//! Loads settings from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. User settings (~/.modpack/settings.yaml)
//! 3. Environment variables (MODPACK_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::PackagerSettings;
use crate::utils::get_home_dir;
use rust_embed::RustEmbed;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/embedded/"]
#[prefix = ""]
struct EmbeddedConfigs;

const DEFAULTS_FILE: &str = "settings-defaults.yaml";
const SETTINGS_FILE: &str = "settings.yaml";

/// Settings hierarchy loader
pub struct SettingsLoader {
    /// Directory holding the user settings file
    config_dir: PathBuf,
}

impl SettingsLoader {
    /// Create a loader rooted at ~/.modpack
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_dir: get_home_dir()?.join(".modpack"),
        })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Load settings with hierarchical precedence
    pub fn load(&self) -> Result<PackagerSettings> {
        let mut settings = Self::load_embedded_defaults()?;

        let user_file = self.config_dir.join(SETTINGS_FILE);
        if user_file.exists() {
            debug!("Applying user settings from {}", user_file.display());
            settings = Self::load_yaml_file(&user_file)?;
        }

        let settings = Self::apply_env_overrides(settings)?;
        Self::check(&settings)?;
        Ok(settings)
    }

    /// Reject settings that load fine but cannot work
    fn check(settings: &PackagerSettings) -> Result<()> {
        if settings.network.download_timeout_secs == 0 {
            return Err(Error::invalid_config(
                "download timeout must be greater than zero seconds",
            ));
        }
        Ok(())
    }

    /// Built-in defaults
    pub fn load_embedded_defaults() -> Result<PackagerSettings> {
        let embedded_file = EmbeddedConfigs::get(DEFAULTS_FILE).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", DEFAULTS_FILE))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", DEFAULTS_FILE))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                DEFAULTS_FILE, e
            ))
        })
    }

    /// Parse a settings file; keys it leaves out keep their built-in defaults
    fn load_yaml_file(path: &Path) -> Result<PackagerSettings> {
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content).map_err(|e| {
            Error::invalid_config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn apply_env_overrides(mut settings: PackagerSettings) -> Result<PackagerSettings> {
        if let Ok(val) = env::var("MODPACK_DOWNLOAD_TIMEOUT_SECS") {
            settings.network.download_timeout_secs = val.parse().map_err(|_| {
                Error::invalid_config("MODPACK_DOWNLOAD_TIMEOUT_SECS must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("MODPACK_DEFAULT_NAMESPACE") {
            settings.naming.default_namespace = val;
        }

        if let Ok(val) = env::var("MODPACK_TEMP_PREFIX") {
            settings.naming.temp_file_prefix = val;
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_embedded_defaults_match_builtin_defaults() {
        let embedded = SettingsLoader::load_embedded_defaults().unwrap();
        let builtin = PackagerSettings::default();
        assert_eq!(embedded.naming, builtin.naming);
        assert_eq!(embedded.labels, builtin.labels);
        assert_eq!(
            embedded.network.download_timeout_secs,
            builtin.network.download_timeout_secs
        );
    }

    #[test]
    #[serial]
    fn test_user_file_overrides_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("settings.yaml"),
            "naming:\n  default-namespace: module-system\n",
        )
        .unwrap();

        let settings = SettingsLoader::with_dir(temp_dir.path()).load().unwrap();
        assert_eq!(settings.naming.default_namespace, "module-system");
        assert_eq!(settings.naming.temp_file_prefix, "modpack-");
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        env::set_var("MODPACK_DOWNLOAD_TIMEOUT_SECS", "7");
        env::set_var("MODPACK_TEMP_PREFIX", "pkg-");
        let result = SettingsLoader::with_dir(temp_dir.path()).load();
        env::remove_var("MODPACK_DOWNLOAD_TIMEOUT_SECS");
        env::remove_var("MODPACK_TEMP_PREFIX");

        let settings = result.unwrap();
        assert_eq!(settings.network.download_timeout_secs, 7);
        assert_eq!(settings.naming.temp_file_prefix, "pkg-");
    }

    #[test]
    #[serial]
    fn test_invalid_env_timeout() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        env::set_var("MODPACK_DOWNLOAD_TIMEOUT_SECS", "soon");
        let result = SettingsLoader::with_dir(temp_dir.path()).load();
        env::remove_var("MODPACK_DOWNLOAD_TIMEOUT_SECS");
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    #[serial]
    fn test_zero_timeout_rejected() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        env::set_var("MODPACK_DOWNLOAD_TIMEOUT_SECS", "0");
        let result = SettingsLoader::with_dir(temp_dir.path()).load();
        env::remove_var("MODPACK_DOWNLOAD_TIMEOUT_SECS");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("greater than zero"), "got {}", err);

        std::fs::write(
            temp_dir.path().join("settings.yaml"),
            "network:\n  download-timeout-secs: 0\n",
        )
        .unwrap();
        let result = SettingsLoader::with_dir(temp_dir.path()).load();
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }
}
