//! Configuration file handling for ~/.guia/config.ini.
//!
//! Loads and saves user configuration with sensible defaults. Settings
//! structs live in [`super::settings`].

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::gatekeeper::AccuracyProfile;

use super::settings::{CacheSettings, ConfigFile, GatekeeperSettings, GeocoderSettings};

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.guia/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        parse_ini(&ini)
    }

    /// Save configuration to the default path (~/.guia/config.ini).
    pub fn save(&self) -> Result<(), ConfigFileError> {
        let path = config_file_path();
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            let config = Self::default();
            config.save_to(&path)?;
        }
        Ok(path)
    }
}

/// Get the path to the config directory (~/.guia).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".guia")
}

/// Get the path to the config file (~/.guia/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

/// Parse a loaded INI document, falling back to defaults per key.
fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let defaults = ConfigFile::default();

    let gatekeeper = GatekeeperSettings {
        profile: parse_key(ini, "gatekeeper", "profile", defaults.gatekeeper.profile, |v| {
            v.parse::<AccuracyProfile>().ok()
        })?,
        distance_threshold_m: parse_key(
            ini,
            "gatekeeper",
            "distance_threshold_m",
            defaults.gatekeeper.distance_threshold_m,
            |v| v.parse::<f64>().ok().filter(|m| *m > 0.0),
        )?,
        long_interval_secs: parse_key(
            ini,
            "gatekeeper",
            "long_interval_secs",
            defaults.gatekeeper.long_interval_secs,
            |v| v.parse::<u64>().ok(),
        )?,
        min_interval_secs: parse_key(
            ini,
            "gatekeeper",
            "min_interval_secs",
            defaults.gatekeeper.min_interval_secs,
            |v| v.parse::<u64>().ok(),
        )?,
    };

    let geocoder = GeocoderSettings {
        base_url: ini
            .get_from(Some("geocoder"), "base_url")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or(defaults.geocoder.base_url),
        timeout_secs: parse_key(
            ini,
            "geocoder",
            "timeout_secs",
            defaults.geocoder.timeout_secs,
            |v| v.parse::<u64>().ok().filter(|t| *t > 0),
        )?,
    };

    let cache = CacheSettings {
        max_entries: parse_key(ini, "cache", "max_entries", defaults.cache.max_entries, |v| {
            v.parse::<usize>().ok()
        })?,
        fingerprint_decimals: parse_key(
            ini,
            "cache",
            "fingerprint_decimals",
            defaults.cache.fingerprint_decimals,
            |v| v.parse::<u32>().ok().filter(|d| *d <= 7),
        )?,
    };

    Ok(ConfigFile {
        gatekeeper,
        geocoder,
        cache,
    })
}

/// Parse one key, keeping the default when the key is absent and
/// erroring when it is present but invalid.
fn parse_key<T, F>(
    ini: &Ini,
    section: &str,
    key: &str,
    default: T,
    parse: F,
) -> Result<T, ConfigFileError>
where
    F: Fn(&str) -> Option<T>,
{
    match ini.get_from(Some(section), key) {
        None => Ok(default),
        Some(value) => parse(value).ok_or_else(|| ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "not a valid value for this key".to_string(),
        }),
    }
}

/// Serialize a configuration to INI text.
fn to_config_string(config: &ConfigFile) -> String {
    format!(
        "[gatekeeper]\n\
         profile = {}\n\
         distance_threshold_m = {}\n\
         long_interval_secs = {}\n\
         min_interval_secs = {}\n\
         \n\
         [geocoder]\n\
         base_url = {}\n\
         timeout_secs = {}\n\
         \n\
         [cache]\n\
         max_entries = {}\n\
         fingerprint_decimals = {}\n",
        config.gatekeeper.profile,
        config.gatekeeper.distance_threshold_m,
        config.gatekeeper.long_interval_secs,
        config.gatekeeper.min_interval_secs,
        config.geocoder.base_url,
        config.geocoder.timeout_secs,
        config.cache.max_entries,
        config.cache.fingerprint_decimals,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.gatekeeper.profile = AccuracyProfile::Desktop;
        config.gatekeeper.distance_threshold_m = 35.0;
        config.geocoder.base_url = "http://localhost:8080".to_string();
        config.cache.max_entries = 500;

        config.save_to(&config_path).unwrap();
        let loaded = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_missing_keys() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, "[geocoder]\nbase_url = http://localhost:9999\n").unwrap();

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config.geocoder.base_url, "http://localhost:9999");
        assert_eq!(config.gatekeeper, GatekeeperSettings::default());
        assert_eq!(config.cache, CacheSettings::default());
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(
            &config_path,
            "[gatekeeper]\ndistance_threshold_m = twenty\n",
        )
        .unwrap();

        let result = ConfigFile::load_from(&config_path);
        match result {
            Err(ConfigFileError::InvalidValue { section, key, .. }) => {
                assert_eq!(section, "gatekeeper");
                assert_eq!(key, "distance_threshold_m");
            }
            other => panic!("Expected InvalidValue, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, "[gatekeeper]\ndistance_threshold_m = -5\n").unwrap();

        assert!(ConfigFile::load_from(&config_path).is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, "[geocoder]\nbase_url = http://localhost:8080/\n").unwrap();

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config.geocoder.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_profile_parsing() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, "[gatekeeper]\nprofile = desktop\n").unwrap();

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config.gatekeeper.profile, AccuracyProfile::Desktop);

        std::fs::write(&config_path, "[gatekeeper]\nprofile = watch\n").unwrap();
        assert!(ConfigFile::load_from(&config_path).is_err());
    }
}
