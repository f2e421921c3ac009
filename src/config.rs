//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the clock-config.toml file.
//! It covers the display images and cadence, the reverse-geocoding endpoint, and the
//! optional position reading that stands in for the host's geolocation capability.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "clock-config.toml";

/// Application configuration loaded from clock-config.toml
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Display and UI configuration
    #[serde(default)]
    pub display: DisplayConfig,
    /// Reverse-geocoding service configuration
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    /// Position reading; absent means the host has no geolocation capability
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationConfig>,
}

/// Display and visualization configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Background image shown between 06:00 and 18:00
    pub day_image: String,
    /// Background image shown the rest of the day
    pub night_image: String,
    /// Terminal width in columns used to centre the panel
    pub width: usize,
    /// Clock cadence in milliseconds
    pub tick_millis: u64,
}

/// OpenCage reverse-geocoding configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// JSON endpoint without query string
    pub endpoint: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
}

/// A fixed position reading
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocationConfig {
    /// Set to false to behave as if geolocation were unsupported
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub latitude: f64,
    pub longitude: f64,
}

fn default_enabled() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            day_image: "assets/day.jpg".to_string(),
            night_image: "assets/night.jpg".to_string(),
            width: 60,
            tick_millis: 1000,
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        GeocoderConfig {
            endpoint: "https://api.opencagedata.com/geocode/v1/json".to_string(),
            api_key_env: "OPENCAGE_API_KEY".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from clock-config.toml file
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "invalid config file format, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }

    /// Read the geocoder API key from the configured environment variable.
    /// Empty values count as missing.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.geocoder.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.display.tick_millis, 1000);
        assert_eq!(config.display.day_image, "assets/day.jpg");
        assert_eq!(config.display.night_image, "assets/night.jpg");
        assert_eq!(
            config.geocoder.endpoint,
            "https://api.opencagedata.com/geocode/v1/json"
        );
        assert_eq!(config.geocoder.api_key_env, "OPENCAGE_API_KEY");
        assert!(config.location.is_none());
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.location = Some(LocationConfig {
            enabled: true,
            latitude: 41.3,
            longitude: 69.24,
        });
        let file = NamedTempFile::new().unwrap();
        config.save_to_path(file.path()).unwrap();

        let parsed = Config::load_from_path(file.path());
        let location = parsed.location.expect("location should survive");
        assert_eq!(location.latitude, 41.3);
        assert_eq!(location.longitude, 69.24);
        assert_eq!(parsed.display.width, config.display.width);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let file = NamedTempFile::new().unwrap();
        fs::write(
            file.path(),
            "[location]\nlatitude = 48.85\nlongitude = 2.35\n\n[display]\nnight_image = \"moon.png\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(file.path());
        assert_eq!(config.display.night_image, "moon.png");
        assert_eq!(config.display.day_image, "assets/day.jpg");
        assert_eq!(config.geocoder.api_key_env, "OPENCAGE_API_KEY");
        let location = config.location.unwrap();
        assert!(location.enabled);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "[display\nwidth = ").unwrap();
        let config = Config::load_from_path(file.path());
        assert_eq!(config.display.tick_millis, 1000);
    }

    #[test]
    fn test_load_without_local_file_uses_defaults() {
        // the crate root ships only clock-config.example.toml
        assert!(!Path::new(DEFAULT_CONFIG_PATH).exists());
        let config = Config::load();
        assert!(config.location.is_none());
        assert_eq!(config.display.tick_millis, 1000);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        assert!(config.location.is_none());
    }

    #[test]
    fn test_api_key_from_named_variable() {
        let mut config = Config::default();
        config.geocoder.api_key_env = "DAYNIGHT_CLOCK_TEST_KEY_PRESENT".to_string();
        std::env::set_var("DAYNIGHT_CLOCK_TEST_KEY_PRESENT", "abc123");
        assert_eq!(config.api_key().as_deref(), Some("abc123"));

        config.geocoder.api_key_env = "DAYNIGHT_CLOCK_TEST_KEY_BLANK".to_string();
        std::env::set_var("DAYNIGHT_CLOCK_TEST_KEY_BLANK", "  ");
        assert!(config.api_key().is_none());

        config.geocoder.api_key_env = "DAYNIGHT_CLOCK_TEST_KEY_UNSET".to_string();
        assert!(config.api_key().is_none());
    }
}
