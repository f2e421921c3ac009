//! # One-Shot Geolocation
//!
//! A [`LocationProvider`] answers a single position query. The runtime asks
//! exactly once per session and never retries, even after a failure.
//!
//! Every retrieval failure (denied, timed out, unavailable, garbage reading)
//! collapses into [`GeolocationError::Unavailable`]; the reason is kept for
//! logs only.

use crate::{config::Config, Coordinates, DisplayError};
use thiserror::Error;

/// Why a position query failed.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum GeolocationError {
    /// The host exposes no position capability
    #[error("geolocation capability is absent")]
    Unsupported,

    /// The capability exists but could not produce a reading
    #[error("position unavailable: {0}")]
    Unavailable(String),
}

impl From<&GeolocationError> for DisplayError {
    fn from(error: &GeolocationError) -> Self {
        match error {
            GeolocationError::Unsupported => DisplayError::GeolocationUnsupported,
            GeolocationError::Unavailable(_) => DisplayError::GeolocationFailed,
        }
    }
}

/// Host position capability.
pub trait LocationProvider {
    /// Produce one position reading.
    fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Host without any geolocation capability.
#[derive(Debug, Default)]
pub struct NoGeolocation;

impl LocationProvider for NoGeolocation {
    fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}

/// Reading taken from the `[location]` table of the configuration.
#[derive(Debug)]
pub struct ConfiguredLocation {
    reading: Coordinates,
}

impl ConfiguredLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        ConfiguredLocation {
            reading: Coordinates {
                latitude,
                longitude,
            },
        }
    }
}

impl LocationProvider for ConfiguredLocation {
    fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        if self.reading.is_valid() {
            Ok(self.reading)
        } else {
            Err(GeolocationError::Unavailable(format!(
                "reading out of range: {}, {}",
                self.reading.latitude, self.reading.longitude
            )))
        }
    }
}

/// Pick the provider described by the configuration.
pub fn provider_from_config(config: &Config) -> Box<dyn LocationProvider + Send> {
    match &config.location {
        Some(location) if location.enabled => Box::new(ConfiguredLocation::new(
            location.latitude,
            location.longitude,
        )),
        _ => Box::new(NoGeolocation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocationConfig;

    #[test]
    fn test_no_geolocation_is_unsupported() {
        assert_eq!(
            NoGeolocation.current_position(),
            Err(GeolocationError::Unsupported)
        );
    }

    #[test]
    fn test_configured_location_yields_reading() {
        let provider = ConfiguredLocation::new(51.5074, -0.1278);
        let coords = provider.current_position().unwrap();
        assert_eq!(coords.latitude, 51.5074);
        assert_eq!(coords.longitude, -0.1278);
    }

    #[test]
    fn test_invalid_reading_collapses_to_unavailable() {
        let provider = ConfiguredLocation::new(123.0, 0.0);
        let err = provider.current_position().unwrap_err();
        assert!(matches!(err, GeolocationError::Unavailable(_)));
        assert_eq!(DisplayError::from(&err), DisplayError::GeolocationFailed);
    }

    #[test]
    fn test_provider_from_config() {
        let mut config = Config::default();
        assert_eq!(
            provider_from_config(&config).current_position(),
            Err(GeolocationError::Unsupported)
        );

        config.location = Some(LocationConfig {
            enabled: false,
            latitude: 10.0,
            longitude: 10.0,
        });
        assert_eq!(
            provider_from_config(&config).current_position(),
            Err(GeolocationError::Unsupported)
        );

        config.location = Some(LocationConfig {
            enabled: true,
            latitude: 10.0,
            longitude: 20.0,
        });
        assert_eq!(
            provider_from_config(&config).current_position(),
            Ok(Coordinates {
                latitude: 10.0,
                longitude: 20.0
            })
        );
    }
}
