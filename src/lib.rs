//! # Day/Night Clock Core Library
//!
//! This library provides the data model and the pieces of the day/night clock:
//! a one-second clock source, the day/night theme rule, one-shot geolocation,
//! reverse geocoding against OpenCage, and a pure display composer.
//!
//! ## Data Flow
//!
//! Two independent branches feed a single state record:
//! 1. **Clock**: ticker → [`theme::select_theme`] → display
//! 2. **Location**: [`geolocation::LocationProvider`] → [`geocoder::OpenCageClient`] → display
//!
//! Every event goes through [`state::update`], which returns a fresh
//! [`state::ClockState`] plus at most one follow-up [`state::Command`]. The
//! runtime in [`app`] is the only place that owns tasks and the surface.
//!
//! ## Core Types
//!
//! - [`Coordinates`]: a one-shot position reading
//! - [`ThemeMode`]: day or night, derived from the hour
//! - [`DisplayError`]: the single user-visible error line

use thiserror::Error;

pub mod app;
pub mod clock;
pub mod config;
pub mod geocoder;
pub mod geolocation;
pub mod renderer;
pub mod state;
pub mod theme;

#[cfg(test)]
mod tests;

/// A position reading in degrees.
///
/// Readings come from a [`geolocation::LocationProvider`] exactly once per
/// session and are never modified afterwards.
///
/// # Example
/// ```
/// use daynight_clock_lib::Coordinates;
///
/// let tashkent = Coordinates { latitude: 41.2995, longitude: 69.2401 };
/// assert!(tashkent.is_valid());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    /// Degrees north of the equator (-90 to 90)
    pub latitude: f64,
    /// Degrees east of Greenwich (-180 to 180)
    pub longitude: f64,
}

impl Coordinates {
    /// True when both values are finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Visual mode controlling which background image is shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeMode {
    Day,
    Night,
}

/// The user-visible error line.
///
/// Only one error is shown at a time; a later failure replaces an earlier
/// one. None of these stop the clock.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum DisplayError {
    /// The host has no position capability at all
    #[error("Geolocation is not supported by your browser")]
    GeolocationUnsupported,

    /// Permission denied, timeout or position unavailable
    #[error("Unable to retrieve your location")]
    GeolocationFailed,

    /// Reverse-geocoding request or response failed
    #[error("Failed to fetch location details")]
    AddressFetchFailed,
}

#[cfg(test)]
mod core_tests {
    use super::*;

    #[test]
    fn test_coordinates_validity() {
        assert!(Coordinates { latitude: 0.0, longitude: 0.0 }.is_valid());
        assert!(Coordinates { latitude: -90.0, longitude: 180.0 }.is_valid());
        assert!(!Coordinates { latitude: 90.5, longitude: 0.0 }.is_valid());
        assert!(!Coordinates { latitude: 0.0, longitude: -181.0 }.is_valid());
        assert!(!Coordinates { latitude: f64::NAN, longitude: 0.0 }.is_valid());
    }

    #[test]
    fn test_display_error_messages() {
        assert_eq!(
            DisplayError::GeolocationUnsupported.to_string(),
            "Geolocation is not supported by your browser"
        );
        assert_eq!(
            DisplayError::GeolocationFailed.to_string(),
            "Unable to retrieve your location"
        );
        assert_eq!(
            DisplayError::AddressFetchFailed.to_string(),
            "Failed to fetch location details"
        );
    }
}
