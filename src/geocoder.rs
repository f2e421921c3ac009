//! # Reverse Geocoding via OpenCage
//!
//! This module turns a single [`Coordinates`] reading into a `"City, Country"`
//! line by asking the OpenCage geocoding service once.
//!
//! ## Request
//!
//! ```text
//! GET https://api.opencagedata.com/geocode/v1/json?q={lat}+{lon}&key={API_KEY}
//! ```
//!
//! The key is read from the environment variable named in the config
//! (`geocoder.api_key_env`), never from source.
//!
//! ## Response Handling
//! - **Results present**: first result's components, locality falls back
//!   city → town → village → "Unknown city", country → "Unknown country"
//! - **Zero results**: "Location not found" (a valid answer, not an error)
//! - **Anything else**: network failure, non-2xx status or unparseable body
//!   all become an [`AddressError`]
//!
//! There is no cache and no retry; the session lookup happens once.

use crate::{
    config::{Config, GeocoderConfig},
    Coordinates,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Shown when the service answered but knows nothing about the position
pub const LOCATION_NOT_FOUND: &str = "Location not found";

/// Locality fallback when none of city, town or village is present
pub const UNKNOWN_CITY: &str = "Unknown city";

/// Country fallback
pub const UNKNOWN_COUNTRY: &str = "Unknown country";

/// Errors that can occur while resolving an address.
#[derive(Error, Debug)]
pub enum AddressError {
    /// No API key in the configured environment variable
    #[error("geocoder API key not set (expected in ${0})")]
    MissingApiKey(String),

    /// Transport failure or non-success status
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Body was not the expected JSON shape
    #[error("malformed geocoder response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Top level of the OpenCage JSON body. Only the fields we read.
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub components: Components,
}

/// Address components of a single result.
#[derive(Debug, Default, Deserialize)]
pub struct Components {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub country: Option<String>,
}

impl Components {
    /// city → town → village → "Unknown city"
    pub fn locality(&self) -> &str {
        [&self.city, &self.town, &self.village]
            .into_iter()
            .find_map(non_empty)
            .unwrap_or(UNKNOWN_CITY)
    }

    pub fn country(&self) -> &str {
        non_empty(&self.country).unwrap_or(UNKNOWN_COUNTRY)
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// Build the display line from a parsed response.
///
/// ```
/// use daynight_clock_lib::geocoder::{address_from_response, GeocodeResponse};
///
/// let body = r#"{"results":[{"components":{"town":"Nukus","country":"Uzbekistan"}}]}"#;
/// let response: GeocodeResponse = serde_json::from_str(body).unwrap();
/// assert_eq!(address_from_response(&response), "Nukus, Uzbekistan");
/// ```
pub fn address_from_response(response: &GeocodeResponse) -> String {
    match response.results.first() {
        Some(result) => format!(
            "{}, {}",
            result.components.locality(),
            result.components.country()
        ),
        None => LOCATION_NOT_FOUND.to_string(),
    }
}

/// Parse a raw response body and build the display line.
pub fn address_from_body(body: &str) -> Result<String, AddressError> {
    let response: GeocodeResponse = serde_json::from_str(body)?;
    Ok(address_from_response(&response))
}

/// Client for the OpenCage reverse-geocoding endpoint.
#[derive(Debug, Clone)]
pub struct OpenCageClient {
    http: reqwest::Client,
    endpoint: String,
    api_key_env: String,
    api_key: Option<String>,
}

impl OpenCageClient {
    /// Client for `endpoint`. A missing key is reported against the default
    /// variable name.
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        OpenCageClient {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key_env: GeocoderConfig::default().api_key_env,
            api_key,
        }
    }

    /// Replace the underlying HTTP client.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Client for the configured endpoint, key taken from the environment.
    pub fn from_config(config: &Config) -> Self {
        let mut client = Self::new(config.geocoder.endpoint.clone(), config.api_key());
        client.api_key_env = config.geocoder.api_key_env.clone();
        client
    }

    /// Full request URL for a reading.
    pub fn request_url(&self, coords: Coordinates, api_key: &str) -> String {
        format!(
            "{}?q={}+{}&key={}",
            self.endpoint, coords.latitude, coords.longitude, api_key
        )
    }

    /// Resolve a reading into `"City, Country"` or "Location not found".
    pub async fn lookup(&self, coords: Coordinates) -> Result<String, AddressError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AddressError::MissingApiKey(self.api_key_env.clone()))?;

        debug!(
            latitude = coords.latitude,
            longitude = coords.longitude,
            "requesting reverse geocode"
        );

        let body = self
            .http
            .get(self.request_url(coords, api_key))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let address = address_from_body(&body).inspect_err(|e| {
            warn!(error = %e, "geocoder returned an unexpected body");
        })?;
        debug!(%address, "reverse geocode resolved");
        Ok(address)
    }
}
