//! # Clock State and Update Function
//!
//! All session state lives in one [`ClockState`] record. Events never mutate
//! it in place: [`update`] returns the next record plus an optional
//! [`Command`] for the runtime to carry out.
//!
//! ## Field Ownership
//! | Field         | Written by                      |
//! |---------------|---------------------------------|
//! | `now`, `theme`| [`Event::Tick`]                 |
//! | `coordinates` | [`Event::LocationResolved`] (ok)|
//! | `address`     | [`Event::AddressResolved`] (ok) |
//! | `error`       | any failed event, latest wins   |

use crate::{
    geocoder::AddressError, geolocation::GeolocationError, theme::select_theme, Coordinates,
    DisplayError, ThemeMode,
};
use chrono::{DateTime, Local};
use tracing::{info, warn};

/// Everything the display needs for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ClockState {
    pub now: DateTime<Local>,
    pub theme: ThemeMode,
    pub coordinates: Option<Coordinates>,
    pub address: Option<String>,
    pub error: Option<DisplayError>,
}

impl ClockState {
    /// Initial record; the theme already follows `now`.
    pub fn new(now: DateTime<Local>) -> Self {
        ClockState {
            theme: select_theme(&now),
            now,
            coordinates: None,
            address: None,
            error: None,
        }
    }
}

/// Something that happened on one of the asynchronous branches.
#[derive(Debug)]
pub enum Event {
    /// Clock trigger fired
    Tick(DateTime<Local>),
    /// One-shot position query finished
    LocationResolved(Result<Coordinates, GeolocationError>),
    /// Reverse geocode finished
    AddressResolved(Result<String, AddressError>),
}

/// Work the runtime must start after an update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    LookupAddress(Coordinates),
}

/// Result of applying one event.
#[derive(Debug, PartialEq)]
pub struct Transition {
    pub state: ClockState,
    pub command: Option<Command>,
}

impl Transition {
    fn quiet(state: ClockState) -> Self {
        Transition {
            state,
            command: None,
        }
    }
}

/// Apply one event to the current state.
pub fn update(state: &ClockState, event: Event) -> Transition {
    match event {
        Event::Tick(now) => Transition::quiet(ClockState {
            now,
            theme: select_theme(&now),
            ..state.clone()
        }),

        Event::LocationResolved(Ok(coords)) => {
            if state.coordinates.is_some() {
                warn!("ignoring second position reading");
                return Transition::quiet(state.clone());
            }
            info!(
                latitude = coords.latitude,
                longitude = coords.longitude,
                "position acquired"
            );
            Transition {
                state: ClockState {
                    coordinates: Some(coords),
                    ..state.clone()
                },
                command: Some(Command::LookupAddress(coords)),
            }
        }

        Event::LocationResolved(Err(e)) => {
            warn!(error = %e, "geolocation failed");
            Transition::quiet(ClockState {
                error: Some(DisplayError::from(&e)),
                ..state.clone()
            })
        }

        Event::AddressResolved(_) if state.coordinates.is_none() => {
            warn!("dropping address result without coordinates");
            Transition::quiet(state.clone())
        }

        Event::AddressResolved(Ok(address)) => Transition::quiet(ClockState {
            address: Some(address),
            ..state.clone()
        }),

        Event::AddressResolved(Err(e)) => {
            warn!(error = %e, "address lookup failed");
            Transition::quiet(ClockState {
                error: Some(DisplayError::AddressFetchFailed),
                ..state.clone()
            })
        }
    }
}
