//! # Day/Night Theme Selection
//!
//! The theme is recomputed from the local hour on every tick. There is no
//! memory of the previous mode and no hysteresis around the boundaries.

use crate::ThemeMode;
use chrono::{DateTime, Local, Timelike};

/// First hour (inclusive) that counts as day
pub const DAY_START_HOUR: u32 = 6;

/// First hour (inclusive) that counts as night again
pub const NIGHT_START_HOUR: u32 = 18;

/// Theme for a local hour of day (0-23).
///
/// ```
/// use daynight_clock_lib::{theme::theme_for_hour, ThemeMode};
///
/// assert_eq!(theme_for_hour(6), ThemeMode::Day);
/// assert_eq!(theme_for_hour(18), ThemeMode::Night);
/// ```
pub fn theme_for_hour(hour: u32) -> ThemeMode {
    if (DAY_START_HOUR..NIGHT_START_HOUR).contains(&hour) {
        ThemeMode::Day
    } else {
        ThemeMode::Night
    }
}

/// Theme for a timestamp, using its local hour.
pub fn select_theme(timestamp: &DateTime<Local>) -> ThemeMode {
    theme_for_hour(timestamp.hour())
}
