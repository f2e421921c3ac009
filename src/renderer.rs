//! # Display Composition and Rendering
//!
//! [`compose`] turns a [`ClockState`] into a [`Frame`], the visual tree of one
//! screen. [`render_ascii`] draws a frame as a centred text panel for the
//! terminal. Neither touches the network or the clock.

use crate::{config::DisplayConfig, state::ClockState, ThemeMode};
use chrono::{DateTime, Local};

/// Background layout: scaled to cover the whole viewport
pub const BACKGROUND_SIZE: &str = "cover";

/// Background layout: anchored at the centre of the viewport
pub const BACKGROUND_POSITION: &str = "center";

/// Label printed in front of the resolved address
pub const LOCATION_LABEL: &str = "Location:";

/// Full-viewport background image.
#[derive(Clone, Debug, PartialEq)]
pub struct Background {
    pub image: String,
    pub size: &'static str,
    pub position: &'static str,
}

/// One screen worth of content.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub background: Background,
    pub theme: ThemeMode,
    pub date: String,
    pub time: String,
    /// Present only once coordinates and an address are both known
    pub location: Option<String>,
    pub error: Option<String>,
}

/// Zero-padded 24-hour `HH:MM:SS`.
///
/// ```
/// use chrono::{Local, TimeZone};
/// use daynight_clock_lib::renderer::format_time;
///
/// let t = Local.with_ymd_and_hms(2024, 1, 1, 1, 2, 3).unwrap();
/// assert_eq!(format_time(&t), "01:02:03");
/// ```
pub fn format_time(timestamp: &DateTime<Local>) -> String {
    timestamp.format("%H:%M:%S").to_string()
}

/// Long en-US date, e.g. "Monday, January 1, 2024".
///
/// chrono's unlocalised names are the English ones, so the output does not
/// depend on the host locale.
pub fn format_date(timestamp: &DateTime<Local>) -> String {
    timestamp.format("%A, %B %-d, %Y").to_string()
}

/// Configured image for the theme.
pub fn background_image(theme: ThemeMode, display: &DisplayConfig) -> &str {
    match theme {
        ThemeMode::Day => &display.day_image,
        ThemeMode::Night => &display.night_image,
    }
}

/// Build the frame for the current state.
pub fn compose(state: &ClockState, display: &DisplayConfig) -> Frame {
    let location = match (&state.coordinates, &state.address) {
        (Some(_), Some(address)) if !address.is_empty() => {
            Some(format!("{} {}", LOCATION_LABEL, address))
        }
        _ => None,
    };

    Frame {
        background: Background {
            image: background_image(state.theme, display).to_string(),
            size: BACKGROUND_SIZE,
            position: BACKGROUND_POSITION,
        },
        theme: state.theme,
        date: format_date(&state.now),
        time: format_time(&state.now),
        location,
        error: state.error.as_ref().map(ToString::to_string),
    }
}

/// Draw a frame as a boxed, centred text panel.
///
/// The panel grows past `width` when a line would not fit.
pub fn render_ascii(frame: &Frame, width: usize) -> String {
    let banner = match frame.theme {
        ThemeMode::Day => format!("☀ DAY  [{}]", frame.background.image),
        ThemeMode::Night => format!("☾ NIGHT  [{}]", frame.background.image),
    };

    let mut body = vec![
        banner,
        String::new(),
        frame.date.clone(),
        frame.time.clone(),
    ];
    if let Some(location) = &frame.location {
        body.push(String::new());
        body.push(location.clone());
    }
    if let Some(error) = &frame.error {
        body.push(String::new());
        body.push(format!("! {}", error));
    }

    let longest = body.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    let inner = width.saturating_sub(2).max(longest + 4);

    let mut out = String::new();
    out.push('┌');
    out.push_str(&"─".repeat(inner));
    out.push_str("┐\n");
    for line in &body {
        let len = line.chars().count();
        let left = (inner - len) / 2;
        let right = inner - len - left;
        out.push('│');
        out.push_str(&" ".repeat(left));
        out.push_str(line);
        out.push_str(&" ".repeat(right));
        out.push_str("│\n");
    }
    out.push('└');
    out.push_str(&"─".repeat(inner));
    out.push_str("┘\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Coordinates, DisplayError};
    use chrono::TimeZone;

    fn state_at(hour: u32) -> ClockState {
        ClockState::new(Local.with_ymd_and_hms(2024, 1, 1, hour, 2, 3).unwrap())
    }

    #[test]
    fn test_format_time_pads() {
        let t = Local.with_ymd_and_hms(2024, 1, 1, 1, 2, 3).unwrap();
        assert_eq!(format_time(&t), "01:02:03");
        assert_eq!(format_time(&t), format_time(&t));

        let late = Local.with_ymd_and_hms(2024, 1, 1, 23, 59, 59).unwrap();
        assert_eq!(format_time(&late), "23:59:59");
    }

    #[test]
    fn test_format_date_long_form() {
        let t = Local.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(format_date(&t), "Monday, January 1, 2024");

        let t = Local.with_ymd_and_hms(2025, 11, 27, 9, 30, 0).unwrap();
        assert_eq!(format_date(&t), "Thursday, November 27, 2025");
    }

    #[test]
    fn test_background_follows_theme() {
        let display = DisplayConfig::default();
        assert_eq!(compose(&state_at(10), &display).background.image, "assets/day.jpg");
        assert_eq!(compose(&state_at(20), &display).background.image, "assets/night.jpg");

        let frame = compose(&state_at(20), &display);
        assert_eq!(frame.background.size, "cover");
        assert_eq!(frame.background.position, "center");
    }

    #[test]
    fn test_location_line_needs_coordinates_and_address() {
        let display = DisplayConfig::default();
        let coords = Coordinates {
            latitude: 1.0,
            longitude: 2.0,
        };

        let mut state = state_at(10);
        state.address = Some("Orphan, Address".into());
        assert_eq!(compose(&state, &display).location, None);

        state.coordinates = Some(coords);
        state.address = Some(String::new());
        assert_eq!(compose(&state, &display).location, None);

        state.address = Some("Tashkent, Uzbekistan".into());
        assert_eq!(
            compose(&state, &display).location.as_deref(),
            Some("Location: Tashkent, Uzbekistan")
        );
    }

    #[test]
    fn test_error_line() {
        let display = DisplayConfig::default();
        let mut state = state_at(10);
        assert_eq!(compose(&state, &display).error, None);

        state.error = Some(DisplayError::AddressFetchFailed);
        assert_eq!(
            compose(&state, &display).error.as_deref(),
            Some("Failed to fetch location details")
        );
    }

    #[test]
    fn test_ascii_rendering() {
        let mut state = state_at(20);
        state.error = Some(DisplayError::GeolocationUnsupported);
        let frame = compose(&state, &DisplayConfig::default());
        let text = render_ascii(&frame, 40);

        assert!(text.contains("NIGHT"));
        assert!(text.contains("20:02:03"));
        assert!(text.contains("Monday, January 1, 2024"));
        assert!(text.contains("! Geolocation is not supported by your browser"));
        assert!(!text.contains("Location:"));

        // every row has the same visible width
        let widths: Vec<usize> = text.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{:?}", widths);
    }
}
