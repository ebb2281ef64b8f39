//! Track time display formatting
//!
//! Positions and durations shown next to the seek bar use a clock-style
//! format whose width depends on the magnitude of the value.

/// Values at or above this many seconds include an hours component
const HOURS_FORMAT_MIN: u64 = 60 * 60;

/// Format seconds as a track time.
///
/// - `mm:ss` below one hour
/// - `hh:mm:ss` from one hour up
///
/// Every component is zero-padded to two digits and the seconds are floored.
/// Negative and non-finite input formats as zero.
///
/// # Examples
///
/// ```
/// use webremote_common::human_time::format_track_time;
///
/// assert_eq!(format_track_time(0.0), "00:00");
/// assert_eq!(format_track_time(59.9), "00:59");
/// assert_eq!(format_track_time(330.0), "05:30");
/// assert_eq!(format_track_time(3661.0), "01:01:01");
/// ```
pub fn format_track_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };

    let hours = total / HOURS_FORMAT_MIN;
    let minutes = (total % HOURS_FORMAT_MIN) / 60;
    let secs = total % 60;

    if hours >= 1 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Format a millisecond position as a track time.
///
/// # Examples
///
/// ```
/// use webremote_common::human_time::format_track_position;
///
/// assert_eq!(format_track_position(5_000), "00:05");
/// assert_eq!(format_track_position(7_200_000), "02:00:00");
/// ```
pub fn format_track_position(position_ms: u64) -> String {
    format_track_time(position_ms as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes_format() {
        assert_eq!(format_track_time(0.0), "00:00");
        assert_eq!(format_track_time(5.0), "00:05");
        assert_eq!(format_track_time(60.0), "01:00");
        assert_eq!(format_track_time(3599.0), "59:59");
    }

    #[test]
    fn test_hours_format() {
        assert_eq!(format_track_time(3600.0), "01:00:00");
        assert_eq!(format_track_time(7322.0), "02:02:02");
        assert_eq!(format_track_time(36_000.0), "10:00:00");
    }

    #[test]
    fn test_hours_are_not_wrapped() {
        // Very long streams keep counting hours past a day
        assert_eq!(format_track_time(100.0 * 3600.0), "100:00:00");
    }

    #[test]
    fn test_fractional_seconds_floor() {
        assert_eq!(format_track_time(59.999), "00:59");
        assert_eq!(format_track_time(3599.5), "59:59");
    }

    #[test]
    fn test_invalid_values_format_as_zero() {
        assert_eq!(format_track_time(-5.0), "00:00");
        assert_eq!(format_track_time(f64::NAN), "00:00");
        assert_eq!(format_track_time(f64::INFINITY), "00:00");
    }

    #[test]
    fn test_position_millis() {
        assert_eq!(format_track_position(0), "00:00");
        assert_eq!(format_track_position(999), "00:00");
        assert_eq!(format_track_position(61_500), "01:01");
    }
}
