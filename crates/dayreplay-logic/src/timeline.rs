//! Real ↔ virtual time conversion and clock formatting.
//!
//! A [`Timeline`] fixes how many real milliseconds one simulated day
//! lasts. The two conversions are exact inverses of each other; the replay
//! clock relies on that to derive virtual time from a real origin without
//! accumulating drift.

use serde::{Deserialize, Serialize};

use crate::constants::{DAY_DURATION_MS, HOURS_IN_DAY, MINUTES_PER_HOUR, MS_PER_HOUR};

/// Compression of a simulated day onto real time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Real milliseconds for one full simulated day.
    pub day_duration_ms: f64,
    /// Simulated hours in one day.
    pub hours_in_day: f64,
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            day_duration_ms: DAY_DURATION_MS,
            hours_in_day: HOURS_IN_DAY,
        }
    }
}

impl Timeline {
    /// Virtual hours → real milliseconds.
    pub fn hours_to_ms(&self, hours: f64) -> f64 {
        (hours / self.hours_in_day) * self.day_duration_ms
    }

    /// Real milliseconds → virtual hours.
    pub fn ms_to_hours(&self, ms: f64) -> f64 {
        (ms / self.day_duration_ms) * self.hours_in_day
    }

    /// Virtual time elapsed per unit of real time (288 for the default day).
    pub fn compression_ratio(&self) -> f64 {
        self.hours_in_day * MS_PER_HOUR / self.day_duration_ms
    }

    /// Clamp an arbitrary hour value onto `[0, hours_in_day]`.
    ///
    /// NaN maps to the start of the day.
    pub fn clamp_hours(&self, hours: f64) -> f64 {
        if hours.is_nan() {
            return 0.0;
        }
        hours.clamp(0.0, self.hours_in_day)
    }
}

/// Format virtual hours as `HH:MM` (both components floored).
pub fn format_clock(hours: f64) -> String {
    let h = hours.floor();
    let m = ((hours - h) * MINUTES_PER_HOUR).floor();
    format!("{:02}:{:02}", h as i64, m as i64)
}

/// Round a time (hours) to the nearest multiple of `interval_minutes`.
///
/// Used to smooth displayed values; a non-positive interval returns the
/// time unchanged. Works in whole minutes so that e.g. 7:30 comes back as
/// exactly 7.5.
pub fn throttle_time(time: f64, interval_minutes: f64) -> f64 {
    if !(interval_minutes > 0.0) {
        return time;
    }
    let steps = (time * MINUTES_PER_HOUR / interval_minutes).round();
    steps * interval_minutes / MINUTES_PER_HOUR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NUTRITION_THROTTLE_MINUTES;

    #[test]
    fn test_compression_ratio() {
        assert!((Timeline::default().compression_ratio() - 288.0).abs() < 1e-9);
    }

    #[test]
    fn test_full_day_maps_to_five_minutes() {
        let tl = Timeline::default();
        assert!((tl.hours_to_ms(24.0) - 300_000.0).abs() < 1e-9);
        assert!((tl.ms_to_hours(300_000.0) - 24.0).abs() < 1e-9);
        assert!((tl.hours_to_ms(12.0) - 150_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_conversions_are_inverse() {
        let tl = Timeline::default();
        let mut ms = 0.0;
        while ms <= 300_000.0 {
            let back = tl.hours_to_ms(tl.ms_to_hours(ms));
            assert!((back - ms).abs() < 1e-6, "ms {} came back as {}", ms, back);
            ms += 1_234.5;
        }
        for hours in [0.0, 0.001, 3.0, 7.5, 12.25, 23.999, 24.0] {
            let back = tl.ms_to_hours(tl.hours_to_ms(hours));
            assert!((back - hours).abs() < 1e-9);
        }
    }

    #[test]
    fn test_clamp_hours() {
        let tl = Timeline::default();
        assert_eq!(tl.clamp_hours(-3.0), 0.0);
        assert_eq!(tl.clamp_hours(30.0), 24.0);
        assert_eq!(tl.clamp_hours(5.5), 5.5);
        assert_eq!(tl.clamp_hours(f64::NAN), 0.0);
        assert_eq!(tl.clamp_hours(f64::INFINITY), 24.0);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(7.5), "07:30");
        assert_eq!(format_clock(12.999), "12:59");
        assert_eq!(format_clock(24.0), "24:00");
    }

    #[test]
    fn test_throttle_time() {
        let step = NUTRITION_THROTTLE_MINUTES;
        assert_eq!(throttle_time(0.0, step), 0.0);
        // 7:32 rounds to 7:30, 7:33 rounds to 7:35
        assert_eq!(throttle_time(7.0 + 32.0 / 60.0, step), 7.5);
        assert!((throttle_time(7.0 + 33.0 / 60.0, step) - (7.0 + 35.0 / 60.0)).abs() < 1e-9);
        assert_eq!(throttle_time(3.3, 0.0), 3.3);
    }
}
