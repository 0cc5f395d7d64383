//! Scalar metrics of the simulated day, each a pure function of the hour.
//!
//! Every function is total over all real inputs. The input is reduced to
//! an hour of day (`t mod 24`) to pick a base value from a table of hour
//! windows; the oscillating perturbation is applied to the raw input.

use std::f64::consts::PI;

use crate::constants::{bounds, HOURS_IN_DAY};

/// Hour of day in `[0, 24)` for any real time.
pub fn hour_of_day(time: f64) -> f64 {
    let hour = time.rem_euclid(HOURS_IN_DAY);
    // rem_euclid can round up to exactly 24.0 for tiny negative inputs
    if hour >= HOURS_IN_DAY {
        0.0
    } else {
        hour
    }
}

/// Half-open window `[start, end)` of hours. Wraps past midnight when
/// `start > end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourWindow {
    pub start: f64,
    pub end: f64,
}

impl HourWindow {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Whether an hour of day falls inside the window.
    pub fn contains(&self, hour: f64) -> bool {
        if self.start <= self.end {
            hour >= self.start && hour < self.end
        } else {
            hour >= self.start || hour < self.end
        }
    }

    /// Length in hours.
    pub fn duration(&self) -> f64 {
        if self.start <= self.end {
            self.end - self.start
        } else {
            HOURS_IN_DAY - self.start + self.end
        }
    }
}

/// Sleep: 22:00 – 06:00.
pub const NIGHT: HourWindow = HourWindow::new(22.0, 6.0);

/// A base value selected by hour windows.
#[derive(Debug, Clone, Copy)]
pub struct Schedule<'a> {
    pub default: f64,
    pub windows: &'a [(HourWindow, f64)],
}

impl Schedule<'_> {
    /// First matching window wins.
    pub fn first_match(&self, hour: f64) -> f64 {
        self.windows
            .iter()
            .find(|(w, _)| w.contains(hour))
            .map(|&(_, v)| v)
            .unwrap_or(self.default)
    }

    /// Windows are evaluated in order and later matches override earlier ones.
    pub fn last_match(&self, hour: f64) -> f64 {
        self.windows
            .iter()
            .rev()
            .find(|(w, _)| w.contains(hour))
            .map(|&(_, v)| v)
            .unwrap_or(self.default)
    }
}

// ── Sunshine ────────────────────────────────────────────────────────────

/// Daylight window, inclusive on both ends.
const SUNRISE: f64 = 6.0;
const SUNSET: f64 = 18.0;

/// Sunshine percentage: a half sine from sunrise to sunset, zero at night.
pub fn sunshine(time: f64) -> f64 {
    let hour = hour_of_day(time);
    if !(SUNRISE..=SUNSET).contains(&hour) {
        return 0.0;
    }
    let normalized = (hour - SUNRISE) / (SUNSET - SUNRISE);
    ((normalized * PI).sin() * 100.0).clamp(bounds::SUNSHINE_MIN, bounds::SUNSHINE_MAX)
}

// ── Pulse ───────────────────────────────────────────────────────────────

const PULSE_WINDOWS: [(HourWindow, f64); 5] = [
    (NIGHT, 55.0),
    // Morning exercise
    (HourWindow::new(6.0, 7.0), 120.0),
    (HourWindow::new(12.0, 13.0), 85.0),
    (HourWindow::new(15.0, 16.0), 80.0),
    (HourWindow::new(18.0, 19.0), 90.0),
];

/// Resting pulse schedule: sleep first, then activity windows.
pub const PULSE_SCHEDULE: Schedule<'static> = Schedule {
    default: 65.0,
    windows: &PULSE_WINDOWS,
};

/// Heart rate in BPM, rounded to the nearest beat.
pub fn pulse(time: f64) -> f64 {
    let base = PULSE_SCHEDULE.last_match(hour_of_day(time));
    let variation = (time * 2.0).sin() * 5.0;
    (base + variation).round()
}

// ── Social connections ──────────────────────────────────────────────────

/// Disjoint windows partitioning the whole day.
pub const SOCIAL_WINDOWS: [(HourWindow, f64); 8] = [
    (NIGHT, 0.0),
    // Early morning
    (HourWindow::new(6.0, 8.0), 2.0),
    // Commute, work start
    (HourWindow::new(8.0, 10.0), 5.0),
    (HourWindow::new(10.0, 12.0), 12.0),
    // Lunch peak
    (HourWindow::new(12.0, 14.0), 18.0),
    (HourWindow::new(14.0, 17.0), 15.0),
    (HourWindow::new(17.0, 19.0), 10.0),
    (HourWindow::new(19.0, 22.0), 8.0),
];

const SOCIAL_SCHEDULE: Schedule<'static> = Schedule {
    default: 0.0,
    windows: &SOCIAL_WINDOWS,
};

/// Number of social connections in the current hour bracket.
pub fn social_connections(time: f64) -> f64 {
    SOCIAL_SCHEDULE.first_match(hour_of_day(time))
}

// ── Mood ────────────────────────────────────────────────────────────────

const MOOD_WINDOWS: [(HourWindow, f64); 4] = [
    (HourWindow::new(7.0, 9.0), 85.0),
    (HourWindow::new(12.0, 14.0), 90.0),
    (HourWindow::new(19.0, 21.0), 88.0),
    (NIGHT, 65.0),
];

const MOOD_SCHEDULE: Schedule<'static> = Schedule {
    default: 75.0,
    windows: &MOOD_WINDOWS,
};

/// Mood score in `[0, 100]`.
pub fn mood(time: f64) -> f64 {
    let base = MOOD_SCHEDULE.first_match(hour_of_day(time));
    let variation = (time * 0.5).sin() * 5.0;
    (base + variation).clamp(bounds::MOOD_MIN, bounds::MOOD_MAX)
}

// ── Air quality ─────────────────────────────────────────────────────────

const AIR_WINDOWS: [(HourWindow, f64); 4] = [
    // Early morning is cleanest; takes precedence over the night window
    (HourWindow::new(5.0, 8.0), 350.0),
    (HourWindow::new(8.0, 10.0), 380.0),
    (HourWindow::new(17.0, 19.0), 380.0),
    (NIGHT, 375.0),
];

const AIR_SCHEDULE: Schedule<'static> = Schedule {
    default: 365.0,
    windows: &AIR_WINDOWS,
};

/// CO2 concentration in PPM, clamped to `[350, 400]` and rounded.
pub fn air_quality(time: f64) -> f64 {
    let base = AIR_SCHEDULE.first_match(hour_of_day(time));
    let variation = (time * 0.3).sin() * 5.0;
    (base + variation)
        .clamp(bounds::AIR_PPM_MIN, bounds::AIR_PPM_MAX)
        .round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hour_of_day() {
        assert_eq!(hour_of_day(0.0), 0.0);
        assert_eq!(hour_of_day(24.0), 0.0);
        assert_eq!(hour_of_day(25.5), 1.5);
        assert_eq!(hour_of_day(-1.0), 23.0);
        assert!(hour_of_day(-1e-18) < HOURS_IN_DAY);
    }

    #[test]
    fn test_window_wraps_midnight() {
        assert!(NIGHT.contains(23.0));
        assert!(NIGHT.contains(0.0));
        assert!(NIGHT.contains(5.99));
        assert!(!NIGHT.contains(6.0));
        assert!(!NIGHT.contains(21.99));
        assert_eq!(NIGHT.duration(), 8.0);
    }

    #[test]
    fn test_sunshine_curve() {
        assert_eq!(sunshine(0.0), 0.0);
        assert_eq!(sunshine(5.99), 0.0);
        assert!(sunshine(6.0).abs() < 1e-9);
        assert!((sunshine(12.0) - 100.0).abs() < 1e-9);
        assert!(sunshine(18.0).abs() < 1e-9);
        assert_eq!(sunshine(18.01), 0.0);
        assert!((sunshine(9.0) - sunshine(15.0)).abs() < 1e-9);
        assert!((sunshine(36.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_pulse_brackets() {
        // sin(2t) at t = π/2·k is zero; pick times close to that for a clean base
        assert_eq!(pulse(0.0), 55.0);
        let t = 2.0 * PI; // 6.28h → morning exercise, sin(4π) = 0
        assert_eq!(pulse(t), 120.0);
        let t = 4.0 * PI; // 12.57h → midday, sin(8π) = 0
        assert_eq!(pulse(t), 85.0);
        let t = 5.0 * PI; // 15.71h → afternoon, sin(10π) = 0
        assert_eq!(pulse(t), 80.0);
        let t = 6.0 * PI - 0.5 * PI; // 17.28h → default, sin(11π) = 0
        assert_eq!(pulse(t), 65.0);
        let t = 6.0 * PI; // 18.85h → evening, sin(12π) = 0
        assert_eq!(pulse(t), 90.0);
        let t = 7.5 * PI; // 23.56h → night, sin(15π) = 0
        assert_eq!(pulse(t), 55.0);
    }

    #[test]
    fn test_pulse_is_integer() {
        for i in 0..=240 {
            let p = pulse(i as f64 * 0.1);
            assert_eq!(p, p.round());
        }
    }

    #[test]
    fn test_pulse_later_window_overrides() {
        let schedule = Schedule {
            default: 1.0,
            windows: &[
                (HourWindow::new(0.0, 10.0), 2.0),
                (HourWindow::new(5.0, 6.0), 3.0),
            ],
        };
        assert_eq!(schedule.last_match(5.5), 3.0);
        assert_eq!(schedule.first_match(5.5), 2.0);
        assert_eq!(schedule.last_match(11.0), 1.0);
    }

    #[test]
    fn test_social_brackets() {
        assert_eq!(social_connections(3.0), 0.0);
        assert_eq!(social_connections(7.0), 2.0);
        assert_eq!(social_connections(9.0), 5.0);
        assert_eq!(social_connections(11.0), 12.0);
        assert_eq!(social_connections(13.0), 18.0);
        assert_eq!(social_connections(16.0), 15.0);
        assert_eq!(social_connections(18.0), 10.0);
        assert_eq!(social_connections(20.0), 8.0);
        assert_eq!(social_connections(22.0), 0.0);
        assert_eq!(social_connections(24.0 + 13.0), 18.0);
    }

    #[test]
    fn test_social_windows_partition_day() {
        let total: f64 = SOCIAL_WINDOWS.iter().map(|(w, _)| w.duration()).sum();
        assert!((total - HOURS_IN_DAY).abs() < 1e-9);
        // Every minute of the day hits exactly one window
        for minute in 0..(24 * 60) {
            let hour = minute as f64 / 60.0;
            let hits = SOCIAL_WINDOWS.iter().filter(|(w, _)| w.contains(hour)).count();
            assert_eq!(hits, 1, "hour {} matched {} windows", hour, hits);
        }
    }

    #[test]
    fn test_mood_brackets() {
        // sin(0.5t) = 0 at t = 2πk
        assert!((mood(0.0) - 65.0).abs() < 1e-9);
        let t = 4.0 * PI; // 12.57h → lunch peak
        assert!((mood(t) - 90.0).abs() < 1e-9);
        let t = 2.0 * PI; // 6.28h → default
        assert!((mood(t) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_mood_morning_and_evening() {
        assert_eq!(mood(8.0), 85.0 + (8.0f64 * 0.5).sin() * 5.0);
        assert_eq!(mood(20.0), 88.0 + (20.0f64 * 0.5).sin() * 5.0);
        // Window edges are half-open
        assert_eq!(mood(9.0), 75.0 + (9.0f64 * 0.5).sin() * 5.0);
        assert_eq!(mood(21.0), 75.0 + (21.0f64 * 0.5).sin() * 5.0);
    }

    #[test]
    fn test_air_quality_early_morning_beats_night() {
        // 5:30 lies in both the early-morning and night windows
        let v = air_quality(5.5);
        let expected = (350.0 + (5.5f64 * 0.3).sin() * 5.0).clamp(350.0, 400.0).round();
        assert_eq!(v, expected);
        assert!(v <= 355.0);
    }

    #[test]
    fn test_air_quality_peaks() {
        assert_eq!(air_quality(9.0), (380.0 + (9.0f64 * 0.3).sin() * 5.0).round());
        assert_eq!(air_quality(9.0), 382.0);
        assert_eq!(air_quality(18.0), (380.0 + (18.0f64 * 0.3).sin() * 5.0).round());
        assert_eq!(air_quality(18.0), 376.0);
        assert_eq!(air_quality(0.0), 375.0);
    }

    #[test]
    fn test_metric_bounds_sweep() {
        for i in 0..=2400 {
            let t = i as f64 * 0.01;
            let s = sunshine(t);
            assert!((0.0..=100.0).contains(&s));
            if !(6.0..=18.0).contains(&t) {
                assert_eq!(s, 0.0);
            }
            let p = pulse(t);
            assert!((bounds::PULSE_MIN..=bounds::PULSE_MAX).contains(&p));
            let m = mood(t);
            assert!((0.0..=100.0).contains(&m));
            let a = air_quality(t);
            assert!((350.0..=400.0).contains(&a));
        }
    }
}
