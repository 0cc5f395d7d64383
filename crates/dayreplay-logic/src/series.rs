//! Chart sample series.

use serde::Serialize;

use crate::constants::HOURS_IN_DAY;
use crate::metrics::{pulse, social_connections};

/// One `(time, value)` sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub time: f64,
    pub value: f64,
}

/// Sample times from 0 up to `current` every `interval_hours`, always
/// ending exactly at `current`.
///
/// `current` is capped at the end of the day, so `+inf` samples the whole
/// day and ends at 24.
pub fn sample_times(current: f64, interval_hours: f64) -> Vec<f64> {
    let mut times = Vec::new();
    let current = if current > HOURS_IN_DAY { HOURS_IN_DAY } else { current };
    if !(interval_hours > 0.0) || !(current >= 0.0) {
        times.push(current.max(0.0));
        return times;
    }

    let mut i = 0u64;
    loop {
        let t = i as f64 * interval_hours;
        if t > current {
            break;
        }
        times.push(t);
        i += 1;
    }
    if times.last() != Some(&current) {
        times.push(current);
    }
    times
}

/// Pulse history from midnight up to `current`.
pub fn pulse_series(current: f64, interval_hours: f64) -> Vec<SeriesPoint> {
    sample_times(current, interval_hours)
        .into_iter()
        .map(|time| SeriesPoint {
            time,
            value: pulse(time),
        })
        .collect()
}

/// Social connections at every whole hour of the day, 0 through 24.
pub fn social_series() -> Vec<SeriesPoint> {
    (0..=HOURS_IN_DAY as u32)
        .map(|h| {
            let time = h as f64;
            SeriesPoint {
                time,
                value: social_connections(time),
            }
        })
        .collect()
}
