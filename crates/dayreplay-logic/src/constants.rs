//! Day constants for replay length and sampling.
//!
//! Plain constants with no runtime dependency. The replay engine, the
//! harness, and the pure derivations all read these.

/// Hours in one simulated day.
pub const HOURS_IN_DAY: f64 = 24.0;

/// Real minutes one full simulated day takes to replay.
pub const DAY_DURATION_MINUTES: f64 = 5.0;

/// Real milliseconds one full simulated day takes to replay.
pub const DAY_DURATION_MS: f64 = DAY_DURATION_MINUTES * 60.0 * 1000.0;

/// Milliseconds in one hour.
pub const MS_PER_HOUR: f64 = 3_600_000.0;

/// Minutes in one hour.
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// One virtual minute expressed in hours.
pub const ONE_MINUTE_HOURS: f64 = 1.0 / MINUTES_PER_HOUR;

/// Chart sampling interval for the pulse series (5 virtual minutes).
pub const PULSE_SAMPLE_INTERVAL_HOURS: f64 = 5.0 / MINUTES_PER_HOUR;

/// Nutrition display throttle, in virtual minutes.
pub const NUTRITION_THROTTLE_MINUTES: f64 = 5.0;

/// Clamp bounds for each scalar metric.
pub mod bounds {
    pub const SUNSHINE_MIN: f64 = 0.0;
    pub const SUNSHINE_MAX: f64 = 100.0;
    pub const MOOD_MIN: f64 = 0.0;
    pub const MOOD_MAX: f64 = 100.0;
    /// CO2 parts per million.
    pub const AIR_PPM_MIN: f64 = 350.0;
    pub const AIR_PPM_MAX: f64 = 400.0;
    /// Lowest possible pulse: sleeping base minus full perturbation.
    pub const PULSE_MIN: f64 = 50.0;
    /// Highest possible pulse: morning exercise base plus full perturbation.
    pub const PULSE_MAX: f64 = 125.0;
}
