//! DayReplay Core - compressed replay of a simulated day
//!
//! Plays one simulated 24-hour day in five real minutes and keeps a
//! snapshot of every derived metric in step with the virtual time.
//!
//! # Architecture
//!
//! - **Clock**: [`clock::ReplayClock`] owns the only mutable state, the
//!   playback state, and derives virtual time from a real-time origin
//! - **Frames**: [`frame::FrameSlot`] holds the single pending repaint
//!   callback; [`frame::RepaintLoop`] drives it at a fixed cadence
//! - **Dashboard**: [`dashboard::Dashboard`] recomputes the pure metrics
//!   from `dayreplay-logic` whenever the virtual time changes
//!
//! # Example
//!
//! ```rust,no_run
//! use dayreplay_core::prelude::*;
//! use dayreplay_core::frame::RepaintLoop;
//! use std::time::Duration;
//!
//! let mut dashboard = Dashboard::realtime();
//! dashboard.play();
//!
//! RepaintLoop::default().run_for(Duration::from_secs(10), |_| {
//!     dashboard.frame();
//!     true
//! });
//! println!("{}", dashboard.snapshot().clock_label);
//! ```

pub mod clock;
pub mod dashboard;
pub mod frame;
pub mod time_source;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::clock::{PlaybackState, PlaybackStatus, ReplayClock};
    pub use crate::dashboard::{Dashboard, DashboardSnapshot};
    pub use crate::time_source::{ManualTimeSource, MonotonicTimeSource, TimeSource};
}
