//! Repaint scheduling: the single pending frame callback and a
//! cooperative loop that drives it.
//!
//! The replay clock never runs on its own thread. It arms a [`FrameSlot`]
//! while playing and the host calls back into it once per repaint. The
//! slot holds at most one pending request, so cancelling is a plain
//! `take`.

use std::time::{Duration, Instant};

/// Identifier of one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Registry for at most one pending frame callback.
#[derive(Debug, Default)]
pub struct FrameSlot {
    next_id: u64,
    pending: Option<FrameHandle>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the next frame, replacing any request already pending.
    pub fn request(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    /// Consume the pending request so its callback can run.
    pub fn take(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    /// Drop the pending request without running it. Returns whether one
    /// was pending.
    pub fn cancel(&mut self) -> bool {
        self.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Default repaint cadence.
pub const DEFAULT_REFRESH_HZ: u32 = 60;

/// Fixed-cadence cooperative repaint driver.
///
/// Calls the frame closure once per refresh interval on the current
/// thread, sleeping between frames.
#[derive(Debug, Clone, Copy)]
pub struct RepaintLoop {
    interval: Duration,
}

impl RepaintLoop {
    pub fn new(refresh_hz: u32) -> Self {
        let hz = refresh_hz.max(1);
        Self {
            interval: Duration::from_secs_f64(1.0 / hz as f64),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run frames until `duration` of real time has passed or the closure
    /// returns `false`. Returns the number of frames run.
    pub fn run_for<F>(&self, duration: Duration, mut frame: F) -> u64
    where
        F: FnMut(u64) -> bool,
    {
        let start = Instant::now();
        let mut count = 0u64;
        let mut next = start;

        while start.elapsed() < duration {
            let keep_going = frame(count);
            count += 1;
            if !keep_going {
                break;
            }
            next += self.interval;
            let now = Instant::now();
            if next > now {
                std::thread::sleep(next - now);
            } else {
                // Fell behind; skip missed frames instead of bursting
                next = now;
            }
        }
        count
    }
}

impl Default for RepaintLoop {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_HZ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_holds_one_request() {
        let mut slot = FrameSlot::new();
        assert!(!slot.is_pending());
        let first = slot.request();
        let second = slot.request();
        assert_ne!(first, second);
        assert!(slot.is_pending());
        assert_eq!(slot.take(), Some(second));
        assert!(!slot.is_pending());
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_cancel_clears_request() {
        let mut slot = FrameSlot::new();
        slot.request();
        assert!(slot.cancel());
        assert!(!slot.cancel());
        assert!(!slot.is_pending());
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_handles_increase() {
        let mut slot = FrameSlot::new();
        let a = slot.request().id();
        slot.cancel();
        let b = slot.request().id();
        assert!(b > a);
    }

    #[test]
    fn test_repaint_loop_stops_on_false() {
        let lp = RepaintLoop::new(1000);
        let frames = lp.run_for(Duration::from_secs(5), |i| i < 2);
        assert_eq!(frames, 3);
    }

    #[test]
    fn test_repaint_loop_bounded_by_duration() {
        let lp = RepaintLoop::new(200);
        let frames = lp.run_for(Duration::from_millis(30), |_| true);
        assert!(frames >= 1);
        assert!(frames < 100);
    }

    #[test]
    fn test_zero_hz_clamped() {
        assert_eq!(RepaintLoop::new(0).interval(), Duration::from_secs(1));
    }
}
