//! Replay clock - maps real elapsed time onto a compressed virtual day.
//!
//! While playing, virtual time is always derived from the real-time origin
//! (`now - origin`), never accumulated from per-frame deltas, so it cannot
//! drift. The origin moves only on play, on seek while playing, and on
//! the end-of-day wrap.

use dayreplay_logic::timeline::Timeline;
use serde::Serialize;

use crate::frame::FrameSlot;
use crate::time_source::{MonotonicTimeSource, TimeSource};

/// Coarse playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaybackStatus {
    /// At 00:00, not playing.
    Stopped,
    Playing,
    Paused,
}

/// Serializable view of the clock's state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaybackState {
    /// Last emitted virtual time in hours.
    pub virtual_time: f64,
    pub is_playing: bool,
    /// Real-clock reading (ms) that corresponds to virtual 00:00.
    pub real_time_origin: f64,
    pub status: PlaybackStatus,
}

type TimeListener = Box<dyn FnMut(f64)>;
type LoopCallback = Box<dyn FnMut()>;

/// Compressed real-time playback of one simulated day.
pub struct ReplayClock<S: TimeSource = MonotonicTimeSource> {
    source: S,
    timeline: Timeline,
    status: PlaybackStatus,
    /// Last emitted virtual time.
    current_time: f64,
    /// Position to resume from when not playing.
    position: f64,
    origin_ms: f64,
    frame: FrameSlot,
    loops_completed: u64,
    listeners: Vec<TimeListener>,
    on_loop: Option<LoopCallback>,
}

impl<S: TimeSource> ReplayClock<S> {
    /// Create a stopped clock using the default 5-minute day.
    pub fn new(source: S) -> Self {
        Self::with_timeline(source, Timeline::default())
    }

    pub fn with_timeline(source: S, timeline: Timeline) -> Self {
        Self {
            source,
            timeline,
            status: PlaybackStatus::Stopped,
            current_time: 0.0,
            position: 0.0,
            origin_ms: 0.0,
            frame: FrameSlot::new(),
            loops_completed: 0,
            listeners: Vec::new(),
            on_loop: None,
        }
    }

    /// Current virtual time in hours, within `[0, 24]`.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            virtual_time: self.current_time,
            is_playing: self.is_playing(),
            real_time_origin: self.origin_ms,
            status: self.status,
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Number of completed day wraps since creation.
    pub fn loops_completed(&self) -> u64 {
        self.loops_completed
    }

    /// Whether a frame callback is armed.
    pub fn frame_pending(&self) -> bool {
        self.frame.is_pending()
    }

    /// Register a listener for every emitted virtual time.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(f64) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Set the callback invoked once per completed day.
    pub fn set_on_loop<F>(&mut self, callback: F)
    where
        F: FnMut() + 'static,
    {
        self.on_loop = Some(Box::new(callback));
    }

    /// Start or resume playback. No-op if already playing.
    pub fn play(&mut self) {
        if self.is_playing() {
            return;
        }
        let now = self.source.now_ms();
        self.origin_ms = now - self.timeline.hours_to_ms(self.position);
        self.status = PlaybackStatus::Playing;
        let handle = self.frame.request();
        log::debug!(
            "replay: play from {:.3}h (frame {})",
            self.position,
            handle.id()
        );
    }

    /// Pause playback, capturing the current virtual time. No-op unless playing.
    pub fn pause(&mut self) {
        if !self.is_playing() {
            return;
        }
        let hours = self.elapsed_hours();
        self.position = hours;
        self.status = PlaybackStatus::Paused;
        self.frame.cancel();
        self.emit(hours);
        log::debug!("replay: paused at {:.3}h", hours);
    }

    /// Stop and return to 00:00.
    pub fn reset(&mut self) {
        self.status = PlaybackStatus::Stopped;
        self.position = 0.0;
        self.origin_ms = 0.0;
        self.frame.cancel();
        self.emit(0.0);
        log::debug!("replay: reset");
    }

    /// Jump to `hours`, clamped to the day. Playback state is unchanged.
    pub fn seek(&mut self, hours: f64) {
        let target = self.timeline.clamp_hours(hours);
        self.position = target;
        if self.is_playing() {
            self.origin_ms = self.source.now_ms() - self.timeline.hours_to_ms(target);
        } else if self.status == PlaybackStatus::Stopped && target > 0.0 {
            self.status = PlaybackStatus::Paused;
        }
        self.emit(target);
        log::debug!("replay: seek to {:.3}h", target);
    }

    pub fn toggle_play(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Run the pending frame callback, if one is armed.
    ///
    /// Recomputes virtual time from the origin, wraps at the end of the
    /// day, and re-arms the next frame. Returns the new virtual time, or
    /// `None` when no frame was pending.
    pub fn on_frame(&mut self) -> Option<f64> {
        self.frame.take()?;
        if !self.is_playing() {
            return None;
        }

        let now = self.source.now_ms();
        let hours = self.timeline.ms_to_hours(now - self.origin_ms).max(0.0);

        if hours >= self.timeline.hours_in_day {
            self.emit(self.timeline.hours_in_day);
            self.position = 0.0;
            self.origin_ms = now;
            self.emit(0.0);
            self.loops_completed += 1;
            log::info!("replay: day {} complete, looping", self.loops_completed);
            if let Some(callback) = self.on_loop.as_mut() {
                callback();
            }
        } else {
            self.emit(hours);
        }

        self.frame.request();
        Some(self.current_time)
    }

    /// Virtual time implied by the origin, clamped to the day.
    fn elapsed_hours(&self) -> f64 {
        let ms = self.source.now_ms() - self.origin_ms;
        self.timeline.clamp_hours(self.timeline.ms_to_hours(ms))
    }

    fn emit(&mut self, hours: f64) {
        if hours == self.current_time {
            return;
        }
        self.current_time = hours;
        for listener in self.listeners.iter_mut() {
            listener(hours);
        }
    }
}
