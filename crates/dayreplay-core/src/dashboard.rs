//! Dashboard engine - main entry point for replaying the simulated day.
//!
//! Composes a [`ReplayClock`] with a [`DayProfile`]. Each repaint drives
//! the clock one frame; whenever the virtual time changes, every metric is
//! recomputed into a fresh [`DashboardSnapshot`]. Snapshots are memoized
//! by time, so repeated reads at an unchanged time are free.

use dayreplay_logic::constants::{NUTRITION_THROTTLE_MINUTES, PULSE_SAMPLE_INTERVAL_HOURS};
use dayreplay_logic::food::FoodGroup;
use dayreplay_logic::metrics::{air_quality, mood, pulse, social_connections, sunshine};
use dayreplay_logic::nutrition::{energy_percentage, nutrition, NutritionSnapshot};
use dayreplay_logic::profile::DayProfile;
use dayreplay_logic::series::{pulse_series, social_series, SeriesPoint};
use dayreplay_logic::timeline::{format_clock, throttle_time, Timeline};
use serde::Serialize;

use crate::clock::{PlaybackStatus, ReplayClock};
use crate::time_source::{MonotonicTimeSource, TimeSource};

/// One labelled food-group share, largest first.
#[derive(Debug, Clone, Serialize)]
pub struct FoodGroupShare {
    pub group: FoodGroup,
    pub label: &'static str,
    pub percent: f64,
}

/// Everything the display needs at one virtual time.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub time: f64,
    /// `HH:MM`
    pub clock_label: String,
    pub sunshine: f64,
    /// CO2 PPM.
    pub air_quality: f64,
    /// BPM.
    pub pulse: f64,
    pub mood: f64,
    pub social_connections: f64,
    /// Nutrition at the throttled display time.
    pub nutrition: NutritionSnapshot,
    /// Energy relative to the daily goal, `[0, 100]`.
    pub energy_percent: f64,
    pub food_groups_ranked: Vec<FoodGroupShare>,
    pub pulse_series: Vec<SeriesPoint>,
    pub social_series: Vec<SeriesPoint>,
}

impl DashboardSnapshot {
    /// Derive every metric at `time`.
    pub fn compute(profile: &DayProfile, time: f64) -> Self {
        let display_time = throttle_time(time, NUTRITION_THROTTLE_MINUTES);
        let nutrition = nutrition(profile, display_time);
        let energy_percent = energy_percentage(nutrition.energy, profile.daily_energy_goal);
        let food_groups_ranked = nutrition
            .food_groups
            .ranked()
            .into_iter()
            .map(|(group, percent)| FoodGroupShare {
                group,
                label: group.label(),
                percent,
            })
            .collect();

        Self {
            time,
            clock_label: format_clock(time),
            sunshine: sunshine(time),
            air_quality: air_quality(time),
            pulse: pulse(time),
            mood: mood(time),
            social_connections: social_connections(time),
            nutrition,
            energy_percent,
            food_groups_ranked,
            pulse_series: pulse_series(time, PULSE_SAMPLE_INTERVAL_HOURS),
            social_series: social_series(),
        }
    }
}

/// Replay clock plus memoized metric snapshot.
pub struct Dashboard<S: TimeSource = MonotonicTimeSource> {
    clock: ReplayClock<S>,
    profile: DayProfile,
    snapshot: DashboardSnapshot,
    recomputes: u64,
}

impl Dashboard<MonotonicTimeSource> {
    /// Dashboard on the wall clock with the built-in day.
    pub fn realtime() -> Self {
        Self::new(MonotonicTimeSource::new(), DayProfile::default())
    }
}

impl<S: TimeSource> Dashboard<S> {
    pub fn new(source: S, profile: DayProfile) -> Self {
        Self::with_timeline(source, profile, Timeline::default())
    }

    pub fn with_timeline(source: S, profile: DayProfile, timeline: Timeline) -> Self {
        let clock = ReplayClock::with_timeline(source, timeline);
        let snapshot = DashboardSnapshot::compute(&profile, clock.current_time());
        Self {
            clock,
            profile,
            snapshot,
            recomputes: 1,
        }
    }

    pub fn clock(&self) -> &ReplayClock<S> {
        &self.clock
    }

    /// Mutable clock access for registering listeners and callbacks.
    pub fn clock_mut(&mut self) -> &mut ReplayClock<S> {
        &mut self.clock
    }

    pub fn profile(&self) -> &DayProfile {
        &self.profile
    }

    pub fn current_time(&self) -> f64 {
        self.clock.current_time()
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.clock.status()
    }

    pub fn play(&mut self) {
        self.clock.play();
    }

    pub fn pause(&mut self) {
        self.clock.pause();
        self.refresh();
    }

    pub fn toggle_play(&mut self) {
        self.clock.toggle_play();
        self.refresh();
    }

    pub fn reset(&mut self) {
        self.clock.reset();
        self.refresh();
    }

    pub fn seek(&mut self, hours: f64) {
        self.clock.seek(hours);
        self.refresh();
    }

    /// Drive one repaint. Returns `true` when the snapshot changed.
    pub fn frame(&mut self) -> bool {
        if self.clock.on_frame().is_none() {
            return false;
        }
        self.refresh()
    }

    /// Snapshot at the current virtual time.
    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    /// How many times the snapshot has been derived.
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    fn refresh(&mut self) -> bool {
        let time = self.clock.current_time();
        if time == self.snapshot.time {
            return false;
        }
        self.snapshot = DashboardSnapshot::compute(&self.profile, time);
        self.recomputes += 1;
        log::trace!("dashboard: recomputed at {}", self.snapshot.clock_label);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_source::ManualTimeSource;

    fn dashboard() -> (Dashboard<ManualTimeSource>, ManualTimeSource) {
        let source = ManualTimeSource::new();
        (Dashboard::new(source.clone(), DayProfile::default()), source)
    }

    #[test]
    fn test_initial_snapshot() {
        let (dash, _) = dashboard();
        let snap = dash.snapshot();
        assert_eq!(snap.time, 0.0);
        assert_eq!(snap.clock_label, "00:00");
        assert_eq!(snap.sunshine, 0.0);
        assert_eq!(snap.nutrition.energy, 1400.0);
        assert!(snap.food_groups_ranked.is_empty());
        assert_eq!(snap.pulse_series.len(), 1);
        assert_eq!(snap.social_series.len(), 25);
    }

    #[test]
    fn test_seek_recomputes_once() {
        let (mut dash, _) = dashboard();
        dash.seek(12.0);
        assert_eq!(dash.recompute_count(), 2);
        dash.seek(12.0);
        assert_eq!(dash.recompute_count(), 2);
        let snap = dash.snapshot();
        assert_eq!(snap.clock_label, "12:00");
        assert!((snap.sunshine - 100.0).abs() < 1e-9);
        assert_eq!(snap.nutrition.meals.len(), 1);
    }

    #[test]
    fn test_frame_without_play_is_noop() {
        let (mut dash, source) = dashboard();
        source.advance(10_000.0);
        assert!(!dash.frame());
        assert_eq!(dash.current_time(), 0.0);
    }

    #[test]
    fn test_frames_drive_snapshot() {
        let (mut dash, source) = dashboard();
        dash.play();
        source.advance(12_500.0 * 20.0);
        assert!(dash.frame());
        let snap = dash.snapshot();
        assert!((snap.time - 20.0).abs() < 1e-9);
        assert_eq!(snap.nutrition.meals.len(), 3);
        assert_eq!(snap.food_groups_ranked[0].group, FoodGroup::WholeGrains);
        assert_eq!(snap.food_groups_ranked[0].label, "Whole Grains");
        assert!(snap.energy_percent > 0.0 && snap.energy_percent <= 100.0);
    }

    #[test]
    fn test_nutrition_is_throttled() {
        let (mut dash, _) = dashboard();
        // 7:28 rounds to 7:30, so breakfast already shows
        dash.seek(7.0 + 28.0 / 60.0);
        assert_eq!(dash.snapshot().nutrition.meals.len(), 1);
        // 7:27 rounds to 7:25
        dash.seek(7.0 + 27.0 / 60.0);
        assert!(dash.snapshot().nutrition.meals.is_empty());
    }

    #[test]
    fn test_pause_and_reset_refresh() {
        let (mut dash, source) = dashboard();
        dash.play();
        source.advance(12_500.0 * 3.0);
        dash.frame();
        source.advance(12_500.0);
        dash.pause();
        assert!((dash.snapshot().time - 4.0).abs() < 1e-9);
        dash.reset();
        assert_eq!(dash.snapshot().time, 0.0);
        assert_eq!(dash.status(), PlaybackStatus::Stopped);
    }

    #[test]
    fn test_loop_callback_through_dashboard() {
        let (mut dash, source) = dashboard();
        let loops = std::rc::Rc::new(std::cell::Cell::new(0));
        {
            let loops = loops.clone();
            dash.clock_mut().set_on_loop(move || loops.set(loops.get() + 1));
        }
        dash.play();
        source.advance(310_000.0);
        dash.frame();
        assert_eq!(loops.get(), 1);
        assert_eq!(dash.snapshot().time, 0.0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let (mut dash, _) = dashboard();
        dash.seek(13.0);
        let json = serde_json::to_value(dash.snapshot()).unwrap();
        assert_eq!(json["clock_label"], "13:00");
        assert_eq!(json["social_connections"], 18.0);
        assert_eq!(json["nutrition"]["meals"].as_array().unwrap().len(), 2);
        assert_eq!(json["food_groups_ranked"][0]["group"], "whole_grains");
    }
}
