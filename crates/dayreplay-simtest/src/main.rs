//! DayReplay Headless Simulation Harness
//!
//! Validates the replay clock and the metric derivations without any
//! display. Runs entirely in-process against a hand-driven clock, then
//! optionally replays the day in real time or dumps a snapshot.
//!
//! Usage:
//!   cargo run -p dayreplay-simtest
//!   cargo run -p dayreplay-simtest -- --verbose
//!   cargo run -p dayreplay-simtest -- --snapshot-at 12.5
//!   cargo run -p dayreplay-simtest -- --replay-secs 10

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use dayreplay_core::frame::{RepaintLoop, DEFAULT_REFRESH_HZ};
use dayreplay_core::prelude::*;
use dayreplay_logic::constants::{bounds, DAY_DURATION_MS};
use dayreplay_logic::food::FoodGroup;
use dayreplay_logic::metrics::{
    air_quality, hour_of_day, mood, pulse, social_connections, sunshine, SOCIAL_WINDOWS,
};
use dayreplay_logic::nutrition::{energy_expended, nutrition};
use dayreplay_logic::profile::{validate_profile, DayProfile, ProfileError};
use dayreplay_logic::timeline::Timeline;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

// ── Day profile (same JSON as the built-in default) ─────────────────────
const PROFILE_JSON: &str = include_str!("../../../data/day_profile.json");

const TOLERANCE: f64 = 1e-9;

#[derive(Debug, Parser)]
#[command(
    name = "dayreplay-simtest",
    about = "Headless validation and replay of the simulated day"
)]
struct Cli {
    /// Print every check, not only failures
    #[arg(short, long)]
    verbose: bool,

    /// Print check results as JSON
    #[arg(long)]
    json: bool,

    /// Load a day profile from this JSON file instead of the built-in one
    #[arg(long, value_name = "PATH")]
    profile: Option<PathBuf>,

    /// Seed for the randomized sweeps
    #[arg(long, default_value_t = 2050)]
    seed: u64,

    /// Replay the day in real time for this many seconds after validating
    #[arg(long, value_name = "SECS")]
    replay_secs: Option<f64>,

    /// Print the dashboard snapshot at this virtual hour as JSON
    #[arg(long, value_name = "HOURS")]
    snapshot_at: Option<f64>,
}

#[derive(Debug, Error)]
enum HarnessError {
    #[error("failed to read profile {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("profile JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("profile has {} validation error(s): {}", .0.len(), join_errors(.0))]
    Invalid(Vec<ProfileError>),
}

fn join_errors(errors: &[ProfileError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn check(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,dayreplay_core=info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    if !cli.json {
        println!("=== DayReplay Simulation Harness ===\n");
    }

    let mut results = Vec::new();

    // 1. Profile data
    let profile = match load_profile(cli.profile.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            log::error!("{}", e);
            results.push(TestResult::check("profile_load", false, e.to_string()));
            finish(&results, cli.verbose, cli.json);
            std::process::exit(1);
        }
    };
    results.extend(validate_profile_data(&profile, cli.profile.is_none()));

    // 2. Timeline conversions
    results.extend(validate_timeline(cli.seed));

    // 3. Metric bounds sweep
    results.extend(validate_metric_bounds(cli.seed));

    // 4. Social bracket coverage
    results.extend(validate_social_coverage());

    // 5. Nutrition scenarios
    results.extend(validate_nutrition(&profile));

    // 6. Replay clock state machine
    results.extend(validate_replay_clock(cli.seed));

    // 7. Dashboard memoization
    results.extend(validate_dashboard(&profile));

    let failed = finish(&results, cli.verbose, cli.json);

    if let Some(hours) = cli.snapshot_at {
        print_snapshot(&profile, hours);
    }
    if let Some(secs) = cli.replay_secs {
        replay_realtime(profile, secs);
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

/// Print the summary and return the number of failed checks.
fn finish(results: &[TestResult], verbose: bool, json: bool) -> usize {
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    if json {
        match serde_json::to_string_pretty(results) {
            Ok(out) => println!("{}", out),
            Err(e) => log::error!("failed to encode results: {}", e),
        }
        return failed;
    }

    println!();
    for r in results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }
    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed,
        results.len(),
        failed
    );
    failed
}

fn load_profile(path: Option<&Path>) -> Result<DayProfile, HarnessError> {
    let profile: DayProfile = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_str(&text)?
        }
        None => serde_json::from_str(PROFILE_JSON)?,
    };

    let errors = validate_profile(&profile);
    if !errors.is_empty() {
        return Err(HarnessError::Invalid(errors));
    }
    log::info!(
        "loaded day profile: {} meals, {:.0} kcal total",
        profile.meals.len(),
        profile.total_meal_energy()
    );
    Ok(profile)
}

// ── 1. Profile ──────────────────────────────────────────────────────────

fn validate_profile_data(profile: &DayProfile, builtin: bool) -> Vec<TestResult> {
    log::info!("--- Day Profile ---");
    let mut results = Vec::new();

    results.push(TestResult::check(
        "profile_has_meals",
        !profile.meals.is_empty(),
        format!("{} meals loaded", profile.meals.len()),
    ));

    let chronological = profile.meals.windows(2).all(|w| w[0].time <= w[1].time);
    results.push(TestResult::check(
        "profile_meals_chronological",
        chronological,
        "meals sorted by time",
    ));

    let sums: Vec<String> = profile
        .meals
        .iter()
        .map(|m| format!("{}={:.1}", m.label, m.food_groups.total()))
        .collect();
    results.push(TestResult::check(
        "profile_food_groups_sum_100",
        profile
            .meals
            .iter()
            .all(|m| (m.food_groups.total() - 100.0).abs() <= 0.5),
        sums.join(", "),
    ));

    if builtin {
        let default = DayProfile::default();
        results.push(TestResult::check(
            "profile_json_matches_builtin",
            default.meals == profile.meals
                && default.starting_energy == profile.starting_energy
                && (default.integration_step_hours - profile.integration_step_hours).abs()
                    < TOLERANCE,
            "data/day_profile.json agrees with DayProfile::default()",
        ));
    }

    results
}

// ── 2. Timeline ─────────────────────────────────────────────────────────

fn validate_timeline(seed: u64) -> Vec<TestResult> {
    log::info!("--- Timeline ---");
    let mut results = Vec::new();
    let tl = Timeline::default();

    let ratio = tl.compression_ratio();
    results.push(TestResult::check(
        "timeline_compression_288",
        (ratio - 288.0).abs() < TOLERANCE,
        format!("compression ratio {:.3}", ratio),
    ));

    let mut rng = StdRng::seed_from_u64(seed);
    let mut worst: f64 = 0.0;
    for _ in 0..10_000 {
        let ms: f64 = rng.gen_range(0.0..=DAY_DURATION_MS);
        worst = worst.max((tl.hours_to_ms(tl.ms_to_hours(ms)) - ms).abs());
        let hours = tl.ms_to_hours(ms);
        worst = worst.max((tl.ms_to_hours(tl.hours_to_ms(hours)) - hours).abs());
    }
    results.push(TestResult::check(
        "timeline_roundtrip",
        worst < 1e-6,
        format!("worst round-trip error {:.2e}", worst),
    ));

    results
}

// ── 3. Metric bounds ────────────────────────────────────────────────────

fn validate_metric_bounds(seed: u64) -> Vec<TestResult> {
    log::info!("--- Metric Bounds ---");
    let mut results = Vec::new();

    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let mut times: Vec<f64> = (0..=24 * 60).map(|m| m as f64 / 60.0).collect();
    times.extend((0..10_000).map(|_| rng.gen_range(0.0..=24.0)));
    // Arbitrary reals reduce to hour of day
    times.extend((0..1_000).map(|_| rng.gen_range(-500.0..500.0)));

    let sun_bad = times
        .iter()
        .filter(|&&t| {
            let s = sunshine(t);
            let h = hour_of_day(t);
            !(0.0..=100.0).contains(&s) || (!(6.0..=18.0).contains(&h) && s != 0.0)
        })
        .count();
    results.push(TestResult::check(
        "sunshine_bounds",
        sun_bad == 0,
        format!("{} samples, {} out of range", times.len(), sun_bad),
    ));

    let (p_min, p_max) = min_max(times.iter().map(|&t| pulse(t)));
    results.push(TestResult::check(
        "pulse_bounds",
        p_min >= bounds::PULSE_MIN && p_max <= bounds::PULSE_MAX,
        format!("pulse {:.0}..{:.0} BPM", p_min, p_max),
    ));

    let (m_min, m_max) = min_max(times.iter().map(|&t| mood(t)));
    results.push(TestResult::check(
        "mood_bounds",
        m_min >= bounds::MOOD_MIN && m_max <= bounds::MOOD_MAX,
        format!("mood {:.1}..{:.1}", m_min, m_max),
    ));

    let (a_min, a_max) = min_max(times.iter().map(|&t| air_quality(t)));
    results.push(TestResult::check(
        "air_quality_bounds",
        a_min >= bounds::AIR_PPM_MIN && a_max <= bounds::AIR_PPM_MAX,
        format!("air {:.0}..{:.0} PPM", a_min, a_max),
    ));

    results
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

// ── 4. Social coverage ──────────────────────────────────────────────────

fn validate_social_coverage() -> Vec<TestResult> {
    log::info!("--- Social Coverage ---");
    let mut results = Vec::new();

    let total: f64 = SOCIAL_WINDOWS.iter().map(|(w, _)| w.duration()).sum();
    results.push(TestResult::check(
        "social_windows_total_24h",
        (total - 24.0).abs() < TOLERANCE,
        format!("{} windows covering {:.1}h", SOCIAL_WINDOWS.len(), total),
    ));

    // Every second of the day must hit exactly one window
    let mut gaps = 0;
    let mut overlaps = 0;
    for s in 0..(24 * 3600) {
        let hour = s as f64 / 3600.0;
        match SOCIAL_WINDOWS.iter().filter(|(w, _)| w.contains(hour)).count() {
            0 => gaps += 1,
            1 => {}
            _ => overlaps += 1,
        }
    }
    results.push(TestResult::check(
        "social_partition",
        gaps == 0 && overlaps == 0,
        format!("{} gaps, {} overlaps", gaps, overlaps),
    ));

    let lunch = social_connections(13.0);
    results.push(TestResult::check(
        "social_lunch_peak",
        lunch == 18.0,
        format!("{} connections at 13:00", lunch),
    ));

    results
}

// ── 5. Nutrition ────────────────────────────────────────────────────────

fn validate_nutrition(profile: &DayProfile) -> Vec<TestResult> {
    log::info!("--- Nutrition ---");
    let mut results = Vec::new();

    let start = nutrition(profile, 0.0);
    results.push(TestResult::check(
        "nutrition_midnight",
        start.energy == profile.starting_energy
            && start.food_groups.is_empty()
            && start.meals.is_empty(),
        format!("energy {:.0} kcal, {} meals", start.energy, start.meals.len()),
    ));

    if let Some(first) = profile.meals.first() {
        let n = nutrition(profile, first.time);
        let expected =
            profile.starting_energy + first.energy - energy_expended(profile, first.time);
        let own_table = FoodGroup::ALL
            .iter()
            .all(|&g| (n.food_groups.get(g) - first.food_groups.get(g)).abs() < TOLERANCE);
        results.push(TestResult::check(
            "nutrition_first_meal",
            n.meals.len() == 1 && (n.energy - expected.max(0.0)).abs() < TOLERANCE && own_table,
            format!(
                "{} at {:.2}h: {:.1} kcal, blend equals its own table: {}",
                first.label, first.time, n.energy, own_table
            ),
        ));
    }

    if let Some(last) = profile.meals.last() {
        let t = (last.time + 1.0).min(24.0);
        let n = nutrition(profile, t);
        let total: f64 = profile.meals.iter().map(|m| m.energy).sum();
        let weighted = FoodGroup::ALL.iter().all(|&g| {
            let expected: f64 = profile
                .meals
                .iter()
                .map(|m| m.food_groups.get(g) * m.energy / total)
                .sum();
            (n.food_groups.get(g) - expected).abs() < TOLERANCE
        });
        results.push(TestResult::check(
            "nutrition_full_day_blend",
            n.meals.len() == profile.meals.len() && weighted,
            format!("{} meals blended at {:.1}h", n.meals.len(), t),
        ));
    }

    let burned = energy_expended(profile, 24.0);
    results.push(TestResult::check(
        "nutrition_daily_burn",
        burned > 0.0,
        format!("{:.0} kcal burned over 24h", burned),
    ));

    results
}

// ── 6. Replay clock ─────────────────────────────────────────────────────

fn validate_replay_clock(seed: u64) -> Vec<TestResult> {
    log::info!("--- Replay Clock ---");
    let mut results = Vec::new();
    let ms_per_hour = DAY_DURATION_MS / 24.0;

    // Seek idempotence
    {
        let mut clock = ReplayClock::new(ManualTimeSource::new());
        clock.seek(5.0);
        let first = (clock.current_time(), clock.is_playing());
        clock.seek(5.0);
        let second = (clock.current_time(), clock.is_playing());
        results.push(TestResult::check(
            "clock_seek_idempotent",
            first == second && first.0 == 5.0,
            format!("seek(5) twice → {:?}", second),
        ));
    }

    // Pause / resume continuity
    {
        let source = ManualTimeSource::new();
        let mut clock = ReplayClock::new(source.clone());
        clock.play();
        source.advance(3.0 * ms_per_hour);
        clock.on_frame();
        clock.pause();
        source.advance(60_000.0);
        clock.play();
        source.advance(ms_per_hour);
        let resumed = clock.on_frame().unwrap_or(f64::NAN);
        results.push(TestResult::check(
            "clock_pause_resume",
            (resumed - 4.0).abs() < TOLERANCE,
            format!("resumed at 3h, one hour later reads {:.6}h", resumed),
        ));
    }

    // Seek clamping
    {
        let mut clock = ReplayClock::new(ManualTimeSource::new());
        clock.seek(-2.0);
        let low = clock.current_time();
        clock.seek(99.0);
        let high = clock.current_time();
        results.push(TestResult::check(
            "clock_seek_clamps",
            low == 0.0 && high == 24.0,
            format!("seek(-2) → {}, seek(99) → {}", low, high),
        ));
    }

    // Loop invariant under irregular frame timing
    {
        let source = ManualTimeSource::new();
        let mut clock = ReplayClock::new(source.clone());
        let callbacks = Rc::new(Cell::new(0u64));
        let max_seen = Rc::new(Cell::new(0.0f64));
        {
            let callbacks = callbacks.clone();
            clock.set_on_loop(move || callbacks.set(callbacks.get() + 1));
            let max_seen = max_seen.clone();
            clock.subscribe(move |t| max_seen.set(max_seen.get().max(t)));
        }

        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(2));
        let max_step = 40.0;
        // Each wrap discards less than one frame of overshoot
        let total = 3.0 * DAY_DURATION_MS + 3.0 * max_step;
        let mut elapsed = 0.0;
        clock.play();
        while elapsed < total {
            let step = rng.gen_range(1.0..max_step);
            source.advance(step);
            elapsed += step;
            clock.on_frame();
        }
        results.push(TestResult::check(
            "clock_one_wrap_per_day",
            clock.loops_completed() == 3 && callbacks.get() == 3,
            format!(
                "{} wraps, {} loop callbacks over 3 days",
                clock.loops_completed(),
                callbacks.get()
            ),
        ));
        results.push(TestResult::check(
            "clock_never_exceeds_day",
            max_seen.get() <= 24.0,
            format!("max observed {:.4}h", max_seen.get()),
        ));
    }

    // Reset cancels the pending frame
    {
        let source = ManualTimeSource::new();
        let mut clock = ReplayClock::new(source.clone());
        clock.play();
        source.advance(10_000.0);
        clock.reset();
        source.advance(10_000.0);
        let ran = clock.on_frame().is_some();
        results.push(TestResult::check(
            "clock_reset_cancels_frame",
            !ran && clock.status() == PlaybackStatus::Stopped && clock.current_time() == 0.0,
            format!("status {:?}, frame ran: {}", clock.status(), ran),
        ));
    }

    results
}

// ── 7. Dashboard ────────────────────────────────────────────────────────

fn validate_dashboard(profile: &DayProfile) -> Vec<TestResult> {
    log::info!("--- Dashboard ---");
    let mut results = Vec::new();

    let mut dashboard = Dashboard::new(ManualTimeSource::new(), profile.clone());
    dashboard.seek(12.0);
    let after_first = dashboard.recompute_count();
    dashboard.seek(12.0);
    results.push(TestResult::check(
        "dashboard_memoized",
        dashboard.recompute_count() == after_first,
        format!("{} recomputes after seeking 12:00 twice", after_first),
    ));

    let snap = dashboard.snapshot();
    results.push(TestResult::check(
        "dashboard_noon_snapshot",
        snap.clock_label == "12:00" && (snap.sunshine - 100.0).abs() < TOLERANCE,
        format!(
            "{} sun {:.0}% air {:.0} PPM pulse {:.0} mood {:.0}",
            snap.clock_label, snap.sunshine, snap.air_quality, snap.pulse, snap.mood
        ),
    ));

    let clock = dashboard.clock();
    results.push(TestResult::check(
        "dashboard_owns_profile_and_clock",
        dashboard.profile() == profile
            && clock.status() == PlaybackStatus::Paused
            && *clock.timeline() == Timeline::default(),
        format!(
            "{} meals, clock {:?} at {}",
            dashboard.profile().meals.len(),
            clock.status(),
            clock.current_time()
        ),
    ));

    results
}

// ── Snapshot / replay ───────────────────────────────────────────────────

fn print_snapshot(profile: &DayProfile, hours: f64) {
    let mut dashboard = Dashboard::new(ManualTimeSource::new(), profile.clone());
    dashboard.seek(hours);
    match serde_json::to_string_pretty(dashboard.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("failed to encode snapshot: {}", e),
    }
}

/// Real-time replay length, or `None` unless `secs` is finite and positive.
fn replay_duration(secs: f64) -> Option<Duration> {
    if !(secs.is_finite() && secs > 0.0) {
        return None;
    }
    Duration::try_from_secs_f64(secs).ok()
}

fn replay_realtime(profile: DayProfile, secs: f64) {
    let Some(duration) = replay_duration(secs) else {
        log::warn!("ignoring replay duration {}: must be finite and positive", secs);
        return;
    };
    let mut dashboard = Dashboard::new(MonotonicTimeSource::new(), profile);
    dashboard
        .clock_mut()
        .set_on_loop(|| log::info!("day complete, starting over"));
    dashboard.play();

    log::info!(
        "replaying {} meals for {:.1}s at {} Hz ({:.0}x compression)",
        dashboard.profile().meals.len(),
        secs,
        DEFAULT_REFRESH_HZ,
        dashboard.clock().timeline().compression_ratio()
    );
    let frames = RepaintLoop::default().run_for(duration, |frame| {
        dashboard.frame();
        if frame % u64::from(DEFAULT_REFRESH_HZ) == 0 {
            let snap = dashboard.snapshot();
            log::info!(
                "{} sun {:>3.0}% air {:.0} PPM pulse {:>3.0} mood {:>3.0} social {:>2.0} energy {:>5.1}% meals {}",
                snap.clock_label,
                snap.sunshine,
                snap.air_quality,
                snap.pulse,
                snap.mood,
                snap.social_connections,
                snap.energy_percent,
                snap.nutrition.meals.len()
            );
        }
        true
    });
    dashboard.pause();
    log::info!(
        "replay stopped at {} after {} frames, {} loops ({} recomputes)",
        dashboard.snapshot().clock_label,
        frames,
        dashboard.clock().loops_completed(),
        dashboard.recompute_count()
    );
}
