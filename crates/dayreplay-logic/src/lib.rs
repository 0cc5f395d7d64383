//! Pure metric derivation logic for DayReplay.
//!
//! This crate contains every time-driven computation of the simulated day
//! that is independent of any clock, scheduler, or display surface.
//! Functions take a virtual time (hours) plus plain data and return
//! results, which keeps them unit-testable and portable across the replay
//! engine, the headless harness, and any future front end.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`constants`] | Day length, compression, sampling intervals |
//! | [`food`] | The ten food groups and per-group percentage mixes |
//! | [`metrics`] | Sunshine, pulse, social connections, mood, air quality |
//! | [`nutrition`] | Meal visibility, pulse-driven energy burn, food-group blend |
//! | [`profile`] | Injected day configuration (meals, energy reserve, burn model) |
//! | [`series`] | Chart sample series for pulse and social connections |
//! | [`timeline`] | Real ↔ virtual time conversion and clock formatting |

pub mod constants;
pub mod food;
pub mod metrics;
pub mod nutrition;
pub mod profile;
pub mod series;
pub mod timeline;
