//! Nutrition over the day: meals eaten so far, remaining energy and the
//! energy-weighted food-group blend.
//!
//! Energy burn is the integral of a pulse-driven calorie rate from
//! midnight to the requested time, computed with the trapezoidal rule at
//! a fixed step. The final step is clipped so the integral ends exactly
//! at the requested time.

use serde::Serialize;

use crate::constants::{HOURS_IN_DAY, MINUTES_PER_HOUR};
use crate::food::{FoodGroup, FoodGroupMix};
use crate::metrics::pulse;
use crate::profile::{DayProfile, Meal};

/// Derived nutrition state at one virtual time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionSnapshot {
    /// Remaining energy in kcal, never negative.
    pub energy: f64,
    /// Energy-weighted blend of the visible meals' food groups.
    pub food_groups: FoodGroupMix,
    /// Meals eaten so far, in chronological order.
    pub meals: Vec<Meal>,
}

/// Meals with `meal.time <= time`, in profile order.
pub fn visible_meals(profile: &DayProfile, time: f64) -> Vec<&Meal> {
    profile.meals.iter().filter(|m| m.time <= time).collect()
}

/// Calories burned from 00:00 up to `time` (trapezoidal rule).
///
/// The burn covers a single day: any later time, `+inf` included, yields
/// the full-day total.
pub fn energy_expended(profile: &DayProfile, time: f64) -> f64 {
    let step = profile.integration_step_hours;
    if !(time > 0.0) || !(step > 0.0) {
        return 0.0;
    }
    let time = time.min(HOURS_IN_DAY);

    let steps = (time / step).ceil() as u64;
    let rate = |t: f64| profile.burn.kcal_per_minute(pulse(t));

    let mut total = 0.0;
    for i in 0..steps {
        let t1 = i as f64 * step;
        let t2 = ((i + 1) as f64 * step).min(time);
        let avg_per_minute = (rate(t1) + rate(t2)) / 2.0;
        total += avg_per_minute * (t2 - t1) * MINUTES_PER_HOUR;
    }
    total
}

/// Energy-weighted average of the meals' food-group tables.
///
/// Weights are each meal's share of the combined meal energy. No meals, or
/// meals with zero combined energy, give an all-zero blend.
pub fn blend_food_groups(meals: &[&Meal]) -> FoodGroupMix {
    let total_energy: f64 = meals.iter().map(|m| m.energy).sum();
    let mut blend = FoodGroupMix::zero();
    if meals.is_empty() || total_energy <= 0.0 {
        return blend;
    }

    for meal in meals {
        let weight = meal.energy / total_energy;
        for group in FoodGroup::ALL {
            *blend.get_mut(group) += meal.food_groups.get(group) * weight;
        }
    }
    blend
}

/// Full nutrition state at `time`.
pub fn nutrition(profile: &DayProfile, time: f64) -> NutritionSnapshot {
    let meals = visible_meals(profile, time);
    let eaten: f64 = meals.iter().map(|m| m.energy).sum();
    let burned = energy_expended(profile, time);
    let energy = (profile.starting_energy + eaten - burned).max(0.0);

    NutritionSnapshot {
        energy,
        food_groups: blend_food_groups(&meals),
        meals: meals.into_iter().cloned().collect(),
    }
}

/// Energy as a percentage of the daily goal, capped at 100.
pub fn energy_percentage(energy: f64, daily_goal: f64) -> f64 {
    if daily_goal <= 0.0 {
        return 0.0;
    }
    (energy / daily_goal * 100.0).min(100.0)
}
