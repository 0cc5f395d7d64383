//! Injected day configuration: the meals and the energy model.
//!
//! The nutrition derivation never reads a global meal table. It takes a
//! [`DayProfile`], which defaults to the compiled-in day (breakfast,
//! lunch, dinner) and can also be loaded from JSON and validated.
//!
//! ```
//! use dayreplay_logic::profile::{validate_profile, DayProfile};
//!
//! let profile = DayProfile::default();
//! assert_eq!(profile.meals.len(), 3);
//! assert!(validate_profile(&profile).is_empty());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{HOURS_IN_DAY, ONE_MINUTE_HOURS};
use crate::food::FoodGroupMix;

/// Tolerance when checking that a meal's food-group table sums to 100.
const MIX_SUM_TOLERANCE: f64 = 0.5;

/// A meal eaten at a fixed hour of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    /// Hour of day the meal appears (e.g. 7.5 = 07:30).
    pub time: f64,
    pub label: String,
    /// Energy in kcal.
    pub energy: f64,
    /// Percentage contribution of each food group.
    pub food_groups: FoodGroupMix,
}

/// Pulse-driven calorie burn: `(pulse - resting_pulse) * kcal_per_beat + base_kcal_per_minute`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurnModel {
    pub resting_pulse: f64,
    pub kcal_per_beat: f64,
    pub base_kcal_per_minute: f64,
}

impl BurnModel {
    /// Calories burned per minute at the given pulse.
    pub fn kcal_per_minute(&self, pulse: f64) -> f64 {
        (pulse - self.resting_pulse) * self.kcal_per_beat + self.base_kcal_per_minute
    }
}

impl Default for BurnModel {
    fn default() -> Self {
        Self {
            resting_pulse: 60.0,
            kcal_per_beat: 0.1,
            base_kcal_per_minute: 1.0,
        }
    }
}

/// Everything the nutrition derivation needs besides the time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayProfile {
    /// Energy reserve at 00:00 in kcal (two thirds of the daily goal).
    pub starting_energy: f64,
    /// Daily energy goal in kcal, used for the energy bar.
    pub daily_energy_goal: f64,
    pub burn: BurnModel,
    /// Integration step for energy burn, in hours.
    pub integration_step_hours: f64,
    /// Meals in chronological order.
    pub meals: Vec<Meal>,
}

impl Default for DayProfile {
    fn default() -> Self {
        Self {
            starting_energy: 1400.0,
            daily_energy_goal: 2100.0,
            burn: BurnModel::default(),
            integration_step_hours: ONE_MINUTE_HOURS,
            meals: default_meals(),
        }
    }
}

impl DayProfile {
    /// Sum of all meal energy over the whole day.
    pub fn total_meal_energy(&self) -> f64 {
        self.meals.iter().map(|m| m.energy).sum()
    }
}

/// The compiled-in meals of the simulated day.
pub fn default_meals() -> Vec<Meal> {
    vec![
        Meal {
            time: 7.5,
            label: "Breakfast".to_string(),
            energy: 450.0,
            food_groups: FoodGroupMix {
                whole_grains: 40.0,
                vegetables: 10.0,
                fruits: 20.0,
                legumes: 5.0,
                nuts: 10.0,
                dairy: 10.0,
                fish: 0.0,
                poultry: 0.0,
                red_meat: 0.0,
                added_fats: 5.0,
            },
        },
        Meal {
            time: 12.5,
            label: "Lunch".to_string(),
            energy: 600.0,
            food_groups: FoodGroupMix {
                whole_grains: 30.0,
                vegetables: 25.0,
                fruits: 10.0,
                legumes: 15.0,
                nuts: 5.0,
                dairy: 0.0,
                fish: 10.0,
                poultry: 0.0,
                red_meat: 0.0,
                added_fats: 5.0,
            },
        },
        Meal {
            time: 19.0,
            label: "Dinner".to_string(),
            energy: 700.0,
            food_groups: FoodGroupMix {
                whole_grains: 25.0,
                vegetables: 30.0,
                fruits: 5.0,
                legumes: 10.0,
                nuts: 5.0,
                dairy: 5.0,
                fish: 0.0,
                poultry: 15.0,
                red_meat: 0.0,
                added_fats: 5.0,
            },
        },
    ]
}

/// Profile validation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("starting energy must not be negative (got {0})")]
    NegativeStartingEnergy(f64),
    #[error("daily energy goal must be positive (got {0})")]
    NonPositiveGoal(f64),
    #[error("integration step must be positive (got {0})")]
    NonPositiveStep(f64),
    #[error("meal #{index} has an empty label")]
    EmptyMealLabel { index: usize },
    #[error("meal '{label}' at {time}h is outside the day")]
    MealOutsideDay { label: String, time: f64 },
    #[error("meal '{label}' has negative energy {energy}")]
    NegativeMealEnergy { label: String, energy: f64 },
    #[error("meal '{label}' food groups sum to {sum}, expected 100")]
    FoodGroupSum { label: String, sum: f64 },
    #[error("meal '{label}' at {time}h comes before the previous meal")]
    MealsOutOfOrder { label: String, time: f64 },
}

/// Validate a day profile, returning all errors found.
pub fn validate_profile(profile: &DayProfile) -> Vec<ProfileError> {
    let mut errors = Vec::new();

    if !(profile.starting_energy >= 0.0) {
        errors.push(ProfileError::NegativeStartingEnergy(profile.starting_energy));
    }
    if !(profile.daily_energy_goal > 0.0) {
        errors.push(ProfileError::NonPositiveGoal(profile.daily_energy_goal));
    }
    if !(profile.integration_step_hours > 0.0) {
        errors.push(ProfileError::NonPositiveStep(profile.integration_step_hours));
    }

    let mut previous_time = f64::NEG_INFINITY;
    for (index, meal) in profile.meals.iter().enumerate() {
        if meal.label.trim().is_empty() {
            errors.push(ProfileError::EmptyMealLabel { index });
        }
        if !(0.0..=HOURS_IN_DAY).contains(&meal.time) {
            errors.push(ProfileError::MealOutsideDay {
                label: meal.label.clone(),
                time: meal.time,
            });
        }
        if !(meal.energy >= 0.0) {
            errors.push(ProfileError::NegativeMealEnergy {
                label: meal.label.clone(),
                energy: meal.energy,
            });
        }
        let sum = meal.food_groups.total();
        if (sum - 100.0).abs() > MIX_SUM_TOLERANCE {
            errors.push(ProfileError::FoodGroupSum {
                label: meal.label.clone(),
                sum,
            });
        }
        if meal.time < previous_time {
            errors.push(ProfileError::MealsOutOfOrder {
                label: meal.label.clone(),
                time: meal.time,
            });
        }
        previous_time = meal.time;
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_valid() {
        assert!(validate_profile(&DayProfile::default()).is_empty());
    }

    #[test]
    fn test_default_meals_chronological() {
        let meals = default_meals();
        let times: Vec<f64> = meals.iter().map(|m| m.time).collect();
        assert_eq!(times, vec![7.5, 12.5, 19.0]);
        let labels: Vec<&str> = meals.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["Breakfast", "Lunch", "Dinner"]);
    }

    #[test]
    fn test_total_meal_energy() {
        assert_eq!(DayProfile::default().total_meal_energy(), 1750.0);
    }

    #[test]
    fn test_burn_model() {
        let burn = BurnModel::default();
        assert!((burn.kcal_per_minute(60.0) - 1.0).abs() < 1e-12);
        assert!((burn.kcal_per_minute(120.0) - 7.0).abs() < 1e-12);
        assert!((burn.kcal_per_minute(50.0) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_reports_all_errors() {
        let mut profile = DayProfile::default();
        profile.starting_energy = -1.0;
        profile.daily_energy_goal = 0.0;
        profile.integration_step_hours = 0.0;
        profile.meals[1].time = 5.0; // before breakfast
        profile.meals[2].label = " ".to_string();
        profile.meals[2].energy = -10.0;
        profile.meals[0].food_groups.fish = 50.0;

        let errors = validate_profile(&profile);
        assert!(errors.contains(&ProfileError::NegativeStartingEnergy(-1.0)));
        assert!(errors.contains(&ProfileError::NonPositiveGoal(0.0)));
        assert!(errors.contains(&ProfileError::NonPositiveStep(0.0)));
        assert!(errors.contains(&ProfileError::MealsOutOfOrder {
            label: "Lunch".to_string(),
            time: 5.0,
        }));
        assert!(errors.contains(&ProfileError::EmptyMealLabel { index: 2 }));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ProfileError::NegativeMealEnergy { .. })));
        assert!(errors.iter().any(
            |e| matches!(e, ProfileError::FoodGroupSum { label, .. } if label == "Breakfast")
        ));
    }

    #[test]
    fn test_meal_outside_day() {
        let mut profile = DayProfile::default();
        profile.meals[2].time = 25.0;
        let errors = validate_profile(&profile);
        assert_eq!(
            errors,
            vec![ProfileError::MealOutsideDay {
                label: "Dinner".to_string(),
                time: 25.0,
            }]
        );
    }

    #[test]
    fn test_nan_values_rejected() {
        let mut profile = DayProfile::default();
        profile.integration_step_hours = f64::NAN;
        let errors = validate_profile(&profile);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ProfileError::NonPositiveStep(_)));
    }

    #[test]
    fn test_error_display() {
        let err = ProfileError::FoodGroupSum {
            label: "Lunch".to_string(),
            sum: 90.0,
        };
        assert_eq!(
            err.to_string(),
            "meal 'Lunch' food groups sum to 90, expected 100"
        );
    }

    #[test]
    fn test_json_roundtrip_keeps_meals() {
        let profile = DayProfile::default();
        let json = serde_json::to_string(&profile).unwrap();
        let parsed: DayProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, profile);
    }
}
