//! Daily norm calculations.
//!
//! Pure functions turning profile attributes and the ambient temperature
//! into daily water and calorie targets, plus the energy/hydration cost of
//! a logged workout. No I/O and no stored state.

use crate::catalog::WorkoutCatalog;
use crate::types::{Gender, WorkoutCost};
use crate::{Error, Result};

/// Upper end of the supported daily activity range, in minutes
pub const MAX_ACTIVITY_MINUTES: u32 = 480;

/// Activity factor at zero daily activity (sedentary)
const MIN_ACTIVITY_FACTOR: f64 = 1.2;
/// Activity factor at [`MAX_ACTIVITY_MINUTES`] of daily activity
const MAX_ACTIVITY_FACTOR: f64 = 1.9;

/// Daily water norm in ml.
///
/// base 30 ml per kg, plus 250 ml per started-and-finished 15-minute block
/// of daily activity, plus a heat bonus: 500 ml above 25 °C and another
/// 500 ml above 30 °C. The activity bonus steps every 15 minutes (the
/// upstream description said "per 30 minutes" but the shipped behavior is
/// per 15, and that is the contract). No upper bound.
pub fn water_norm(weight_kg: f64, activity_minutes: u32, temperature_c: f64) -> Result<f64> {
    validate_weight(weight_kg)?;
    validate_activity(activity_minutes)?;

    let mut norm = weight_kg * 30.0;
    norm += f64::from(activity_minutes / 15) * 250.0;

    if temperature_c > 25.0 {
        norm += 500.0;
        if temperature_c > 30.0 {
            norm += 500.0;
        }
    }

    Ok(norm)
}

/// Daily calorie norm in kcal, rounded to two decimals.
///
/// Mifflin-St Jeor BMR scaled by an activity factor interpolated linearly
/// from 1.2 at zero minutes to 1.9 at 480 minutes.
pub fn calorie_norm(
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    gender: Gender,
    activity_minutes: u32,
) -> Result<f64> {
    validate_weight(weight_kg)?;
    if height_cm <= 0.0 || !height_cm.is_finite() {
        return Err(Error::invalid_input(format!(
            "height must be a positive number of cm, got {height_cm}"
        )));
    }
    if age_years == 0 {
        return Err(Error::invalid_input("age must be greater than 0"));
    }
    validate_activity(activity_minutes)?;

    let factor = activity_factor(activity_minutes);

    let bmr = match gender {
        Gender::Male => 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years) + 5.0,
        Gender::Female => {
            10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years) - 161.0
        }
    };

    Ok(round2(bmr * factor))
}

/// Continuous activity factor over the declared [0, 480] minute range
pub fn activity_factor(activity_minutes: u32) -> f64 {
    MIN_ACTIVITY_FACTOR
        + (f64::from(activity_minutes) / f64::from(MAX_ACTIVITY_MINUTES))
            * (MAX_ACTIVITY_FACTOR - MIN_ACTIVITY_FACTOR)
}

/// Calories burned and extra water needed for one workout.
///
/// The workout type is looked up case-insensitively; an unknown type
/// returns `Ok(None)` and the caller decides how to surface it. A zero
/// duration is rejected before the lookup happens.
pub fn workout_energy(
    catalog: &WorkoutCatalog,
    workout_type: &str,
    duration_minutes: u32,
) -> Result<Option<WorkoutCost>> {
    if duration_minutes == 0 {
        return Err(Error::invalid_input(
            "workout duration must be greater than 0 minutes",
        ));
    }

    let Some(entry) = catalog.lookup(workout_type) else {
        return Ok(None);
    };

    let duration = f64::from(duration_minutes);
    Ok(Some(WorkoutCost {
        calories_kcal: entry.kcal_per_minute * duration,
        additional_water_ml: (duration / 30.0) * entry.water_ml_per_30_min,
    }))
}

fn validate_weight(weight_kg: f64) -> Result<()> {
    if weight_kg <= 0.0 || !weight_kg.is_finite() {
        return Err(Error::invalid_input(format!(
            "weight must be a positive number of kg, got {weight_kg}"
        )));
    }
    Ok(())
}

fn validate_activity(activity_minutes: u32) -> Result<()> {
    if activity_minutes > MAX_ACTIVITY_MINUTES {
        return Err(Error::invalid_input(format!(
            "activity must be between 0 and {MAX_ACTIVITY_MINUTES} minutes, got {activity_minutes}"
        )));
    }
    Ok(())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
