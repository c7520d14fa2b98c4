//! Core domain types for the intake tracking system.
//!
//! This module defines the fundamental types used throughout the system:
//! - User profile attributes and derived daily norms
//! - Daily consumption/expenditure counters
//! - Partial-update patches for the profile store
//! - The progress report produced by the aggregator

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ============================================================================
// Profile Types
// ============================================================================

/// User gender, as consumed by the BMR formula
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Parse a user-supplied gender string.
    ///
    /// Accepts "male"/"female" (any case, surrounding whitespace ignored)
    /// plus the short forms "m"/"f". Anything else is invalid input.
    pub fn parse(input: &str) -> Result<Self> {
        match input.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(Error::invalid_input(format!(
                "gender must be 'male' or 'female', got '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

/// Running totals for the current day.
///
/// Counters only ever increase within a day and are zeroed by the daily
/// reset sweep.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DailyCounters {
    #[serde(default)]
    pub water_logged_ml: f64,
    #[serde(default)]
    pub calories_logged_kcal: f64,
    #[serde(default)]
    pub calories_burned_kcal: f64,
}

/// One stored record per user identifier.
///
/// Profile attributes are optional because records are built up
/// incrementally: a user who logs water before finishing profile setup owns
/// a record holding nothing but counters. `water_norm_ml` and
/// `calories_norm_kcal` are derived values; they are only ever written by a
/// completed profile setup or by the daily reset, never edited directly.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_years: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_norm_ml: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_norm_kcal: Option<f64>,
    #[serde(flatten)]
    pub counters: DailyCounters,
}

impl UserRecord {
    /// Complete profile attributes, if every one of them has been supplied.
    ///
    /// The daily reset needs all of weight, height, age, gender, activity
    /// and city to re-derive norms; records still mid-setup return `None`.
    pub fn complete_profile(&self) -> Option<CompleteProfile<'_>> {
        Some(CompleteProfile {
            weight_kg: self.weight_kg?,
            height_cm: self.height_cm?,
            age_years: self.age_years?,
            gender: self.gender?,
            activity_minutes: self.activity_minutes?,
            city: self.city.as_deref()?,
        })
    }
}

/// Borrowed view of a fully populated profile
#[derive(Clone, Copy, Debug)]
pub struct CompleteProfile<'a> {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub gender: Gender,
    pub activity_minutes: u32,
    pub city: &'a str,
}

/// Partial profile update merged into a record by [`upsert`].
///
/// `None` fields are left untouched in the stored record.
///
/// [`upsert`]: crate::store::ProfileStore::upsert
#[derive(Clone, Debug, Default)]
pub struct ProfilePatch {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age_years: Option<u32>,
    pub gender: Option<Gender>,
    pub activity_minutes: Option<u32>,
    pub city: Option<String>,
    pub water_norm_ml: Option<f64>,
    pub calories_norm_kcal: Option<f64>,
}

impl ProfilePatch {
    /// Merge this patch into a record, overwriting only the supplied fields.
    pub fn apply_to(&self, record: &mut UserRecord) {
        if let Some(v) = self.weight_kg {
            record.weight_kg = Some(v);
        }
        if let Some(v) = self.height_cm {
            record.height_cm = Some(v);
        }
        if let Some(v) = self.age_years {
            record.age_years = Some(v);
        }
        if let Some(v) = self.gender {
            record.gender = Some(v);
        }
        if let Some(v) = self.activity_minutes {
            record.activity_minutes = Some(v);
        }
        if let Some(ref v) = self.city {
            record.city = Some(v.clone());
        }
        if let Some(v) = self.water_norm_ml {
            record.water_norm_ml = Some(v);
        }
        if let Some(v) = self.calories_norm_kcal {
            record.calories_norm_kcal = Some(v);
        }
    }
}

// ============================================================================
// Counter Selection
// ============================================================================

/// The three daily counters a logging event can target
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterKind {
    WaterLoggedMl,
    CaloriesLoggedKcal,
    CaloriesBurnedKcal,
}

impl CounterKind {
    /// Stored field name for this counter
    pub fn field_name(&self) -> &'static str {
        match self {
            CounterKind::WaterLoggedMl => "water_logged_ml",
            CounterKind::CaloriesLoggedKcal => "calories_logged_kcal",
            CounterKind::CaloriesBurnedKcal => "calories_burned_kcal",
        }
    }

    pub fn get(&self, counters: &DailyCounters) -> f64 {
        match self {
            CounterKind::WaterLoggedMl => counters.water_logged_ml,
            CounterKind::CaloriesLoggedKcal => counters.calories_logged_kcal,
            CounterKind::CaloriesBurnedKcal => counters.calories_burned_kcal,
        }
    }

    pub fn get_mut<'a>(&self, counters: &'a mut DailyCounters) -> &'a mut f64 {
        match self {
            CounterKind::WaterLoggedMl => &mut counters.water_logged_ml,
            CounterKind::CaloriesLoggedKcal => &mut counters.calories_logged_kcal,
            CounterKind::CaloriesBurnedKcal => &mut counters.calories_burned_kcal,
        }
    }
}

// ============================================================================
// Workout Cost
// ============================================================================

/// Energy and hydration cost of one logged workout
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorkoutCost {
    pub calories_kcal: f64,
    pub additional_water_ml: f64,
}

// ============================================================================
// Progress Report
// ============================================================================

/// Snapshot combining daily norms and counters into balances.
///
/// `calories_target_kcal` is the effective target: the derived calorie norm
/// raised by whatever was burned in workouts today.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct ProgressReport {
    pub water_drunk_ml: f64,
    pub water_target_ml: f64,
    pub water_balance_ml: f64,
    pub calories_consumed_kcal: f64,
    pub calories_target_kcal: f64,
    pub calories_burned_kcal: f64,
    pub calories_balance_kcal: f64,
}
