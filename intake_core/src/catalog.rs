//! Built-in workout catalog.
//!
//! Read-only reference data mapping a workout type to its energy burn rate
//! and the extra water it costs. Keys are stored lowercase; lookup is
//! case-insensitive.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<WorkoutCatalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static WorkoutCatalog {
    &DEFAULT_CATALOG
}

/// Burn rate and hydration cost for one workout type
#[derive(Clone, Debug, PartialEq)]
pub struct WorkoutEntry {
    /// Display name, e.g. "Running"
    pub name: String,
    pub kcal_per_minute: f64,
    pub water_ml_per_30_min: f64,
}

/// The complete catalog of known workout types
#[derive(Clone, Debug, Default)]
pub struct WorkoutCatalog {
    entries: HashMap<String, WorkoutEntry>,
}

impl WorkoutCatalog {
    /// Look up a workout type, ignoring case and surrounding whitespace
    pub fn lookup(&self, workout_type: &str) -> Option<&WorkoutEntry> {
        self.entries.get(workout_type.trim().to_lowercase().as_str())
    }

    /// Known workout type keys, sorted, for help output
    pub fn known_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.entries.is_empty() {
            errors.push("Catalog has no workout types".to_string());
        }

        for (key, entry) in &self.entries {
            if key.is_empty() {
                errors.push("Workout entry has empty key".to_string());
            }
            if *key != key.to_lowercase() {
                errors.push(format!("Workout key '{key}' is not lowercase"));
            }
            if entry.name.is_empty() {
                errors.push(format!("Workout '{key}' has empty display name"));
            }
            if entry.kcal_per_minute <= 0.0 {
                errors.push(format!(
                    "Workout '{key}' has non-positive burn rate {}",
                    entry.kcal_per_minute
                ));
            }
            if entry.water_ml_per_30_min < 0.0 {
                errors.push(format!(
                    "Workout '{key}' has negative water cost {}",
                    entry.water_ml_per_30_min
                ));
            }
        }

        errors
    }
}

/// Builds the default catalog of workout types
///
/// **Note**: For production use, prefer `get_default_catalog()` which
/// returns a cached reference.
pub fn build_default_catalog() -> WorkoutCatalog {
    let mut entries = HashMap::new();

    let mut add = |key: &str, name: &str, kcal_per_minute: f64, water_ml_per_30_min: f64| {
        entries.insert(
            key.to_string(),
            WorkoutEntry {
                name: name.to_string(),
                kcal_per_minute,
                water_ml_per_30_min,
            },
        );
    };

    add("running", "Running", 10.0, 200.0);
    add("walking", "Walking", 4.0, 100.0);
    add("cycling", "Cycling", 8.0, 150.0);
    add("swimming", "Swimming", 9.0, 250.0);
    add("strength", "Strength training", 7.0, 200.0);
    add("rowing", "Rowing", 9.5, 200.0);
    add("yoga", "Yoga", 3.0, 100.0);
    add("dancing", "Dancing", 6.0, 150.0);
    add("football", "Football", 8.5, 200.0);
    add("tennis", "Tennis", 7.5, 150.0);

    WorkoutCatalog { entries }
}
