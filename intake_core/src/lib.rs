#![forbid(unsafe_code)]

//! Core domain model and business logic for the intake tracking system.
//!
//! This crate provides:
//! - Daily norm calculations (water, calories, workout cost)
//! - The workout catalog
//! - User profile store with per-user atomic updates
//! - Progress aggregation
//! - The daily reset scheduler
//! - External weather/food lookup clients
//! - The conversational state machine

pub mod catalog;
pub mod config;
pub mod dialog;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod norms;
pub mod progress;
pub mod reset;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use catalog::{build_default_catalog, get_default_catalog, WorkoutCatalog};
pub use config::Config;
pub use dialog::{Command, Dialog, DialogEngine, Step};
pub use error::{Error, Result};
pub use lookup::{FixedTemperature, FoodHit, FoodLookup, TemperatureLookup};
pub use norms::{calorie_norm, water_norm, workout_energy};
pub use progress::report;
pub use reset::{run_reset_cycle, DailyResetScheduler, ResetSummary};
pub use store::ProfileStore;
pub use types::*;
