//! Progress aggregation.
//!
//! Combines a user's derived daily norms with the day's counters into a
//! balance report. Pure function over a fetched record; the store is not
//! consulted here.

use crate::types::{ProgressReport, UserRecord};
use crate::{Error, Result};

/// Build the daily balance report for one record.
///
/// Burned workout calories raise the effective calorie allowance for the
/// day. A record whose norms were never derived (profile setup incomplete)
/// answers [`Error::ProfileNotFound`] so the caller can prompt for setup.
pub fn report(record: &UserRecord) -> Result<ProgressReport> {
    let (Some(water_target_ml), Some(calories_norm_kcal)) =
        (record.water_norm_ml, record.calories_norm_kcal)
    else {
        return Err(Error::ProfileNotFound);
    };

    let counters = &record.counters;
    let calories_target_kcal = calories_norm_kcal + counters.calories_burned_kcal;

    Ok(ProgressReport {
        water_drunk_ml: counters.water_logged_ml,
        water_target_ml,
        water_balance_ml: water_target_ml - counters.water_logged_ml,
        calories_consumed_kcal: counters.calories_logged_kcal,
        calories_target_kcal,
        calories_burned_kcal: counters.calories_burned_kcal,
        calories_balance_kcal: calories_target_kcal - counters.calories_logged_kcal,
    })
}
