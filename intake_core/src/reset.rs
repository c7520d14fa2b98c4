//! Daily reset scheduler.
//!
//! Once per day, at a fixed local-time hour, every stored user gets their
//! norms re-derived against a freshly fetched temperature and their daily
//! counters zeroed. The sweep holds no lock across users; each record
//! update is its own critical section inside the store. A trigger that
//! fires while a sweep is still running is skipped.

use crate::lookup::TemperatureLookup;
use crate::store::ProfileStore;
use crate::{norms, Result};
use chrono::{DateTime, Duration, Local, NaiveTime};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What one reset sweep did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResetSummary {
    /// Users whose counters were zeroed
    pub users_reset: usize,
    /// Users whose norms were re-derived with a fresh temperature
    pub norms_recomputed: usize,
    /// Users whose norms were left unchanged this cycle
    /// (incomplete profile, lookup failure, or stored attributes out of range)
    pub norms_skipped: usize,
}

/// Periodic daily-reset driver with Idle/Running states
pub struct DailyResetScheduler {
    store: Arc<ProfileStore>,
    weather: Arc<dyn TemperatureLookup>,
    running: AtomicBool,
}

impl DailyResetScheduler {
    pub fn new(store: Arc<ProfileStore>, weather: Arc<dyn TemperatureLookup>) -> Self {
        Self {
            store,
            weather,
            running: AtomicBool::new(false),
        }
    }

    /// Fire the reset once.
    ///
    /// Returns `None` without doing anything when a sweep is already
    /// Running; otherwise transitions to Running, sweeps every user, and
    /// returns to Idle with a summary.
    pub fn trigger(&self) -> Option<ResetSummary> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Daily reset already running, skipping trigger");
            return None;
        }

        let summary = run_reset_cycle(&self.store, self.weather.as_ref());
        self.running.store(false, Ordering::Release);
        Some(summary)
    }

    /// Run the trigger loop forever on a background thread, firing at the
    /// given local-time hour each day.
    pub fn spawn(self: Arc<Self>, hour: u32) -> std::thread::JoinHandle<()> {
        std::thread::spawn(move || loop {
            let now = Local::now();
            let next = next_trigger(now, hour);
            let wait = (next - now)
                .to_std()
                .unwrap_or(std::time::Duration::from_secs(1));
            tracing::info!("Next daily reset at {}", next);
            std::thread::sleep(wait);

            match self.trigger() {
                Some(summary) => tracing::info!(
                    "Daily reset done: {} users reset, {} norms recomputed, {} skipped",
                    summary.users_reset,
                    summary.norms_recomputed,
                    summary.norms_skipped
                ),
                None => tracing::warn!("Daily reset trigger overlapped a running sweep"),
            }
        })
    }
}

/// The next local time the reset should fire at the given hour
pub fn next_trigger(now: DateTime<Local>, hour: u32) -> DateTime<Local> {
    let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
    let mut candidate = now.date_naive().and_time(time);
    if candidate <= now.naive_local() {
        candidate += Duration::days(1);
    }
    candidate
        .and_local_timezone(Local)
        .earliest()
        .unwrap_or(now + Duration::days(1))
}

/// Sweep every stored user: re-derive norms against a fresh temperature and
/// zero the daily counters. A lookup failure for one user is logged and
/// leaves that user's norms unchanged without aborting the rest; the
/// counters roll over regardless, because the day does.
pub fn run_reset_cycle(store: &ProfileStore, weather: &dyn TemperatureLookup) -> ResetSummary {
    let mut summary = ResetSummary::default();

    for user_id in store.user_ids() {
        let Some(record) = store.get(&user_id) else {
            continue;
        };

        let new_norms = match record.complete_profile() {
            Some(profile) => match derive_norms(&profile, weather) {
                Ok(norms) => {
                    summary.norms_recomputed += 1;
                    Some(norms)
                }
                Err(e) => {
                    tracing::warn!("Skipping norm recompute for user {}: {}", user_id, e);
                    summary.norms_skipped += 1;
                    None
                }
            },
            None => {
                tracing::debug!("User {} has no complete profile, counters only", user_id);
                summary.norms_skipped += 1;
                None
            }
        };

        match store.apply_daily_reset(&user_id, new_norms) {
            Ok(()) => summary.users_reset += 1,
            Err(e) => {
                tracing::warn!("Failed to reset user {}: {}", user_id, e);
            }
        }
    }

    summary
}

fn derive_norms(
    profile: &crate::types::CompleteProfile<'_>,
    weather: &dyn TemperatureLookup,
) -> Result<(f64, f64)> {
    let temperature = weather.current_temperature(profile.city)?;
    let water = norms::water_norm(profile.weight_kg, profile.activity_minutes, temperature)?;
    let calories = norms::calorie_norm(
        profile.weight_kg,
        profile.height_cm,
        profile.age_years,
        profile.gender,
        profile.activity_minutes,
    )?;
    Ok((water, calories))
}
