//! Cron rendering of the configured slot cadence.
//!
//! The tagging run is expected to be triggered by an external scheduler
//! (crontab, Kubernetes CronJob). These helpers render the matching cron
//! expressions and list upcoming trigger instants so operators can check
//! that the scheduler and the tag config agree.

use std::str::FromStr;

use chrono::{DateTime, Timelike, Utc};
use cron::Schedule;
use serde::Serialize;

use crate::config::ScheduleConfig;
use crate::error::{Result, TierTagError};

/// One upcoming standard slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub at: DateTime<Utc>,
    /// Whether this slot is the designated daily anchor.
    pub daily_anchor: bool,
}

/// 5-field cron expression for every standard slot, e.g. `30 */4 * * *`.
pub fn standard_cron(config: &ScheduleConfig) -> String {
    let hours = match config.interval_hours() {
        1 => "*".to_string(),
        24 => "0".to_string(),
        n => format!("*/{}", n),
    };
    format!("{} {} * * *", config.minute_offset(), hours)
}

/// 5-field cron expression for the daily anchor slot, e.g. `30 4 * * *`.
pub fn daily_cron(config: &ScheduleConfig) -> String {
    format!("{} {} * * *", config.minute_offset(), config.daily_anchor_hour())
}

/// The next `count` standard slots strictly after `after`.
pub fn upcoming_slots(
    config: &ScheduleConfig,
    after: DateTime<Utc>,
    count: usize,
) -> Result<Vec<Slot>> {
    // The `cron` crate wants a leading seconds field.
    let expr = format!("0 {}", standard_cron(config));
    let schedule = Schedule::from_str(&expr).map_err(|e| {
        TierTagError::InvalidConfig(format!("cannot build cron schedule '{}': {}", expr, e))
    })?;
    let interval = config.interval_hours();
    Ok(schedule
        .after(&after)
        .take(count)
        .map(|at| Slot {
            at,
            daily_anchor: at.hour() / interval == config.daily_slot_index(),
        })
        .collect())
}
