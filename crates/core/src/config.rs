use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, TierTagError};

const MINUTES_PER_DAY: i64 = 24 * 60;

pub const DEFAULT_INTERVAL_HOURS: i64 = 4;
pub const DEFAULT_MINUTE_OFFSET: i64 = 30;
pub const DEFAULT_LAG_WINDOW_MINUTES: i64 = 20;
pub const DEFAULT_DAILY_SLOT_INDEX: i64 = 1;

// ── Raw (unvalidated) values ──────────────────────────────────

/// Schedule values as supplied by the caller, before validation.
///
/// Fields are signed so that out-of-range input (negative lag, for example)
/// reaches [`validate`](RawScheduleConfig::validate) and is reported instead
/// of being rejected by an integer parser with a less useful message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawScheduleConfig {
    #[serde(default = "default_interval_hours")]
    pub interval_hours: i64,
    #[serde(default = "default_minute_offset")]
    pub minute_offset: i64,
    #[serde(default = "default_lag_window_minutes")]
    pub lag_window_minutes: i64,
    #[serde(default = "default_daily_slot_index")]
    pub daily_slot_index: i64,
}

fn default_interval_hours() -> i64 {
    DEFAULT_INTERVAL_HOURS
}

fn default_minute_offset() -> i64 {
    DEFAULT_MINUTE_OFFSET
}

fn default_lag_window_minutes() -> i64 {
    DEFAULT_LAG_WINDOW_MINUTES
}

fn default_daily_slot_index() -> i64 {
    DEFAULT_DAILY_SLOT_INDEX
}

impl Default for RawScheduleConfig {
    fn default() -> Self {
        Self {
            interval_hours: DEFAULT_INTERVAL_HOURS,
            minute_offset: DEFAULT_MINUTE_OFFSET,
            lag_window_minutes: DEFAULT_LAG_WINDOW_MINUTES,
            daily_slot_index: DEFAULT_DAILY_SLOT_INDEX,
        }
    }
}

impl RawScheduleConfig {
    pub fn new(
        interval_hours: i64,
        minute_offset: i64,
        lag_window_minutes: i64,
        daily_slot_index: i64,
    ) -> Self {
        Self {
            interval_hours,
            minute_offset,
            lag_window_minutes,
            daily_slot_index,
        }
    }

    /// Check every field and produce a [`ScheduleConfig`].
    ///
    /// Fails with [`TierTagError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<ScheduleConfig> {
        let interval = self.interval_hours;
        if interval <= 0 || 24 % interval != 0 {
            return Err(TierTagError::InvalidConfig(format!(
                "interval_hours must be a positive divisor of 24 (1, 2, 3, 4, 6, 8, 12 or 24), got {}",
                interval
            )));
        }

        if !(0..=59).contains(&self.minute_offset) {
            return Err(TierTagError::InvalidConfig(format!(
                "minute_offset must be within 0..=59, got {}",
                self.minute_offset
            )));
        }

        let interval_minutes = interval * 60;
        if self.lag_window_minutes < 0 {
            return Err(TierTagError::InvalidConfig(format!(
                "lag_window_minutes must not be negative, got {}",
                self.lag_window_minutes
            )));
        }
        if self.lag_window_minutes >= interval_minutes {
            return Err(TierTagError::InvalidConfig(format!(
                "lag_window_minutes must be smaller than the slot interval ({} minutes), got {}",
                interval_minutes, self.lag_window_minutes
            )));
        }

        let mut config = ScheduleConfig {
            interval_hours: interval as u32,
            minute_offset: self.minute_offset as u32,
            lag_window_minutes: self.lag_window_minutes as u32,
            daily_slot_index: 0,
        };

        let slots_per_day = config.slots_per_day();
        if !(0..i64::from(slots_per_day)).contains(&self.daily_slot_index) {
            return Err(TierTagError::InvalidConfig(format!(
                "daily_slot_index must be within 0..{} for a {}h interval, got {}",
                slots_per_day, interval, self.daily_slot_index
            )));
        }
        config.daily_slot_index = self.daily_slot_index as u32;

        let window_end = config.daily_anchor_minute_of_day() + self.lag_window_minutes;
        if window_end >= MINUTES_PER_DAY {
            warn!(
                daily_anchor = %config.daily_anchor_time(),
                lag_window_minutes = config.lag_window_minutes,
                "lag window runs past midnight; late runs after 00:00 will not match coarser tiers"
            );
        }

        Ok(config)
    }
}

// ── Validated config ──────────────────────────────────────────

/// Validated schedule parameters. Only obtainable through
/// [`RawScheduleConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduleConfig {
    interval_hours: u32,
    minute_offset: u32,
    lag_window_minutes: u32,
    daily_slot_index: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_hours: DEFAULT_INTERVAL_HOURS as u32,
            minute_offset: DEFAULT_MINUTE_OFFSET as u32,
            lag_window_minutes: DEFAULT_LAG_WINDOW_MINUTES as u32,
            daily_slot_index: DEFAULT_DAILY_SLOT_INDEX as u32,
        }
    }
}

impl ScheduleConfig {
    pub fn interval_hours(&self) -> u32 {
        self.interval_hours
    }

    pub fn minute_offset(&self) -> u32 {
        self.minute_offset
    }

    pub fn lag_window_minutes(&self) -> u32 {
        self.lag_window_minutes
    }

    pub fn daily_slot_index(&self) -> u32 {
        self.daily_slot_index
    }

    /// Number of standard slots per day.
    pub fn slots_per_day(&self) -> u32 {
        24 / self.interval_hours
    }

    /// Hour of day of the designated daily slot.
    pub fn daily_anchor_hour(&self) -> u32 {
        self.interval_hours * self.daily_slot_index
    }

    /// Wall-clock time of the daily anchor (04:30 with the defaults).
    pub fn daily_anchor_time(&self) -> NaiveTime {
        // Both components are range-checked during validation.
        NaiveTime::from_hms_opt(self.daily_anchor_hour(), self.minute_offset, 0)
            .unwrap_or(NaiveTime::MIN)
    }

    fn daily_anchor_minute_of_day(&self) -> i64 {
        i64::from(self.daily_anchor_hour()) * 60 + i64::from(self.minute_offset)
    }
}

impl TryFrom<RawScheduleConfig> for ScheduleConfig {
    type Error = TierTagError;

    fn try_from(raw: RawScheduleConfig) -> Result<Self> {
        raw.validate()
    }
}
