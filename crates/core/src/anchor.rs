//! Per-tier anchor computation.
//!
//! Every coarser tier is anchored on the daily slot of one specific calendar
//! day: today (nightly), the current or most recent Saturday (weekly), or the
//! last day of the month, quarter or year. Period ends are always derived as
//! "first day of the following period minus one day" so month lengths and
//! leap years come from chrono rather than a lookup table.

use chrono::{DateTime, Datelike, Days, NaiveDate, Timelike, Utc, Weekday};
use serde::Serialize;
use tracing::debug;

use crate::config::ScheduleConfig;
use crate::tier::TierKind;

/// Drop seconds and sub-second precision; all matching happens per minute.
pub fn truncate_to_minute(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(instant)
}

/// Last calendar day of `month` in `year`.
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Final month (3, 6, 9 or 12) of the quarter containing `month`.
pub fn quarter_end_month(month: u32) -> u32 {
    ((month - 1) / 3 + 1) * 3
}

/// The current Saturday, or the most recent one before `date`.
pub fn most_recent_saturday(date: NaiveDate) -> Option<NaiveDate> {
    let since_saturday = (date.weekday().num_days_from_monday() + 7
        - Weekday::Sat.num_days_from_monday())
        % 7;
    date.checked_sub_days(Days::new(u64::from(since_saturday)))
}

/// Anchor instants for one reference instant. Standard has no anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Anchors {
    pub nightly: Option<DateTime<Utc>>,
    pub weekly: Option<DateTime<Utc>>,
    pub monthly: Option<DateTime<Utc>>,
    pub quarterly: Option<DateTime<Utc>>,
    pub yearly: Option<DateTime<Utc>>,
}

impl Anchors {
    pub fn get(&self, tier: TierKind) -> Option<DateTime<Utc>> {
        match tier {
            TierKind::Standard => None,
            TierKind::Nightly => self.nightly,
            TierKind::Weekly => self.weekly,
            TierKind::Monthly => self.monthly,
            TierKind::Quarterly => self.quarterly,
            TierKind::Yearly => self.yearly,
        }
    }
}

/// Computes the scheduled boundary of each tier relative to a reference instant.
#[derive(Debug, Clone, Copy)]
pub struct AnchorCalculator {
    config: ScheduleConfig,
}

impl AnchorCalculator {
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    /// Daily anchor on an arbitrary calendar day.
    pub fn daily_anchor_on(&self, date: NaiveDate) -> DateTime<Utc> {
        date.and_time(self.config.daily_anchor_time()).and_utc()
    }

    /// Anchor for a single tier. `None` for Standard, and for dates chrono
    /// cannot represent (the far ends of its supported year range).
    pub fn anchor(&self, tier: TierKind, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let today = reference.date_naive();
        let day = match tier {
            TierKind::Standard => return None,
            TierKind::Nightly => Some(today),
            TierKind::Weekly => most_recent_saturday(today),
            TierKind::Monthly => last_day_of_month(today.year(), today.month()),
            TierKind::Quarterly => {
                last_day_of_month(today.year(), quarter_end_month(today.month()))
            }
            TierKind::Yearly => NaiveDate::from_ymd_opt(today.year(), 12, 31),
        };
        day.map(|d| self.daily_anchor_on(d))
    }

    /// All anchors for `reference`, each computed independently.
    pub fn anchors(&self, reference: DateTime<Utc>) -> Anchors {
        let anchors = Anchors {
            nightly: self.anchor(TierKind::Nightly, reference),
            weekly: self.anchor(TierKind::Weekly, reference),
            monthly: self.anchor(TierKind::Monthly, reference),
            quarterly: self.anchor(TierKind::Quarterly, reference),
            yearly: self.anchor(TierKind::Yearly, reference),
        };
        debug!(%reference, ?anchors, "computed tier anchors");
        anchors
    }
}
