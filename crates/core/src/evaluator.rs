//! Lag-window matching of a reference instant against tier anchors.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::anchor::{truncate_to_minute, Anchors};
use crate::config::ScheduleConfig;
use crate::tier::{TagSet, TierKind, TierMatch};

/// Applies the `[anchor, anchor + lag]` window rule to each tier.
#[derive(Debug, Clone, Copy)]
pub struct TagEvaluator {
    lag_window: Duration,
}

impl TagEvaluator {
    pub fn new(config: &ScheduleConfig) -> Self {
        Self {
            lag_window: Duration::minutes(i64::from(config.lag_window_minutes())),
        }
    }

    /// Whether `reference` falls inside the window opened by `anchor`.
    ///
    /// Both ends are inclusive. The window is one-sided: a run can never
    /// satisfy a tier before the tier's anchor. It is also clipped at the end
    /// of the anchor's calendar day, so a Sunday 00:05 run never counts as
    /// Saturday's weekly backup.
    pub fn in_window(&self, anchor: DateTime<Utc>, reference: DateTime<Utc>) -> bool {
        let reference = truncate_to_minute(reference);
        // A window end past chrono's last representable instant cannot be
        // exceeded by any reference.
        anchor.date_naive() == reference.date_naive()
            && anchor <= reference
            && anchor
                .checked_add_signed(self.lag_window)
                .map_or(true, |end| reference <= end)
    }

    pub fn evaluate_tier(
        &self,
        tier: TierKind,
        anchors: &Anchors,
        reference: DateTime<Utc>,
    ) -> TierMatch {
        if tier == TierKind::Standard {
            // Every run, scheduled or manual, carries the standard tag.
            return TierMatch::Matched;
        }
        let outcome: TierMatch = anchors
            .get(tier)
            .is_some_and(|anchor| self.in_window(anchor, reference))
            .into();
        debug!(%tier, anchor = ?anchors.get(tier), ?outcome, "evaluated tier");
        outcome
    }

    pub fn evaluate(&self, anchors: &Anchors, reference: DateTime<Utc>) -> TagSet {
        TagSet::from_fn(|tier| self.evaluate_tier(tier, anchors, reference))
    }
}
