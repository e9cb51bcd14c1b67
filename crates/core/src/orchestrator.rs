//! Single entry point composing anchors, evaluation and formatting.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::anchor::{truncate_to_minute, AnchorCalculator, Anchors};
use crate::config::{RawScheduleConfig, ScheduleConfig};
use crate::error::Result;
use crate::evaluator::TagEvaluator;
use crate::format::{FormattedTag, TagFormatter, TagScheme};
use crate::tier::{TagSet, TierKind};

/// Why a tier did or did not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierDecision {
    pub tier: TierKind,
    pub anchor: Option<DateTime<Utc>>,
    pub matched: bool,
}

/// Everything computed for one reference instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    /// Reference instant at minute resolution.
    pub reference: DateTime<Utc>,
    pub config: ScheduleConfig,
    pub anchors: Anchors,
    pub tags: TagSet,
}

impl Evaluation {
    pub fn decisions(&self) -> Vec<TierDecision> {
        TierKind::ALL
            .into_iter()
            .map(|tier| TierDecision {
                tier,
                anchor: self.anchors.get(tier),
                matched: self.tags.is_matched(tier),
            })
            .collect()
    }

    pub fn format(&self, scheme: &TagScheme) -> Result<Vec<FormattedTag>> {
        TagFormatter::new(scheme).format(&self.tags)
    }
}

/// Compute anchors and tier flags for a validated config.
pub fn evaluate(reference: DateTime<Utc>, config: &ScheduleConfig) -> Evaluation {
    let reference = truncate_to_minute(reference);
    let anchors = AnchorCalculator::new(*config).anchors(reference);
    let tags = TagEvaluator::new(config).evaluate(&anchors, reference);
    Evaluation {
        reference,
        config: *config,
        anchors,
        tags,
    }
}

/// Validate `config`, evaluate every tier at `reference` and render the
/// result with `scheme`.
///
/// Fails with `InvalidConfig` or `UnsupportedScheme`; never yields a partial
/// tag list.
pub fn compute_tags(
    reference: DateTime<Utc>,
    config: &RawScheduleConfig,
    scheme: &TagScheme,
) -> Result<Vec<FormattedTag>> {
    let config = config.validate()?;
    let evaluation = evaluate(reference, &config);
    let tags = evaluation.format(scheme)?;
    info!(
        reference = %evaluation.reference,
        matched = ?evaluation.tags.matched().collect::<Vec<_>>(),
        "computed retention tags"
    );
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TierTagError;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn evaluation_truncates_reference() {
        let eval = evaluate(at("2024-02-29T04:35:42Z"), &ScheduleConfig::default());
        assert_eq!(eval.reference, at("2024-02-29T04:35:00Z"));
    }

    #[test]
    fn decisions_cover_all_tiers_in_order() {
        let eval = evaluate(at("2023-12-31T04:40:00Z"), &ScheduleConfig::default());
        let decisions = eval.decisions();
        assert_eq!(decisions.len(), 6);
        assert_eq!(decisions[0].tier, TierKind::Standard);
        assert_eq!(decisions[0].anchor, None);
        assert!(decisions[0].matched);
        assert_eq!(decisions[5].tier, TierKind::Yearly);
        assert_eq!(decisions[5].anchor, Some(at("2023-12-31T04:30:00Z")));
        assert!(decisions[5].matched);
    }

    #[test]
    fn compute_tags_rejects_invalid_config() {
        let raw = RawScheduleConfig::new(5, 30, 20, 1);
        let err = compute_tags(at("2024-02-29T04:35:00Z"), &raw, &TagScheme::default())
            .unwrap_err();
        assert!(matches!(err, TierTagError::InvalidConfig(_)));
    }
}
