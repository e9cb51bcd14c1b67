//! Rendering of computed tags for stdout.

use anyhow::{Context, Result};
use serde::Serialize;

use tiertag_core::cadence::{daily_cron, standard_cron, Slot};
use tiertag_core::{Evaluation, FormattedTag, ScheduleConfig, TierDecision};

use crate::cli::OutputFormat;

#[derive(Serialize)]
struct TagSetDocument<'a> {
    #[serde(rename = "TagSet")]
    tag_set: &'a [FormattedTag],
}

#[derive(Serialize)]
struct Report<'a> {
    evaluation: &'a Evaluation,
    decisions: Vec<TierDecision>,
    tags: &'a [FormattedTag],
}

/// Drop tags whose tier did not match. `tags` must be in tier order, as
/// produced by the formatter.
pub fn matched_only(evaluation: &Evaluation, tags: Vec<FormattedTag>) -> Vec<FormattedTag> {
    tags.into_iter()
        .zip(evaluation.tags.flags())
        .filter(|(_, flag)| flag.outcome.is_matched())
        .map(|(tag, _)| tag)
        .collect()
}

pub fn render_tags(
    format: OutputFormat,
    evaluation: &Evaluation,
    tags: &[FormattedTag],
) -> Result<String> {
    match format {
        OutputFormat::S3Json => serde_json::to_string(&TagSetDocument { tag_set: tags })
            .context("failed to serialize tag set"),
        OutputFormat::Lines => Ok(tags
            .iter()
            .map(|t| format!("{}={}", t.key, t.value))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => serde_json::to_string_pretty(&Report {
            evaluation,
            decisions: evaluation.decisions(),
            tags,
        })
        .context("failed to serialize evaluation report"),
    }
}

pub fn render_schedule(config: &ScheduleConfig, slots: &[Slot]) -> String {
    let mut out = format!(
        "standard: {}\ndaily:    {}\nslots:    {} per day, daily anchor is slot {}\n",
        standard_cron(config),
        daily_cron(config),
        config.slots_per_day(),
        config.daily_slot_index()
    );
    for slot in slots {
        out.push_str(&slot.at.to_rfc3339());
        if slot.daily_anchor {
            out.push_str("  (daily anchor)");
        }
        out.push('\n');
    }
    out
}
