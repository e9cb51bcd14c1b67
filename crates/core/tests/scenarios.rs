//! End-to-end tag computation for known calendar situations.

use chrono::{DateTime, Utc};
use tiertag_core::{compute_tags, RawScheduleConfig, TagScheme, TierKind, TierTagError};

fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn config() -> RawScheduleConfig {
    RawScheduleConfig::new(4, 30, 20, 1)
}

/// Render the default-scheme tags as `key=value` pairs.
fn tags_at(reference: &str) -> Vec<String> {
    compute_tags(at(reference), &config(), &TagScheme::default())
        .unwrap()
        .into_iter()
        .map(|t| format!("{}={}", t.key, t.value))
        .collect()
}

// ── Documented scenarios ────────────────────────────────────

#[test]
fn leap_day_thursday_is_nightly_and_monthly() {
    assert_eq!(
        tags_at("2024-02-29T04:35:00Z"),
        vec!["standard=1", "nightly=1", "weekly=0", "monthly=1", "quarterly=0", "yearly=0"]
    );
}

#[test]
fn new_years_eve_sunday_hits_every_coarse_tier_but_weekly() {
    assert_eq!(
        tags_at("2023-12-31T04:40:00Z"),
        vec!["standard=1", "nightly=1", "weekly=0", "monthly=1", "quarterly=1", "yearly=1"]
    );
}

#[test]
fn saturday_year_end_matches_everything() {
    // 2022-12-31 is a Saturday.
    assert_eq!(
        tags_at("2022-12-31T04:30:00Z"),
        vec!["standard=1", "nightly=1", "weekly=1", "monthly=1", "quarterly=1", "yearly=1"]
    );
}

#[test]
fn lag_window_boundaries() {
    assert_eq!(tags_at("2024-05-14T04:50:00Z")[1], "nightly=1");
    assert_eq!(tags_at("2024-05-14T04:51:00Z")[1], "nightly=0");
    assert_eq!(tags_at("2024-05-14T04:29:00Z")[1], "nightly=0");
}

#[test]
fn off_slot_run_is_standard_only() {
    assert_eq!(
        tags_at("2024-06-30T12:30:00Z"),
        vec!["standard=1", "nightly=0", "weekly=0", "monthly=0", "quarterly=0", "yearly=0"]
    );
}

#[test]
fn quarter_end_in_non_leap_february_year() {
    // 2023-03-31 is a Friday.
    assert_eq!(
        tags_at("2023-03-31T04:45:00Z"),
        vec!["standard=1", "nightly=1", "weekly=0", "monthly=1", "quarterly=1", "yearly=0"]
    );
}

#[test]
fn february_28_is_not_month_end_in_leap_year() {
    assert_eq!(tags_at("2024-02-28T04:30:00Z")[3], "monthly=0");
    assert_eq!(tags_at("2023-02-28T04:30:00Z")[3], "monthly=1");
}

// ── Failures ────────────────────────────────────────────────

#[test]
fn interval_not_dividing_day_is_invalid() {
    let raw = RawScheduleConfig::new(5, 30, 20, 1);
    let result = compute_tags(at("2024-02-29T04:35:00Z"), &raw, &TagScheme::default());
    assert!(matches!(result, Err(TierTagError::InvalidConfig(_))));
}

#[test]
fn custom_scheme_missing_tier_fails_before_any_tag() {
    use std::collections::BTreeMap;
    use tiertag_core::TagSpec;

    let mut specs = BTreeMap::new();
    specs.insert(TierKind::Standard, TagSpec::new("standard", "yes", "no"));
    let result = TagScheme::custom(specs);
    assert!(matches!(result, Err(TierTagError::UnsupportedScheme(_))));
}
