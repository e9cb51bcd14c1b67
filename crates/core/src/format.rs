//! Rendering of a [`TagSet`] into key/value tags.
//!
//! A [`TagScheme`] maps every tier to a key plus the literals used for the
//! matched and unmatched states. The default scheme is the storage-tiering
//! convention (`nightly=1`, `weekly=0`, ...); custom schemes are plain data
//! and go through the same validation.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TierTagError};
use crate::tier::{TagSet, TierKind};

/// A single rendered tag, serialized the way S3 object tagging expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedTag {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Value")]
    pub value: String,
}

impl FormattedTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Key plus true/false literals for one tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSpec {
    pub key: String,
    #[serde(default = "default_on")]
    pub on: String,
    #[serde(default = "default_off")]
    pub off: String,
}

fn default_on() -> String {
    "1".to_string()
}

fn default_off() -> String {
    "0".to_string()
}

impl TagSpec {
    pub fn new(key: impl Into<String>, on: impl Into<String>, off: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            on: on.into(),
            off: off.into(),
        }
    }

    fn render(&self, matched: bool) -> FormattedTag {
        let value = if matched { &self.on } else { &self.off };
        FormattedTag::new(self.key.clone(), value.clone())
    }
}

/// Mapping from every [`TierKind`] to its [`TagSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagScheme {
    specs: BTreeMap<TierKind, TagSpec>,
}

impl Default for TagScheme {
    fn default() -> Self {
        Self {
            specs: TierKind::ALL
                .into_iter()
                .map(|tier| (tier, TagSpec::new(tier.as_str(), "1", "0")))
                .collect(),
        }
    }
}

impl TagScheme {
    /// Build a custom scheme.
    ///
    /// Fails with [`TierTagError::UnsupportedScheme`] if any tier is missing,
    /// if a key is empty, or if two tiers share a key.
    pub fn custom(specs: BTreeMap<TierKind, TagSpec>) -> Result<Self> {
        let scheme = Self { specs };
        scheme.check()?;
        Ok(scheme)
    }

    pub fn spec(&self, tier: TierKind) -> Option<&TagSpec> {
        self.specs.get(&tier)
    }

    fn check(&self) -> Result<()> {
        let missing: Vec<&str> = TierKind::ALL
            .iter()
            .filter(|tier| !self.specs.contains_key(*tier))
            .map(TierKind::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(TierTagError::UnsupportedScheme(format!(
                "no tag mapping for tier(s): {}",
                missing.join(", ")
            )));
        }

        let mut seen = HashSet::new();
        for (tier, spec) in &self.specs {
            if spec.key.trim().is_empty() {
                return Err(TierTagError::UnsupportedScheme(format!(
                    "empty tag key for tier '{}'",
                    tier
                )));
            }
            if !seen.insert(spec.key.as_str()) {
                return Err(TierTagError::UnsupportedScheme(format!(
                    "tag key '{}' is mapped to more than one tier",
                    spec.key
                )));
            }
        }
        Ok(())
    }
}

/// Renders tag sets with a given scheme.
#[derive(Debug, Clone, Copy)]
pub struct TagFormatter<'a> {
    scheme: &'a TagScheme,
}

impl<'a> TagFormatter<'a> {
    pub fn new(scheme: &'a TagScheme) -> Self {
        Self { scheme }
    }

    /// One tag per tier, in canonical tier order.
    pub fn format(&self, tags: &TagSet) -> Result<Vec<FormattedTag>> {
        tags.flags()
            .iter()
            .map(|flag| {
                let spec = self.scheme.spec(flag.tier).ok_or_else(|| {
                    TierTagError::UnsupportedScheme(format!(
                        "no tag mapping for tier: {}",
                        flag.tier
                    ))
                })?;
                Ok(spec.render(flag.outcome.is_matched()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::TierMatch;

    fn custom_specs() -> BTreeMap<TierKind, TagSpec> {
        TierKind::ALL
            .into_iter()
            .map(|t| (t, TagSpec::new(format!("backup-{}", t), "true", "false")))
            .collect()
    }

    fn only(tier: TierKind) -> TagSet {
        TagSet::from_fn(|t| TierMatch::from(t == TierKind::Standard || t == tier))
    }

    #[test]
    fn default_scheme_renders_ones_and_zeros() {
        let scheme = TagScheme::default();
        let tags = TagFormatter::new(&scheme).format(&only(TierKind::Weekly)).unwrap();
        let rendered: Vec<(&str, &str)> =
            tags.iter().map(|t| (t.key.as_str(), t.value.as_str())).collect();
        assert_eq!(
            rendered,
            vec![
                ("standard", "1"),
                ("nightly", "0"),
                ("weekly", "1"),
                ("monthly", "0"),
                ("quarterly", "0"),
                ("yearly", "0"),
            ]
        );
    }

    #[test]
    fn custom_scheme_substitutes_keys_and_literals() {
        let scheme = TagScheme::custom(custom_specs()).unwrap();
        let tags = TagFormatter::new(&scheme).format(&only(TierKind::Yearly)).unwrap();
        assert_eq!(tags[0], FormattedTag::new("backup-standard", "true"));
        assert_eq!(tags[1], FormattedTag::new("backup-nightly", "false"));
        assert_eq!(tags[5], FormattedTag::new("backup-yearly", "true"));
    }

    #[test]
    fn custom_scheme_missing_tier_is_unsupported() {
        let mut specs = custom_specs();
        specs.remove(&TierKind::Quarterly);
        match TagScheme::custom(specs) {
            Err(TierTagError::UnsupportedScheme(msg)) => assert!(msg.contains("quarterly")),
            other => panic!("expected UnsupportedScheme, got {:?}", other),
        }
    }

    #[test]
    fn custom_scheme_rejects_duplicate_and_empty_keys() {
        let mut specs = custom_specs();
        specs.insert(TierKind::Yearly, TagSpec::new("backup-monthly", "1", "0"));
        assert!(matches!(
            TagScheme::custom(specs),
            Err(TierTagError::UnsupportedScheme(_))
        ));

        let mut specs = custom_specs();
        specs.insert(TierKind::Nightly, TagSpec::new("  ", "1", "0"));
        assert!(matches!(
            TagScheme::custom(specs),
            Err(TierTagError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn formatted_tag_uses_s3_field_names() {
        let json = serde_json::to_string(&FormattedTag::new("nightly", "1")).unwrap();
        assert_eq!(json, r#"{"Key":"nightly","Value":"1"}"#);
    }

    #[test]
    fn tag_spec_literals_default_to_one_and_zero() {
        let spec: TagSpec = serde_json::from_str(r#"{"key":"daily"}"#).unwrap();
        assert_eq!(spec, TagSpec::new("daily", "1", "0"));
    }
}
