//! Retention tiers and their per-invocation match flags.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Retention tier, declared in canonical output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierKind {
    Standard,
    Nightly,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl TierKind {
    /// Every tier in canonical output order.
    pub const ALL: [TierKind; 6] = [
        TierKind::Standard,
        TierKind::Nightly,
        TierKind::Weekly,
        TierKind::Monthly,
        TierKind::Quarterly,
        TierKind::Yearly,
    ];

    /// Lowercase tier name, also the default tag key.
    pub fn as_str(&self) -> &'static str {
        match self {
            TierKind::Standard => "standard",
            TierKind::Nightly => "nightly",
            TierKind::Weekly => "weekly",
            TierKind::Monthly => "monthly",
            TierKind::Quarterly => "quarterly",
            TierKind::Yearly => "yearly",
        }
    }
}

impl fmt::Display for TierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of testing one tier against the reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierMatch {
    Matched,
    NotMatched,
}

impl TierMatch {
    pub fn is_matched(self) -> bool {
        matches!(self, TierMatch::Matched)
    }
}

impl From<bool> for TierMatch {
    fn from(matched: bool) -> Self {
        if matched {
            TierMatch::Matched
        } else {
            TierMatch::NotMatched
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFlag {
    pub tier: TierKind,
    pub outcome: TierMatch,
}

/// One flag per tier, always in [`TierKind::ALL`] order.
///
/// Deserialization goes through [`TagSet::from_fn`] as well, so a payload
/// with a repeated or missing tier is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTagSet")]
pub struct TagSet {
    flags: [TagFlag; 6],
}

#[derive(Deserialize)]
struct RawTagSet {
    flags: Vec<TagFlag>,
}

impl TryFrom<RawTagSet> for TagSet {
    type Error = String;

    fn try_from(raw: RawTagSet) -> std::result::Result<Self, Self::Error> {
        let mut outcomes = BTreeMap::new();
        for flag in raw.flags {
            if outcomes.insert(flag.tier, flag.outcome).is_some() {
                return Err(format!("duplicate flag for tier '{}'", flag.tier));
            }
        }
        if let Some(missing) = TierKind::ALL.iter().find(|t| !outcomes.contains_key(*t)) {
            return Err(format!("missing flag for tier '{}'", missing));
        }
        Ok(Self::from_fn(|tier| outcomes[&tier]))
    }
}

impl TagSet {
    /// Build a tag set from a per-tier decision function.
    ///
    /// The closure is invoked once per tier, in canonical order, so the
    /// result can never contain duplicates or gaps.
    pub fn from_fn(mut decide: impl FnMut(TierKind) -> TierMatch) -> Self {
        Self {
            flags: TierKind::ALL.map(|tier| TagFlag {
                tier,
                outcome: decide(tier),
            }),
        }
    }

    pub fn flags(&self) -> &[TagFlag] {
        &self.flags
    }

    pub fn get(&self, tier: TierKind) -> TierMatch {
        // ALL is declared in discriminant order.
        self.flags[tier as usize].outcome
    }

    pub fn is_matched(&self, tier: TierKind) -> bool {
        self.get(tier).is_matched()
    }

    pub fn matched(&self) -> impl Iterator<Item = TierKind> + '_ {
        self.flags
            .iter()
            .filter(|f| f.outcome.is_matched())
            .map(|f| f.tier)
    }
}
