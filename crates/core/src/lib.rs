//! Backup retention tier tagging.
//!
//! Given a reference instant and a slot schedule, decides which retention
//! tiers (standard, nightly, weekly, monthly, quarterly, yearly) a backup run
//! satisfies and renders the result as key/value tags for a storage lifecycle
//! engine. Everything here is a pure function of its inputs: the caller reads
//! the clock once and passes the instant in.

pub mod anchor;
pub mod cadence;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod format;
pub mod orchestrator;
pub mod tier;

pub use anchor::{AnchorCalculator, Anchors};
pub use config::{RawScheduleConfig, ScheduleConfig};
pub use error::*;
pub use evaluator::TagEvaluator;
pub use format::{FormattedTag, TagFormatter, TagScheme, TagSpec};
pub use orchestrator::{compute_tags, evaluate, Evaluation, TierDecision};
pub use tier::{TagFlag, TagSet, TierKind, TierMatch};
