use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use tiertag_core::{RawScheduleConfig, TagScheme, TagSpec, TierKind};

use crate::cli::CliArgs;

/// Schedule values from the config file; unset fields fall through to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSection {
    pub interval_hours: Option<i64>,
    pub minute_offset: Option<i64>,
    pub lag_window_minutes: Option<i64>,
    pub daily_slot_index: Option<i64>,
}

/// CLI configuration loaded from TOML file.
///
/// ```toml
/// [schedule]
/// interval_hours = 4
/// minute_offset = 30
///
/// [scheme.nightly]
/// key = "retention-nightly"
/// on = "true"
/// off = "false"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub schedule: ScheduleSection,

    /// Custom tag scheme; must map every tier when present.
    #[serde(default)]
    pub scheme: Option<BTreeMap<TierKind, TagSpec>>,
}

impl CliConfig {
    /// Return the default config file path: ~/.config/tiertag/config.toml
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tiertag").join("config.toml"))
    }

    /// Load config from the given path, or the default path.
    ///
    /// An explicit path must exist. A missing default file yields the
    /// built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_config_path() {
                Some(p) if p.exists() => p,
                _ => {
                    debug!("No config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        debug!(?config_path, "Loading config");
        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read config: {}", config_path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", config_path.display()))?;
        Ok(config)
    }

    /// Resolve the schedule.
    /// Priority: cli flag (or its env var) > config file > built-in default.
    pub fn resolve_schedule(&self, args: &CliArgs) -> RawScheduleConfig {
        let defaults = RawScheduleConfig::default();
        let file = &self.schedule;
        RawScheduleConfig::new(
            args.every_n_hours
                .or(file.interval_hours)
                .unwrap_or(defaults.interval_hours),
            args.minutes_offset
                .or(file.minute_offset)
                .unwrap_or(defaults.minute_offset),
            args.lag_window_minutes
                .or(file.lag_window_minutes)
                .unwrap_or(defaults.lag_window_minutes),
            args.daily_slot_index
                .or(file.daily_slot_index)
                .unwrap_or(defaults.daily_slot_index),
        )
    }

    /// The configured tag scheme, or the default storage-tiering scheme.
    pub fn tag_scheme(&self) -> Result<TagScheme> {
        match &self.scheme {
            Some(specs) => Ok(TagScheme::custom(specs.clone())?),
            None => Ok(TagScheme::default()),
        }
    }
}
