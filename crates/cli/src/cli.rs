use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Backup retention tier tags for S3 lifecycle rules.
///
/// Decides which retention tiers (standard, nightly, weekly, monthly,
/// quarterly, yearly) the current backup run satisfies and prints them as
/// an S3 `TagSet`.
#[derive(Parser, Debug)]
#[command(name = "tiertag", version, about = "Backup retention tier tags for S3 lifecycle rules")]
pub struct CliArgs {
    /// Matching every n hours (must divide 24)
    #[arg(
        short = 'n',
        long = "every-n-hours",
        env = "TIERTAG_EVERY_N_HOURS",
        allow_negative_numbers = true,
        global = true
    )]
    pub every_n_hours: Option<i64>,

    /// Minutes forward from the top of the hour to offset match by
    #[arg(
        short = 'm',
        long = "minutes-offset",
        env = "TIERTAG_MINUTES_OFFSET",
        allow_negative_numbers = true,
        global = true
    )]
    pub minutes_offset: Option<i64>,

    /// Matching window for clock skew and/or job trigger delay
    #[arg(
        short = 'l',
        long = "lag-window-in-minutes",
        env = "TIERTAG_LAG_WINDOW_MINUTES",
        allow_negative_numbers = true,
        global = true
    )]
    pub lag_window_minutes: Option<i64>,

    /// Which of the day's slots anchors nightly and coarser tiers (default 1)
    #[arg(
        short = 'd',
        long = "daily-slot-index",
        env = "TIERTAG_DAILY_SLOT_INDEX",
        allow_negative_numbers = true,
        global = true
    )]
    pub daily_slot_index: Option<i64>,

    /// Reference instant (RFC 3339). Defaults to the current time.
    #[arg(long, env = "TIERTAG_AT", global = true)]
    pub at: Option<DateTime<Utc>>,

    /// Path to config file (default: ~/.config/tiertag/config.toml)
    #[arg(long, env = "TIERTAG_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the tags for the reference instant (default)
    Tags(TagsArgs),
    /// Print cron expressions and upcoming slots for the configured cadence
    Schedule(ScheduleArgs),
}

#[derive(Args, Debug, Default)]
pub struct TagsArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::S3Json)]
    pub format: OutputFormat,

    /// Only emit tiers that matched
    #[arg(long)]
    pub matched_only: bool,
}

#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Number of upcoming slots to list
    #[arg(long, default_value_t = 6)]
    pub count: usize,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `{"TagSet":[{"Key":..,"Value":..}]}` for `aws s3api put-object-tagging`
    #[default]
    S3Json,
    /// One `key=value` pair per line
    Lines,
    /// Full evaluation report including anchors
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn parses_long_and_short_flags() {
        let args = CliArgs::try_parse_from([
            "tiertag",
            "--every-n-hours",
            "6",
            "-m",
            "15",
            "-l",
            "30",
            "--at",
            "2024-02-29T04:35:00Z",
        ])
        .unwrap();
        assert_eq!(args.every_n_hours, Some(6));
        assert_eq!(args.minutes_offset, Some(15));
        assert_eq!(args.lag_window_minutes, Some(30));
        assert_eq!(args.daily_slot_index, None);
        assert_eq!(args.at.unwrap().to_rfc3339(), "2024-02-29T04:35:00+00:00");
        assert!(args.command.is_none());
    }

    #[test]
    fn negative_values_reach_validation() {
        let args = CliArgs::try_parse_from(["tiertag", "-l", "-5"]).unwrap();
        assert_eq!(args.lag_window_minutes, Some(-5));
    }

    #[test]
    fn tags_subcommand_options() {
        let args =
            CliArgs::try_parse_from(["tiertag", "tags", "--format", "lines", "--matched-only"])
                .unwrap();
        match args.command {
            Some(Command::Tags(tags)) => {
                assert_eq!(tags.format, OutputFormat::Lines);
                assert!(tags.matched_only);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
