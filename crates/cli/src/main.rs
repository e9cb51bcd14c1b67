mod cli;
mod config;
mod output;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tiertag_core::cadence::upcoming_slots;
use tiertag_core::evaluate;

use crate::cli::{CliArgs, Command, TagsArgs};
use crate::config::CliConfig;

/// Load `.env` (the given file, or the usual lookup) and build the log filter
/// from `var`, so a level set in `.env` takes effect.
fn log_filter(dotenv_path: Option<&Path>, var: &str) -> EnvFilter {
    if let Some(path) = dotenv_path {
        dotenvy::from_path(path).ok();
    } else {
        dotenvy::dotenv().ok();
    }
    EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the tags.
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(None, "RUST_LOG"))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    // The clock is read exactly once per run.
    let now = args.at.unwrap_or_else(Utc::now);

    let config = CliConfig::load(args.config.as_deref())
        .context("failed to load configuration")?;
    let schedule = config.resolve_schedule(&args).validate()?;

    match args.command {
        Some(Command::Schedule(ref sched)) => {
            let slots = upcoming_slots(&schedule, now, sched.count)?;
            print!("{}", output::render_schedule(&schedule, &slots));
        }
        Some(Command::Tags(ref tags_args)) => run_tags(&config, &schedule, now, tags_args)?,
        None => run_tags(&config, &schedule, now, &TagsArgs::default())?,
    }

    Ok(())
}

fn run_tags(
    config: &CliConfig,
    schedule: &tiertag_core::ScheduleConfig,
    now: chrono::DateTime<Utc>,
    args: &TagsArgs,
) -> Result<()> {
    let scheme = config.tag_scheme()?;
    let evaluation = evaluate(now, schedule);
    for decision in evaluation.decisions() {
        info!(
            tier = %decision.tier,
            anchor = ?decision.anchor,
            matched = decision.matched,
            "tier decision"
        );
    }

    let mut tags = evaluation.format(&scheme)?;
    if args.matched_only {
        tags = output::matched_only(&evaluation, tags);
    }
    println!("{}", output::render_tags(args.format, &evaluation, &tags)?);
    Ok(())
}
