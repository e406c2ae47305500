//! Headless Scenario Runner
//!
//! Feeds a recorded sequence of world snapshots through the scheduler and
//! prints the commands issued each tick, followed by the match report.

use std::path::PathBuf;

use clap::Parser;
use megladon::core::config::BotConfig;
use megladon::core::error::Result;
use megladon::scheduler::ActionScheduler;
use megladon::world::snapshot::WorldSnapshot;
use serde::Serialize;
use tracing::level_filters::LevelFilter;

/// Headless Scenario Runner - replay snapshots through the bot
#[derive(Parser, Debug)]
#[command(name = "megladon")]
#[command(about = "Run recorded world snapshots through the decision core")]
struct Args {
    /// JSON file holding an array of world snapshots, one per tick
    #[arg(long)]
    scenario: PathBuf,

    /// TOML config overriding the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed, overrides the config value
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,

    /// Log every issued command
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize)]
struct TickOutput {
    tick: u64,
    commands: Vec<megladon::command::Command>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => BotConfig::load(path)?,
        None => BotConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let contents = std::fs::read_to_string(&args.scenario)?;
    let snapshots: Vec<WorldSnapshot> = serde_json::from_str(&contents)?;
    tracing::info!(
        scenario = %args.scenario.display(),
        ticks = snapshots.len(),
        seed = config.seed,
        "scenario loaded"
    );

    let mut scheduler = ActionScheduler::new(config)?;
    let mut outputs = Vec::with_capacity(snapshots.len());
    for snapshot in &snapshots {
        let commands = scheduler.step(snapshot);
        outputs.push(TickOutput {
            tick: snapshot.tick,
            commands,
        });
        if scheduler.is_finished() {
            break;
        }
    }
    let outcome = snapshots.last().and_then(|s| s.outcome);
    let report = scheduler.end_match(outcome);

    if args.format == "json" {
        let output = serde_json::json!({ "ticks": outputs, "report": report });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for output in &outputs {
            if output.commands.is_empty() {
                continue;
            }
            println!("tick {}:", output.tick);
            for command in &output.commands {
                println!("  {:?}", command);
            }
        }
        println!();
        println!("=== MATCH REPORT ===");
        println!("Outcome: {:?}", report.outcome);
        println!("Ticks seen: {}", report.ticks_seen);
        for (kind, count) in &report.issued {
            println!("  {:<10} {}", kind, count);
        }
        println!("Strikes drawn: {}", report.strikes.len());
        println!("Decisions logged: {}", report.decisions.len());
    }

    Ok(())
}
