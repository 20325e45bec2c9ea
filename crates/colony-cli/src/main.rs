//! Colony CLI - headless scenario runner.
//!
//! - `colony run` - run a scenario and print the summary
//! - `colony check` - validate a scenario file
//! - `colony init` - write the built-in skirmish as a starting scenario

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use colony_sim::{ScenarioConfig, Simulation};

#[derive(Parser)]
#[command(name = "colony")]
#[command(about = "Deterministic creature AI simulation", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario
    Run {
        /// Scenario file; the built-in skirmish when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the scenario's tick count
        #[arg(long)]
        ticks: Option<u64>,

        /// Override the scenario's seed
        #[arg(long)]
        seed: Option<u64>,

        /// Write trace events as JSON lines
        #[arg(long)]
        trace_out: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a scenario file
    Check {
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Write the built-in skirmish scenario to a file
    Init {
        #[arg(default_value = "scenario.yaml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    if cli.json_logs {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).with_target(false).init();
    }

    match cli.command {
        Some(Commands::Run {
            config,
            ticks,
            seed,
            trace_out,
            json,
        }) => run_scenario(config.as_deref(), ticks, seed, trace_out.as_deref(), json),
        Some(Commands::Check { config }) => check_scenario(&config),
        Some(Commands::Init { path, force }) => init_scenario(&path, force),
        None => {
            println!("Colony - deterministic creature AI simulation");
            println!();
            println!("Usage: colony <COMMAND>");
            println!();
            println!("Commands:");
            println!("  run    Run a scenario");
            println!("  check  Validate a scenario file");
            println!("  init   Write the built-in skirmish scenario");
            println!();
            println!("Run 'colony --help' for more information.");
            Ok(())
        }
    }
}

fn run_scenario(
    path: Option<&Path>,
    ticks: Option<u64>,
    seed: Option<u64>,
    trace_out: Option<&Path>,
    json: bool,
) -> Result<()> {
    let mut config = match path {
        Some(path) => ScenarioConfig::load(path)?,
        None => ScenarioConfig::skirmish(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    let ticks = ticks.unwrap_or(config.ticks);

    let mut sim = Simulation::from_config(&config).context("Failed to set up scenario")?;
    let mut trace = match trace_out {
        Some(out) => {
            sim.enable_trace();
            let file = File::create(out)
                .with_context(|| format!("Failed to create {}", out.display()))?;
            Some(BufWriter::new(file))
        }
        None => None,
    };

    tracing::info!(ticks, seed = config.seed, "Starting run");
    for _ in 0..ticks {
        sim.tick();
        if let Some(out) = trace.as_mut() {
            write_trace(out, sim.take_trace())?;
        }
    }
    if let Some(mut out) = trace {
        out.flush()?;
    }

    let summary = sim.summary().clone();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Colony run");
        println!("==========");
        println!();
        println!("Ticks:              {}", summary.ticks);
        println!("Tasks completed:    {}", summary.tasks_completed);
        println!("Tasks failed:       {}", summary.tasks_failed);
        println!("Tasks canceled:     {}", summary.tasks_canceled);
        println!("Tasks dropped:      {}", summary.tasks_dropped);
        println!("Skeletons summoned: {}", summary.skeletons_summoned);
        println!("Deaths:             {}", summary.deaths);
        println!("Creatures alive:    {}", summary.creatures_alive);
    }
    Ok(())
}

fn write_trace(out: &mut impl Write, events: Vec<colony_trace::TraceEvent>) -> Result<()> {
    for event in &events {
        serde_json::to_writer(&mut *out, event)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

fn check_scenario(path: &Path) -> Result<()> {
    let config = ScenarioConfig::load(path)?;
    println!(
        "{}: ok ({} factions, {} kinds, {} creatures, {} voxels)",
        path.display(),
        config.factions.len(),
        config.kinds.len(),
        config.creatures.len(),
        config.voxels.len()
    );
    Ok(())
}

fn init_scenario(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let yaml = ScenarioConfig::skirmish().to_yaml()?;
    std::fs::write(path, format!("# Colony scenario\n\n{yaml}"))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote skirmish scenario to {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}", path.display());
    println!("  2. Run: colony run --config {}", path.display());
    Ok(())
}
