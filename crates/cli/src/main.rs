//! Cache hierarchy simulator CLI.
//!
//! This binary replays a memory trace against a cache hierarchy and prints
//! the final state. It performs:
//! 1. **Configuration:** From the classic positional geometry list or a JSON file.
//! 2. **Replay:** Every record of the trace, in order, through L1.
//! 3. **Report:** Configuration, contents, stream buffers, and measurements (or JSON).

mod args;
mod report;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cachesim_core::Simulator;
use cachesim_core::common::SimResult;
use cachesim_core::config::HierarchyConfig;

use crate::args::Geometry;

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Trace-driven set-associative cache hierarchy simulator",
    long_about = "Replay a memory trace (one `r|w <hex address>` per line) through L1, \
                  an optional L2, and stream-buffer prefetchers on the last level.\n\n\
                  Examples:\n  \
                  cachesim 32 1024 2 8192 4 3 10 traces/gcc.t\n  \
                  cachesim 16 1024 1 0 0 0 0 traces/perl.t\n  \
                  cachesim --config hierarchy.json traces/gcc.t --json\n\n\
                  Set RUST_LOG=debug (or trace) to follow evictions and accesses on stderr."
)]
struct Cli {
    /// Hierarchy configuration (JSON); replaces the geometry arguments.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the measurements as JSON instead of the text report.
    #[arg(long)]
    json: bool,

    /// BLOCKSIZE L1_SIZE L1_ASSOC L2_SIZE L2_ASSOC PREF_N PREF_M TRACE_FILE,
    /// or only TRACE_FILE together with --config.
    #[arg(value_name = "ARGS", required = true, num_args = 1..=8)]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let (config, trace) = resolve(&cli).unwrap_or_else(|msg| {
        Cli::command().error(ErrorKind::InvalidValue, msg).exit()
    });

    if let Err(e) = run(&config, &trace, cli.json) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Splits the positional arguments into a hierarchy configuration and the trace path.
fn resolve(cli: &Cli) -> Result<(HierarchyConfig, PathBuf), String> {
    let Some((trace, geometry)) = cli.args.split_last() else {
        return Err("missing TRACE_FILE".to_owned());
    };

    let config = match (&cli.config, geometry) {
        (Some(path), []) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            HierarchyConfig::from_json(&text)
                .map_err(|e| format!("invalid configuration {}: {e}", path.display()))?
        }
        (Some(_), _) => {
            return Err("geometry arguments cannot be combined with --config".to_owned());
        }
        (None, geometry) => Geometry::parse(geometry)?.to_config(),
    };
    Ok((config, PathBuf::from(trace)))
}

/// Builds the hierarchy, replays the trace, and prints the report.
fn run(config: &HierarchyConfig, trace: &std::path::Path, json: bool) -> SimResult<()> {
    let mut sim = Simulator::from_config(config)?;
    info!(
        "simulating {} level(s): {}",
        config.levels.len(),
        config
            .levels
            .iter()
            .map(|level| level.name.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    );
    let _ = sim.replay_file(trace)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        report::json(&mut out, config, &sim.hierarchy, sim.records())?;
    } else {
        report::configuration(&mut out, config, trace)?;
        report::contents(&mut out, &sim.hierarchy)?;
        report::measurements(&mut out, &sim.hierarchy)?;
    }
    out.flush()?;
    Ok(())
}
