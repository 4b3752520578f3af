//! Headless Flux Grid runner (default binary).
//!
//! Plays a seeded game with the best-placement heuristic and prints a JSON
//! summary on stdout. Logs go to stderr.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::prelude::*;

use flux_grid::autoplay::{run, RunConfig};

const USAGE: &str = "\
usage: flux-grid [options]

  --seed N         RNG seed (FLUX_GRID_SEED)
  --mode MODE      career | endless (FLUX_GRID_MODE)
  --level N        career level to start at (FLUX_GRID_LEVEL)
  --max-turns N    stop after N placements (FLUX_GRID_MAX_TURNS)
  --rules PATH     JSON rules overrides (FLUX_GRID_RULES)
  --save PATH      write the final snapshot as JSON (FLUX_GRID_SAVE)
  --passive NAME   equip flux_boost | score_multiplier | ice_breaker
  --no-skills      never spend flux to get unstuck
  -v, --verbose    more logging, repeatable (FLUX_GRID_LOG=info|debug|trace)
";

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print!("{}", USAGE);
        return Ok(());
    }

    let config = RunConfig::from_env().apply_args(&args)?;
    init_tracing(config.verbosity);
    info!(seed = config.seed, mode = config.mode.as_str(), "starting autoplay");

    let (summary, _state) = run(&config)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
