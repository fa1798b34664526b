//! # KEEL Simulation Runner
//!
//! Runs the sample simulation headless and logs frame times and storage use.
//!
//! ```bash
//! # Defaults
//! keel
//!
//! # Settings from a file, with per-notification tracing
//! RUST_LOG=keel_core=trace keel crates/keel/keel.toml
//! ```

use std::time::Instant;

use anyhow::{Context, Result};
use keel::{Simulation, SimulationConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file {path}"))?;
            SimulationConfig::from_toml_str(&source)
                .with_context(|| format!("invalid config file {path}"))?
        }
        None => SimulationConfig::default(),
    };

    tracing::info!("KEEL v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        entities = config.entities,
        frames = config.frames,
        tick_rate = config.tick_rate,
        "starting simulation"
    );

    let mut simulation = Simulation::new(&config);
    simulation.populate(config.entities);

    let start = Instant::now();
    simulation.run(config.frames);
    let elapsed = start.elapsed();

    #[allow(clippy::cast_precision_loss)]
    let per_frame = elapsed.as_secs_f64() * 1_000.0 / config.frames.max(1) as f64;
    tracing::info!(
        frames = simulation.frame(),
        total_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        per_frame_ms = per_frame,
        "simulation finished"
    );
    simulation.report();

    Ok(())
}
