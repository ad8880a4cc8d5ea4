//! Native viewer: random sensor, rolling plots, start/stop and pause controls.
//!
//! ```bash
//! cargo run                      # defaults
//! cargo run -- stream.yaml       # YAML config, see `StreamConfig`
//! RUST_LOG=debug cargo run       # also log dropped samples
//! ```

use sensorstream::{run_sensorstream, RandomSource, StreamConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading config from {path}");
            StreamConfig::load(&path)?
        }
        None => StreamConfig::default(),
    };
    let source = RandomSource::from_config(&cfg)?;

    if let Err(e) = run_sensorstream(cfg, source) {
        log::error!("UI error: {e}");
        return Err(e.to_string().into());
    }
    Ok(())
}
