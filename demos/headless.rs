//! Example: run the pipeline without a window
//!
//! What it demonstrates
//! - Building a `Pipeline` with a `JsonLinesPresenter` writing to stdout.
//! - Draining the channel from the main thread with `pump_timeout`.
//! - Pausing forwarding (samples are dropped, not queued) and restarting
//!   the producer after a stop.
//!
//! How to run
//! ```bash
//! cargo run --example headless --no-default-features
//! ```
//! Each published window is printed as one JSON array per line.

use std::io;
use std::time::{Duration, Instant};

use sensorstream::{JsonLinesPresenter, Pipeline, RandomSource, StreamConfig};

fn run_for(pipeline: &mut Pipeline, d: Duration) {
    let deadline = Instant::now() + d;
    while Instant::now() < deadline {
        pipeline.pump_timeout(Duration::from_millis(50));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cfg = StreamConfig {
        history_capacity: 5,
        sample_interval_ms: 100,
        ..StreamConfig::default()
    };
    let source = RandomSource::from_config(&cfg)?;
    let mut pipeline = Pipeline::start(&cfg, source, JsonLinesPresenter::new(io::stdout()))?;

    run_for(&mut pipeline, Duration::from_secs(1));

    log::info!("pausing forwarding for one second");
    pipeline.set_forwarding(false);
    run_for(&mut pipeline, Duration::from_secs(1));
    pipeline.set_forwarding(true);

    log::info!("stopping and restarting the producer");
    pipeline.set_sampling(false)?;
    run_for(&mut pipeline, Duration::from_millis(500));
    pipeline.set_sampling(true)?;
    run_for(&mut pipeline, Duration::from_secs(1));

    let reason = pipeline.shutdown();
    let stats = pipeline.stats();
    log::info!(
        "done: {} accepted, {} dropped, {} producer launches, last producer {:?}",
        stats.accepted,
        stats.dropped,
        pipeline.launches(),
        reason
    );
    Ok(())
}
