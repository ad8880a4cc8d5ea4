//! Example: native window fed by a flaky sensor
//!
//! What it demonstrates
//! - Plugging a custom closure into `run_sensorstream` via `FnSource`.
//! - Read failures being skipped, and the producer giving up after too many
//!   in a row (tick "Start/Stop Sensor Thread" again to relaunch it).
//!
//! How to run
//! ```bash
//! cargo run --example live_window
//! ```

use rand::Rng;
use sensorstream::{run_sensorstream, FnSource, SourceError, StreamConfig};

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cfg = StreamConfig {
        title: "Flaky Sensor".to_string(),
        history_capacity: 40,
        sample_interval_ms: 100,
        max_consecutive_failures: Some(3),
        ..StreamConfig::default()
    };

    // Slow sine with noise; roughly one read in five fails.
    let mut n: u64 = 0;
    let source = FnSource(move || {
        let mut rng = rand::thread_rng();
        n += 1;
        if rng.gen_bool(0.2) {
            return Err(SourceError::Read(format!("checksum mismatch on read {n}")));
        }
        let t = n as f64 * 0.15;
        Ok(5.0 + 4.0 * t.sin() + rng.gen_range(-1.0..1.0))
    });

    run_sensorstream(cfg, source)
}
