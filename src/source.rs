//! Sample sources: anything that can hand out the next raw reading on demand.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::StreamConfig;
use crate::error::{ConfigError, SourceError};

/// A sensor, or anything standing in for one.
///
/// `next_sample` is only ever called from the producer thread, one call at a
/// time, so implementations need `Send` but not `Sync`.
pub trait SampleSource: Send {
    /// Read the next raw value. A failure skips one producer iteration.
    fn next_sample(&mut self) -> Result<f64, SourceError>;
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn next_sample(&mut self) -> Result<f64, SourceError> {
        (**self).next_sample()
    }
}

/// Uniformly random integers in an inclusive range, emulating a noisy sensor.
pub struct RandomSource {
    rng: StdRng,
    min: i64,
    max: i64,
}

impl RandomSource {
    pub fn new(min: i64, max: i64) -> Result<Self, ConfigError> {
        Self::with_rng(StdRng::from_entropy(), min, max)
    }

    /// Deterministic variant for reproducible runs.
    pub fn seeded(seed: u64, min: i64, max: i64) -> Result<Self, ConfigError> {
        Self::with_rng(StdRng::seed_from_u64(seed), min, max)
    }

    pub fn from_config(cfg: &StreamConfig) -> Result<Self, ConfigError> {
        Self::new(cfg.source_min, cfg.source_max)
    }

    fn with_rng(rng: StdRng, min: i64, max: i64) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::EmptySourceRange { min, max });
        }
        Ok(Self { rng, min, max })
    }
}

impl SampleSource for RandomSource {
    fn next_sample(&mut self) -> Result<f64, SourceError> {
        Ok(self.rng.gen_range(self.min..=self.max) as f64)
    }
}

/// Replays a fixed list of readings, then reports [`SourceError::Exhausted`].
///
/// Individual entries may be errors to simulate failed reads.
#[derive(Debug, Default)]
pub struct ReplaySource {
    queue: VecDeque<Result<f64, SourceError>>,
}

impl ReplaySource {
    pub fn new<I: IntoIterator<Item = f64>>(values: I) -> Self {
        Self {
            queue: values.into_iter().map(Ok).collect(),
        }
    }

    pub fn from_results<I: IntoIterator<Item = Result<f64, SourceError>>>(results: I) -> Self {
        Self {
            queue: results.into_iter().collect(),
        }
    }
}

impl SampleSource for ReplaySource {
    fn next_sample(&mut self) -> Result<f64, SourceError> {
        self.queue.pop_front().unwrap_or(Err(SourceError::Exhausted))
    }
}

/// Adapter turning a closure into a [`SampleSource`].
pub struct FnSource<F>(pub F);

impl<F> SampleSource for FnSource<F>
where
    F: FnMut() -> Result<f64, SourceError> + Send,
{
    fn next_sample(&mut self) -> Result<f64, SourceError> {
        (self.0)()
    }
}
