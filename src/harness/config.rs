//! Run configuration.

use crate::error::{HarnessError, HarnessResult};
use crate::reduction::{Implementation, Reducer, RemainderPolicy, Strategy, CHUNK_SIZE};

/// Everything a measurement run needs besides the vector contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Number of elements in each vector (default: 1_000_000)
    pub vector_len: usize,
    /// Number of timed reductions; the first half is warm-up (default: 10)
    pub iterations: usize,
    /// Reduction strategy (default: plain)
    pub strategy: Strategy,
    /// Source of the plain/unrolled kernels (default: rust)
    pub implementation: Implementation,
    /// Tail handling of the unrolled kernel (default: keep)
    pub remainder: RemainderPolicy,
    /// Chunk threshold and chunk size (default: 2^24)
    pub threshold: usize,
    /// Pin the thread to its current core while measuring (default: false)
    pub pin: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            vector_len: 1_000_000,
            iterations: 10,
            strategy: Strategy::default(),
            implementation: Implementation::default(),
            remainder: RemainderPolicy::default(),
            threshold: CHUNK_SIZE,
            pin: false,
        }
    }
}

impl HarnessConfig {
    /// Default configuration for `iterations` runs over `vector_len` elements.
    pub fn new(vector_len: usize, iterations: usize) -> Self {
        Self {
            vector_len,
            iterations,
            ..Self::default()
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Index of the first iteration that counts towards the average
    /// (`iterations / 2`, floored). Also the divisor of the average.
    pub fn warmup_cutoff(&self) -> usize {
        self.iterations / 2
    }

    /// Number of iterations whose time is accumulated.
    pub fn measured_iterations(&self) -> usize {
        self.iterations - self.warmup_cutoff()
    }

    /// Check the configuration before anything is allocated or timed.
    pub fn validate(&self) -> HarnessResult<()> {
        if self.warmup_cutoff() == 0 {
            return Err(HarnessError::InsufficientMeasurements {
                iterations: self.iterations,
            });
        }
        if self.threshold == 0 {
            return Err(HarnessError::InvalidThreshold);
        }
        Ok(())
    }

    /// Resolve the configured strategy to a reducer.
    pub fn reducer(&self) -> HarnessResult<Reducer> {
        if self.threshold == 0 {
            return Err(HarnessError::InvalidThreshold);
        }
        Reducer::new(
            self.strategy,
            self.implementation,
            self.remainder,
            self.threshold,
        )
        .ok_or_else(|| HarnessError::Unavailable {
            what: format!(
                "{} {} kernel ({:?} remainder)",
                self.implementation, self.strategy, self.remainder
            ),
        })
    }
}
