//! Throughput metrics and the warm-up/averaging protocol.

use crate::error::{HarnessError, HarnessResult};

/// Bytes per gigabyte as the reports count them (2^30).
pub const GIB: f64 = 1_073_741_824.0;

/// Two `f32` loads per element pair.
pub const BYTES_PER_ELEMENT: f64 = (2 * std::mem::size_of::<f32>()) as f64;

/// One multiply and one add per element pair.
pub const FLOPS_PER_ELEMENT: f64 = 2.0;

/// Achieved bandwidth in GB/s for one reduction of `len` element pairs.
pub fn bandwidth_gbs(len: usize, elapsed_secs: f64) -> f64 {
    (len as f64 * BYTES_PER_ELEMENT / GIB) / elapsed_secs
}

/// Achieved FLOP rate for one reduction of `len` element pairs.
pub fn flop_rate(len: usize, elapsed_secs: f64) -> f64 {
    len as f64 * FLOPS_PER_ELEMENT / elapsed_secs
}

/// One timed reduction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub index: usize,
    pub elapsed_secs: f64,
    pub result: f32,
    pub bandwidth_gbs: f64,
    pub flops: f64,
    /// Whether the sample counts towards the average.
    pub measured: bool,
}

impl Sample {
    pub fn new(index: usize, len: usize, elapsed_secs: f64, result: f32, measured: bool) -> Self {
        Self {
            index,
            elapsed_secs,
            result,
            bandwidth_gbs: bandwidth_gbs(len, elapsed_secs),
            flops: flop_rate(len, elapsed_secs),
            measured,
        }
    }
}

/// Averages over the second half of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunStatistics {
    pub vector_len: usize,
    pub iterations: usize,
    /// Samples whose time was accumulated (`iterations - iterations / 2`).
    pub measured: usize,
    pub cumulative_secs: f64,
    /// `cumulative_secs / (iterations / 2)`.
    pub average_secs: f64,
    pub average_bandwidth_gbs: f64,
    pub average_flops: f64,
}

/// Accumulates elapsed times from `iterations / 2` onwards.
///
/// The divisor of the average is `iterations / 2` as well, so for an odd
/// iteration count one more sample is accumulated than divided by.
#[derive(Clone, Debug)]
pub struct WarmupAverager {
    iterations: usize,
    cutoff: usize,
    cumulative_secs: f64,
    measured: usize,
}

impl WarmupAverager {
    /// Fails when `iterations / 2` is zero: the average would divide by zero.
    pub fn new(iterations: usize) -> HarnessResult<Self> {
        let cutoff = iterations / 2;
        if cutoff == 0 {
            return Err(HarnessError::InsufficientMeasurements { iterations });
        }
        Ok(Self {
            iterations,
            cutoff,
            cumulative_secs: 0.0,
            measured: 0,
        })
    }

    pub fn is_measured(&self, index: usize) -> bool {
        index >= self.cutoff
    }

    /// Record the elapsed time of iteration `index`; returns whether it was
    /// accumulated.
    pub fn record(&mut self, index: usize, elapsed_secs: f64) -> bool {
        let measured = self.is_measured(index);
        if measured {
            self.cumulative_secs += elapsed_secs;
            self.measured += 1;
        }
        measured
    }

    pub fn finish(self, vector_len: usize) -> RunStatistics {
        let average_secs = self.cumulative_secs / self.cutoff as f64;
        RunStatistics {
            vector_len,
            iterations: self.iterations,
            measured: self.measured,
            cumulative_secs: self.cumulative_secs,
            average_secs,
            average_bandwidth_gbs: bandwidth_gbs(vector_len, average_secs),
            average_flops: flop_rate(vector_len, average_secs),
        }
    }
}
