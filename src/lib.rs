//! # dot-bench
//!
//! Measures the memory bandwidth and FLOP rate of a single-precision dot
//! product under three accumulation strategies (plain, unrolled by four,
//! vendor `sdot`), with chunked reduction for very long vectors.

pub mod cli;
pub mod error;
pub mod harness;
pub mod reduction;
pub mod utils;

/// Re-export tui from utils for the binary
pub use utils::tui;

/// Re-export commonly used items
pub mod prelude {
    pub use crate::error::{HarnessError, HarnessResult, VerificationError};
    pub use crate::harness::{run, Fixture, HarnessConfig, RunStatistics, Sample, SampleSink};
    pub use crate::reduction::{reduce, Implementation, Reducer, ReductionPlan, RemainderPolicy, Strategy};
}
