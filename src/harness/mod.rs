//! # Measurement Harness
//!
//! Repeatedly times one reduction over a fixed pair of vectors:
//!
//! 1. validate the configuration (at least 2 iterations)
//! 2. allocate and fill both vectors once
//! 3. time every call with `Instant` (monotonic)
//! 4. accumulate elapsed times from iteration `iterations / 2` onwards
//! 5. report each sample and the averaged bandwidth and FLOP rate
//!
//! Everything is single-threaded and blocking.

pub mod config;
pub mod fixture;
pub mod metrics;
pub mod report;

pub use config::HarnessConfig;
pub use fixture::{Fixture, Operands};
pub use metrics::{bandwidth_gbs, flop_rate, RunStatistics, Sample, WarmupAverager, GIB};
pub use report::{CsvRecorder, SampleSink, TextReport};

use crate::error::{HarnessError, HarnessResult};
use crate::reduction::{chunk_count, relative_error, Reducer, ReductionPlan};
use crate::utils::CpuPinGuard;
use std::hint::black_box;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Allocate the vectors from `fixture` and run the measurement loop.
///
/// Nothing is allocated when the configuration is invalid.
pub fn run<S: SampleSink + ?Sized>(
    config: &HarnessConfig,
    fixture: &Fixture,
    sink: &mut S,
) -> HarnessResult<RunStatistics> {
    config.validate()?;
    let reducer = config.reducer()?;

    debug!(len = config.vector_len, ?fixture, "allocating operands");
    let operands = Operands::allocate(config.vector_len, fixture)?;

    measure(config, &reducer, &operands, fixture.expected_dot(config.vector_len), sink)
}

/// Run the measurement loop over caller-supplied vectors.
pub fn run_on<S: SampleSink + ?Sized>(
    config: &HarnessConfig,
    operands: &Operands,
    sink: &mut S,
) -> HarnessResult<RunStatistics> {
    config.validate()?;
    let reducer = config.reducer()?;
    run_with_reducer(config, &reducer, operands, sink)
}

/// Run the measurement loop with an explicit reducer.
///
/// `config.vector_len` must match the operands; the strategy fields of
/// `config` are ignored in favour of `reducer`.
pub fn run_with_reducer<S: SampleSink + ?Sized>(
    config: &HarnessConfig,
    reducer: &Reducer,
    operands: &Operands,
    sink: &mut S,
) -> HarnessResult<RunStatistics> {
    measure(config, reducer, operands, None, sink)
}

/// The timed loop. `expected` is the exact result, when the fixture knows it.
fn measure<S: SampleSink + ?Sized>(
    config: &HarnessConfig,
    reducer: &Reducer,
    operands: &Operands,
    expected: Option<f64>,
    sink: &mut S,
) -> HarnessResult<RunStatistics> {
    if operands.len() != config.vector_len {
        return Err(HarnessError::LengthMismatch {
            left: config.vector_len,
            right: operands.len(),
        });
    }

    let len = operands.len();
    let mut averager = WarmupAverager::new(config.iterations)?;

    let plan = reducer.plan(len);
    let chunks = match plan {
        ReductionPlan::Chunked { chunk_size } => chunk_count(len, chunk_size),
        ReductionPlan::Direct | ReductionPlan::Vendor => 1,
    };
    debug!(
        strategy = %reducer.strategy(),
        %plan,
        chunks,
        sdot = reducer.sdot_name().unwrap_or("-"),
        len,
        iterations = config.iterations,
        measured = config.measured_iterations(),
        "starting measurement"
    );

    let pin = config.pin.then(CpuPinGuard::new);
    match pin.as_ref() {
        Some(guard) if guard.is_pinned() => debug!(core = guard.core_id(), "thread pinned"),
        Some(_) => warn!("could not pin thread, measuring unpinned"),
        None => {}
    }

    sink.begin(len, config.iterations)?;

    let mut last_result = None;
    for index in 0..config.iterations {
        let start = Instant::now();
        let result = black_box(reducer.reduce(black_box(operands.a()), black_box(operands.b())));
        let elapsed_secs = start.elapsed().as_secs_f64();

        let measured = averager.record(index, elapsed_secs);
        sink.sample(&Sample::new(index, len, elapsed_secs, result, measured))?;
        last_result = Some(result);
    }

    if let (Some(expected), Some(result)) = (expected, last_result) {
        debug!(
            expected,
            result,
            relative_error = relative_error(result, expected),
            "result against exact value"
        );
    }

    let stats = averager.finish(len);
    sink.summary(&stats)?;

    info!(
        strategy = %reducer.strategy(),
        len,
        average_secs = stats.average_secs,
        bandwidth_gbs = stats.average_bandwidth_gbs,
        "run complete"
    );

    Ok(stats)
}
