//! Report output: the per-iteration text lines and CSV export.

use super::config::HarnessConfig;
use super::metrics::{RunStatistics, Sample};
use crate::reduction::Implementation;
use std::io::{self, Write};
use std::path::Path;

/// Receives the events of a measurement run.
pub trait SampleSink {
    /// Called once before the first iteration.
    fn begin(&mut self, _vector_len: usize, _iterations: usize) -> io::Result<()> {
        Ok(())
    }

    /// Called after every timed iteration, warm-up included.
    fn sample(&mut self, sample: &Sample) -> io::Result<()>;

    /// Called once after the last iteration.
    fn summary(&mut self, stats: &RunStatistics) -> io::Result<()>;
}

impl<S: SampleSink + ?Sized> SampleSink for &mut S {
    fn begin(&mut self, vector_len: usize, iterations: usize) -> io::Result<()> {
        (**self).begin(vector_len, iterations)
    }

    fn sample(&mut self, sample: &Sample) -> io::Result<()> {
        (**self).sample(sample)
    }

    fn summary(&mut self, stats: &RunStatistics) -> io::Result<()> {
        (**self).summary(stats)
    }
}

/// Forward every event to both sinks, first then second.
impl<A: SampleSink, B: SampleSink> SampleSink for (A, B) {
    fn begin(&mut self, vector_len: usize, iterations: usize) -> io::Result<()> {
        self.0.begin(vector_len, iterations)?;
        self.1.begin(vector_len, iterations)
    }

    fn sample(&mut self, sample: &Sample) -> io::Result<()> {
        self.0.sample(sample)?;
        self.1.sample(sample)
    }

    fn summary(&mut self, stats: &RunStatistics) -> io::Result<()> {
        self.0.summary(stats)?;
        self.1.summary(stats)
    }
}

pub fn format_header(vector_len: usize, iterations: usize) -> String {
    format!(
        "Vector size: {} with {} measurements.",
        vector_len, iterations
    )
}

/// `R: <result> <T>: <sec> sec B: <GB/s> GB/sec F: <FLOP/s> FLOP/sec`
///
/// The result is truncated toward zero.
pub fn format_sample(sample: &Sample) -> String {
    format!(
        "R: {} <T>: {:.6} sec B: {:.3} GB/sec F: {:.3} FLOP/sec",
        sample.result as i64, sample.elapsed_secs, sample.bandwidth_gbs, sample.flops
    )
}

/// `N: <len> <T>: <avg sec> sec B: <GB/s> GB/sec F: <FLOP/s> FLOP/sec`
pub fn format_summary(stats: &RunStatistics) -> String {
    format!(
        "N: {} <T>: {:.6} sec B: {:.3} GB/sec F: {:.3} FLOP/sec",
        stats.vector_len, stats.average_secs, stats.average_bandwidth_gbs, stats.average_flops
    )
}

/// Writes the header, one line per iteration and the summary line.
pub struct TextReport<W: Write> {
    out: W,
}

impl<W: Write> TextReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SampleSink for TextReport<W> {
    fn begin(&mut self, vector_len: usize, iterations: usize) -> io::Result<()> {
        writeln!(self.out, "{}", format_header(vector_len, iterations))
    }

    fn sample(&mut self, sample: &Sample) -> io::Result<()> {
        writeln!(self.out, "{}", format_sample(sample))
    }

    fn summary(&mut self, stats: &RunStatistics) -> io::Result<()> {
        writeln!(self.out, "{}", format_summary(stats))?;
        self.out.flush()
    }
}

/// Raw timing data for a single iteration (used for CSV export)
struct CsvRow {
    iteration: usize,
    measured: bool,
    elapsed_secs: f64,
    bandwidth_gbs: f64,
    flops: f64,
    result: f32,
}

/// Collects every sample of a run for CSV export.
pub struct CsvRecorder {
    strategy: String,
    implementation: String,
    compiler: &'static str,
    vector_len: usize,
    rows: Vec<CsvRow>,
}

impl CsvRecorder {
    pub fn new(config: &HarnessConfig) -> Self {
        let compiler = match config.implementation {
            Implementation::C => crate::utils::C_COMPILER_NAME.unwrap_or("Unknown"),
            Implementation::Rust => "",
        };

        Self {
            strategy: config.strategy.to_string(),
            implementation: config.implementation.to_string(),
            compiler,
            vector_len: config.vector_len,
            rows: Vec::with_capacity(config.iterations),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the collected rows as CSV.
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(
            out,
            "strategy,implementation,compiler,vector_size,iteration,measured,elapsed_sec,bandwidth_gbs,flops,result"
        )?;

        for row in &self.rows {
            writeln!(
                out,
                "{},{},{},{},{},{},{:.9},{:.6},{:.3},{}",
                self.strategy,
                self.implementation,
                self.compiler,
                self.vector_len,
                row.iteration,
                row.measured,
                row.elapsed_secs,
                row.bandwidth_gbs,
                row.flops,
                row.result
            )?;
        }

        out.flush()
    }

    /// Export the collected rows to a CSV file.
    pub fn export(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_to(io::BufWriter::new(file))
    }
}

impl SampleSink for CsvRecorder {
    fn begin(&mut self, vector_len: usize, _iterations: usize) -> io::Result<()> {
        self.vector_len = vector_len;
        self.rows.clear();
        Ok(())
    }

    fn sample(&mut self, sample: &Sample) -> io::Result<()> {
        self.rows.push(CsvRow {
            iteration: sample.index,
            measured: sample.measured,
            elapsed_secs: sample.elapsed_secs,
            bandwidth_gbs: sample.bandwidth_gbs,
            flops: sample.flops,
            result: sample.result,
        });
        Ok(())
    }

    fn summary(&mut self, _stats: &RunStatistics) -> io::Result<()> {
        Ok(())
    }
}
