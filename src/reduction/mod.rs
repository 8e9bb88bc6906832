//! # Reduction Engine
//!
//! The dot product computes the sum of products of corresponding elements
//! in two single-precision vectors:
//!
//! `dot(a, b) = Σ(a[i] * b[i])`
//!
//! ## Strategies
//!
//! - **plain**: one accumulator, one multiply-add per index
//! - **unrolled**: four products per loop step into one accumulator
//! - **blas**: an opaque vendor `sdot` call
//!
//! Plain and unrolled switch to a chunked reduction once the vector is
//! longer than the chunk threshold (2^24 by default), which keeps each
//! partial sum inside the range where `f32` still counts in unit steps.

pub mod code;
pub mod test;

pub use code::*;

use crate::error::VerificationError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::str::FromStr;

/// Reduction strategy requested by the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    #[default]
    Plain,
    Unrolled,
    Blas,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Plain, Strategy::Unrolled, Strategy::Blas];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Plain => "plain",
            Strategy::Unrolled => "unrolled",
            Strategy::Blas => "blas",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Strategy::Plain => "Naive accumulation, chunked above the threshold",
            Strategy::Unrolled => "Unrolled-by-4 accumulation, chunked above the threshold",
            Strategy::Blas => "Vendor BLAS sdot (portable reference when no BLAS is linked)",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| s.to_string())
    }
}

/// Language the plain and unrolled kernels are taken from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Implementation {
    #[default]
    Rust,
    /// Kernels compiled from C by the build script.
    C,
}

impl fmt::Display for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Implementation::Rust => "rust",
            Implementation::C => "c",
        })
    }
}

impl FromStr for Implementation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rust" => Ok(Implementation::Rust),
            "c" => Ok(Implementation::C),
            _ => Err(s.to_string()),
        }
    }
}

/// How a reduction of a given length is carried out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReductionPlan {
    /// Run the strategy's kernel over the whole vector.
    Direct,
    /// Run the kernel over sub-ranges of `chunk_size` and sum the partials.
    Chunked { chunk_size: usize },
    /// Hand the whole vector to the sdot routine.
    Vendor,
}

impl ReductionPlan {
    /// Select the plan for `strategy` over `len` elements.
    ///
    /// Plain and unrolled are chunked when `len` exceeds `threshold`, using
    /// the threshold as the chunk size. The blas strategy always calls the
    /// vendor routine directly.
    pub fn select(strategy: Strategy, len: usize, threshold: usize) -> Self {
        match strategy {
            Strategy::Blas => ReductionPlan::Vendor,
            Strategy::Plain | Strategy::Unrolled if len > threshold => ReductionPlan::Chunked {
                chunk_size: threshold,
            },
            Strategy::Plain | Strategy::Unrolled => ReductionPlan::Direct,
        }
    }
}

impl fmt::Display for ReductionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReductionPlan::Direct => f.write_str("direct"),
            ReductionPlan::Chunked { chunk_size } => write!(f, "chunked({})", chunk_size),
            ReductionPlan::Vendor => f.write_str("vendor"),
        }
    }
}

#[derive(Clone, Copy)]
enum Backend {
    Kernel(DotProductFn),
    Vendor(&'static dyn Sdot),
}

/// A resolved strategy: the kernel or sdot routine plus the chunk threshold.
#[derive(Clone, Copy)]
pub struct Reducer {
    strategy: Strategy,
    backend: Backend,
    threshold: usize,
}

impl Reducer {
    /// Resolve `strategy` to a concrete kernel.
    ///
    /// Returns `None` when the requested combination is not built into this
    /// binary: C kernels without a compatible C compiler at build time, or
    /// the truncating unrolled kernel in C.
    ///
    /// # Panics
    /// Panics if `threshold` is zero.
    pub fn new(
        strategy: Strategy,
        implementation: Implementation,
        remainder: RemainderPolicy,
        threshold: usize,
    ) -> Option<Self> {
        assert!(threshold > 0, "Chunk threshold must be positive");

        let backend = match strategy {
            Strategy::Blas => Backend::Vendor(default_sdot()),
            Strategy::Plain | Strategy::Unrolled => {
                Backend::Kernel(resolve_kernel(strategy, implementation, remainder)?)
            }
        };

        Some(Self {
            strategy,
            backend,
            threshold,
        })
    }

    /// Replace the sdot routine used by the blas strategy.
    pub fn with_sdot(mut self, sdot: &'static dyn Sdot) -> Self {
        if let Backend::Vendor(_) = self.backend {
            self.backend = Backend::Vendor(sdot);
        }
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Name of the sdot routine, if this reducer uses one.
    pub fn sdot_name(&self) -> Option<&'static str> {
        match self.backend {
            Backend::Vendor(sdot) => Some(sdot.name()),
            Backend::Kernel(_) => None,
        }
    }

    /// The plan `reduce` follows for vectors of `len` elements.
    pub fn plan(&self, len: usize) -> ReductionPlan {
        ReductionPlan::select(self.strategy, len, self.threshold)
    }

    /// Compute `a · b`.
    ///
    /// # Panics
    /// Panics if the vectors have different lengths.
    #[inline]
    pub fn reduce(&self, a: &[f32], b: &[f32]) -> f32 {
        match self.backend {
            Backend::Vendor(sdot) => sdot.sdot(a, b),
            Backend::Kernel(kernel) => match self.plan(a.len()) {
                ReductionPlan::Chunked { chunk_size } => dot_chunked(kernel, a, b, chunk_size),
                ReductionPlan::Direct | ReductionPlan::Vendor => kernel(a, b),
            },
        }
    }
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reducer")
            .field("strategy", &self.strategy)
            .field("sdot", &self.sdot_name())
            .field("threshold", &self.threshold)
            .finish()
    }
}

fn resolve_kernel(
    strategy: Strategy,
    implementation: Implementation,
    remainder: RemainderPolicy,
) -> Option<DotProductFn> {
    match (implementation, strategy) {
        (_, Strategy::Blas) => None,
        (Implementation::Rust, Strategy::Plain) => Some(dot_plain),
        (Implementation::Rust, Strategy::Unrolled) => Some(remainder.kernel()),
        #[cfg(c_implementation_active)]
        (Implementation::C, Strategy::Plain) => Some(dot_c_plain),
        #[cfg(c_implementation_active)]
        (Implementation::C, Strategy::Unrolled) => match remainder {
            RemainderPolicy::Keep => Some(dot_c_unrolled),
            RemainderPolicy::Drop => None,
        },
        #[cfg(not(c_implementation_active))]
        (Implementation::C, _) => None,
    }
}

/// Dot product with the default configuration for `strategy`: Rust
/// kernels, tail elements kept, 2^24 chunk threshold and the default sdot.
///
/// # Example
/// ```
/// use dot_bench::reduction::{reduce, Strategy};
///
/// let a = vec![1.0f32; 1000];
/// for strategy in Strategy::ALL {
///     assert_eq!(reduce(strategy, &a, &a), 1000.0);
/// }
/// ```
pub fn reduce(strategy: Strategy, a: &[f32], b: &[f32]) -> f32 {
    let kernel: DotProductFn = match strategy {
        Strategy::Plain => dot_plain,
        Strategy::Unrolled => dot_unrolled,
        Strategy::Blas => return default_sdot().sdot(a, b),
    };

    match ReductionPlan::select(strategy, a.len(), CHUNK_SIZE) {
        ReductionPlan::Chunked { chunk_size } => dot_chunked(kernel, a, b, chunk_size),
        ReductionPlan::Direct | ReductionPlan::Vendor => kernel(a, b),
    }
}

/// Relative error of `actual` against `expected`, in f64.
///
/// Falls back to the absolute error when `expected` is zero.
pub fn relative_error(actual: f32, expected: f64) -> f64 {
    let diff = (actual as f64 - expected).abs();
    if expected == 0.0 {
        diff
    } else {
        diff / expected.abs()
    }
}

/// Seed used by [`verify`].
pub const VERIFY_SEED: u64 = 0x5d07_2024;

/// Verify every built-in variant against `plain` on seeded random inputs.
///
/// Uses a non-aligned length so the unrolled tail paths are exercised.
pub fn verify() -> Result<(), VerificationError> {
    verify_with_seed(1023, VERIFY_SEED)
}

/// [`verify`] with an explicit length and RNG seed.
///
/// The tolerance scales with `Σ|a[i] * b[i]|`, which bounds how far
/// reordering the accumulation can move the result.
pub fn verify_with_seed(len: usize, seed: u64) -> Result<(), VerificationError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let a: Vec<f32> = (0..len).map(|_| rng.random_range(-1.0..1.0)).collect();
    let b: Vec<f32> = (0..len).map(|_| rng.random_range(-1.0..1.0)).collect();

    let variants = available_variants();
    let reference = variants
        .iter()
        .find(|v| v.name == "plain")
        .ok_or(VerificationError::MissingReference)?;

    let expected = (reference.function)(&a, &b);
    let magnitude: f32 = a.iter().zip(&b).map(|(x, y)| (x * y).abs()).sum();
    let tolerance = 1e-4 * magnitude.max(1.0);

    for variant in variants.iter().filter(|v| v.name != reference.name) {
        let actual = (variant.function)(&a, &b);
        if (actual - expected).abs() > tolerance {
            return Err(VerificationError::ToleranceExceeded {
                variant: variant.name,
                len,
                seed,
                expected,
                actual,
                tolerance,
            });
        }
    }

    Ok(())
}
