//! Benchmark input vectors.

use crate::error::{HarnessError, HarnessResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// How the two input vectors are filled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fixture {
    /// Every element of both vectors set to the same value.
    Constant(f32),
    /// Uniform values in [-1.0, 1.0) from a seeded RNG; A is drawn before B.
    Random { seed: u64 },
}

impl Default for Fixture {
    fn default() -> Self {
        Fixture::Constant(1.0)
    }
}

impl Fixture {
    /// Exact dot product of the filled vectors, when it is known in closed form.
    pub fn expected_dot(&self, len: usize) -> Option<f64> {
        match *self {
            Fixture::Constant(value) => Some(len as f64 * value as f64 * value as f64),
            Fixture::Random { .. } => None,
        }
    }
}

/// The pair of equal-length vectors a run reduces.
#[derive(Clone, Debug, PartialEq)]
pub struct Operands {
    a: Vec<f32>,
    b: Vec<f32>,
}

impl Operands {
    /// Wrap caller-supplied vectors.
    pub fn new(a: Vec<f32>, b: Vec<f32>) -> HarnessResult<Self> {
        if a.len() != b.len() {
            return Err(HarnessError::LengthMismatch {
                left: a.len(),
                right: b.len(),
            });
        }
        Ok(Self { a, b })
    }

    /// Allocate both vectors and fill them from `fixture`.
    ///
    /// Allocation failure is reported instead of aborting the process.
    pub fn allocate(len: usize, fixture: &Fixture) -> HarnessResult<Self> {
        let mut a = try_alloc(len)?;
        let mut b = try_alloc(len)?;

        match *fixture {
            Fixture::Constant(value) => {
                a.resize(len, value);
                b.resize(len, value);
            }
            Fixture::Random { seed } => {
                let mut rng = StdRng::seed_from_u64(seed);
                a.extend((0..len).map(|_| rng.random_range(-1.0f32..1.0)));
                b.extend((0..len).map(|_| rng.random_range(-1.0f32..1.0)));
            }
        }

        Ok(Self { a, b })
    }

    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    pub fn a(&self) -> &[f32] {
        &self.a
    }

    pub fn b(&self) -> &[f32] {
        &self.b
    }
}

fn try_alloc(len: usize) -> HarnessResult<Vec<f32>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| HarnessError::Allocation { len })?;
    Ok(v)
}
