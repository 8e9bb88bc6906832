//! Unrolled-by-4 dot product kernels.
//!
//! Four indices are processed per loop step: their products are summed
//! first and the partial is added to a single accumulator. Compared to the
//! plain kernel this only changes the grouping of each group of four terms,
//! so results agree to within a few ulps.

/// What to do with the `len % 4` elements that do not fill a full step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RemainderPolicy {
    /// Fold the trailing elements into the accumulator one at a time.
    #[default]
    Keep,
    /// Ignore the trailing elements. Legacy behaviour, kept for comparison runs.
    Drop,
}

impl RemainderPolicy {
    /// Kernel implementing this policy.
    pub fn kernel(self) -> fn(&[f32], &[f32]) -> f32 {
        match self {
            RemainderPolicy::Keep => dot_unrolled,
            RemainderPolicy::Drop => dot_unrolled_truncating,
        }
    }
}

/// Compute the dot product with 4x loop unrolling and a single accumulator.
///
/// Trailing elements that do not fill a group of four are added after the
/// unrolled loop.
///
/// # Panics
/// Panics if the vectors have different lengths.
pub fn dot_unrolled(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vectors must have the same length");

    let mut a4 = a.chunks_exact(4);
    let mut b4 = b.chunks_exact(4);
    let mut acc = unrolled_body(a4.by_ref(), b4.by_ref());

    for (x, y) in a4.remainder().iter().zip(b4.remainder()) {
        acc += x * y;
    }

    acc
}

/// Unrolled kernel that drops the `len % 4` trailing elements.
///
/// Only lengths that are a multiple of 4 produce the true dot product;
/// for any other length the result is short by the tail's contribution.
///
/// # Panics
/// Panics if the vectors have different lengths.
pub fn dot_unrolled_truncating(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vectors must have the same length");

    unrolled_body(a.chunks_exact(4), b.chunks_exact(4))
}

#[inline(always)]
fn unrolled_body<'a>(
    a4: impl Iterator<Item = &'a [f32]>,
    b4: impl Iterator<Item = &'a [f32]>,
) -> f32 {
    let mut acc = 0.0f32;
    for (x, y) in a4.zip(b4) {
        acc += x[0] * y[0] + x[1] * y[1] + x[2] * y[2] + x[3] * y[3];
    }
    acc
}
