//! Chunked reduction for long vectors.
//!
//! A single-precision accumulator stops absorbing unit increments once it
//! reaches 2^24: `16_777_216.0 + 1.0 == 16_777_216.0`. Reducing at most
//! 2^24 terms per partial sum and adding the partials keeps every partial
//! below that limit, so rounding error no longer grows with the vector
//! length.

use super::DotProductFn;

/// Largest number of terms reduced into one partial sum (2^24).
///
/// Every integer up to this value is exactly representable in `f32`.
pub const CHUNK_SIZE: usize = 1 << 24;

/// Reduce `a · b` in sub-ranges of at most `chunk_size` elements.
///
/// Each sub-range is reduced independently with `kernel` and the partial
/// results are summed left to right into the final accumulator.
///
/// # Panics
/// Panics if the vectors have different lengths or `chunk_size` is zero.
///
/// # Example
/// ```
/// use dot_bench::reduction::{dot_chunked, dot_plain};
///
/// let a = vec![1.0f32; 10];
/// let b = vec![2.0f32; 10];
/// assert_eq!(dot_chunked(dot_plain, &a, &b, 3), 20.0);
/// ```
pub fn dot_chunked(kernel: DotProductFn, a: &[f32], b: &[f32], chunk_size: usize) -> f32 {
    assert_eq!(a.len(), b.len(), "Vectors must have the same length");
    assert!(chunk_size > 0, "Chunk size must be positive");

    a.chunks(chunk_size)
        .zip(b.chunks(chunk_size))
        .fold(0.0f32, |acc, (x, y)| acc + kernel(x, y))
}

/// Number of partial sums `dot_chunked` produces for `len` elements.
pub fn chunk_count(len: usize, chunk_size: usize) -> usize {
    len.div_ceil(chunk_size.max(1))
}
