//! Plain (reference) dot product kernel.
//!
//! One accumulator, one multiply-add per index, strict left-to-right order.
//! This is the baseline every other kernel is checked against, and the one
//! most exposed to single-precision accumulation error for long vectors.

/// Compute the dot product of two vectors with a single accumulator.
///
/// # Panics
/// Panics if the vectors have different lengths.
///
/// # Example
/// ```
/// use dot_bench::reduction::dot_plain;
///
/// let a = [1.0, 2.0, 3.0];
/// let b = [4.0, 5.0, 6.0];
/// assert_eq!(dot_plain(&a, &b), 32.0);
/// ```
pub fn dot_plain(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vectors must have the same length");

    a.iter().zip(b).fold(0.0f32, |acc, (x, y)| acc + x * y)
}
