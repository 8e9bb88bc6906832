//! BLAS `sdot` bindings.
//!
//! The blas strategy hands the whole reduction to a vendor routine and
//! treats it as opaque. [`Sdot`] is the call boundary: a portable reference
//! implementation is always compiled in, and the CBLAS binding is added when
//! the crate is built with the `cblas` feature.

use super::chunked::{dot_chunked, CHUNK_SIZE};

/// A single-precision BLAS dot product with unit strides.
pub trait Sdot: Send + Sync {
    /// Short identifier used in logs and variant listings.
    fn name(&self) -> &'static str;

    /// Compute `x · y`.
    ///
    /// # Panics
    /// Panics if the vectors have different lengths.
    fn sdot(&self, x: &[f32], y: &[f32]) -> f32;
}

/// Portable sdot with the loop shape of the reference BLAS.
///
/// Within each block of [`CHUNK_SIZE`] elements, `len % 5` leading
/// elements are handled first, then five products are added per step, left
/// to right, into one accumulator. Block results are summed like
/// [`dot_chunked`] partials, so long vectors keep the
/// same accuracy as the chunked plain and unrolled strategies.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReferenceSdot;

impl Sdot for ReferenceSdot {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn sdot(&self, x: &[f32], y: &[f32]) -> f32 {
        reference_sdot(x, y)
    }
}

/// Free-function form of [`ReferenceSdot`].
pub fn reference_sdot(x: &[f32], y: &[f32]) -> f32 {
    assert_eq!(x.len(), y.len(), "Vectors must have the same length");

    if x.len() > CHUNK_SIZE {
        dot_chunked(reference_block, x, y, CHUNK_SIZE)
    } else {
        reference_block(x, y)
    }
}

fn reference_block(x: &[f32], y: &[f32]) -> f32 {
    let head = x.len() % 5;
    let mut acc = 0.0f32;

    for (a, b) in x[..head].iter().zip(&y[..head]) {
        acc += a * b;
    }

    for (a, b) in x[head..].chunks_exact(5).zip(y[head..].chunks_exact(5)) {
        acc = acc + a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3] + a[4] * b[4];
    }

    acc
}

#[cfg(blas_linked)]
mod ffi {
    use libc::c_int;
    use std::os::raw::c_float;

    extern "C" {
        pub fn cblas_sdot(
            n: c_int,
            x: *const c_float,
            incx: c_int,
            y: *const c_float,
            incy: c_int,
        ) -> c_float;
    }
}

/// Vendor `cblas_sdot` (OpenBLAS, or Accelerate on macOS).
#[cfg(blas_linked)]
#[derive(Clone, Copy, Debug, Default)]
pub struct CblasSdot;

#[cfg(blas_linked)]
impl Sdot for CblasSdot {
    fn name(&self) -> &'static str {
        "cblas"
    }

    fn sdot(&self, x: &[f32], y: &[f32]) -> f32 {
        cblas_sdot(x, y)
    }
}

/// Free-function form of [`CblasSdot`].
///
/// CBLAS takes an `int` length, so longer inputs are passed in `int`-sized
/// pieces and the partial results are summed.
#[cfg(blas_linked)]
pub fn cblas_sdot(x: &[f32], y: &[f32]) -> f32 {
    use libc::c_int;

    assert_eq!(x.len(), y.len(), "Vectors must have the same length");

    let piece = c_int::MAX as usize;
    x.chunks(piece)
        .zip(y.chunks(piece))
        .fold(0.0f32, |acc, (xs, ys)| {
            // SAFETY: both pointers cover `xs.len()` readable floats and the
            // length fits in c_int by construction of `piece`.
            acc + unsafe { ffi::cblas_sdot(xs.len() as c_int, xs.as_ptr(), 1, ys.as_ptr(), 1) }
        })
}

/// Whether a vendor CBLAS was linked at build time.
pub const BLAS_AVAILABLE: bool = cfg!(blas_linked);

/// The sdot used by the blas strategy: the vendor routine when linked,
/// the reference implementation otherwise.
pub fn default_sdot() -> &'static dyn Sdot {
    #[cfg(blas_linked)]
    {
        &CblasSdot
    }
    #[cfg(not(blas_linked))]
    {
        &ReferenceSdot
    }
}
