//! Dot product kernels.
//!
//! This module contains every kernel the strategies are built from: the
//! Rust plain and unrolled loops, the chunked wrapper, the sdot call
//! boundary and, when compiled, the C baseline kernels.

pub mod c_impl;
mod chunked;
mod plain;
pub mod sdot;
mod unrolled;

#[cfg(c_implementation_active)]
pub use c_impl::{dot_c_plain, dot_c_unrolled};
pub use c_impl::C_IMPL_AVAILABLE;
pub use chunked::{chunk_count, dot_chunked, CHUNK_SIZE};
pub use plain::dot_plain;
pub use sdot::{default_sdot, reference_sdot, ReferenceSdot, Sdot, BLAS_AVAILABLE};
#[cfg(blas_linked)]
pub use sdot::{cblas_sdot, CblasSdot};
pub use unrolled::{dot_unrolled, dot_unrolled_truncating, RemainderPolicy};

use crate::utils::VariantInfo;

/// Type alias for dot product function signature
pub type DotProductFn = fn(&[f32], &[f32]) -> f32;

/// Get all kernel variants built into this binary.
///
/// `plain` comes first and is the reference for verification. The
/// truncating unrolled kernel is left out: it is only correct for lengths
/// that are a multiple of 4.
pub fn available_variants() -> Vec<VariantInfo<DotProductFn>> {
    #[allow(unused_mut)]
    let mut variants: Vec<VariantInfo<DotProductFn>> = vec![
        VariantInfo {
            name: "plain",
            description: "Single accumulator, strict left-to-right order",
            function: dot_plain,
        },
        VariantInfo {
            name: "unrolled",
            description: "4 products per step into a single accumulator",
            function: dot_unrolled,
        },
        VariantInfo {
            name: "sdot-reference",
            description: "Portable sdot with the reference BLAS loop shape",
            function: reference_sdot,
        },
    ];

    #[cfg(blas_linked)]
    variants.push(VariantInfo {
        name: "sdot-cblas",
        description: "Vendor cblas_sdot",
        function: cblas_sdot,
    });

    #[cfg(c_implementation_active)]
    {
        variants.push(VariantInfo {
            name: "c-plain",
            description: "C plain kernel",
            function: dot_c_plain,
        });
        variants.push(VariantInfo {
            name: "c-unrolled",
            description: "C unrolled-by-4 kernel",
            function: dot_c_unrolled,
        });
    }

    variants
}
