//! FFI bindings for the C kernels compiled by the build script.

#[cfg(c_implementation_active)]
mod ffi {
    use libc::size_t;
    use std::os::raw::c_float;

    extern "C" {
        pub fn dot_c_plain(a: *const c_float, b: *const c_float, len: size_t) -> c_float;
        pub fn dot_c_unrolled(a: *const c_float, b: *const c_float, len: size_t) -> c_float;
    }
}

/// C plain kernel wrapper
#[cfg(c_implementation_active)]
pub fn dot_c_plain(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vectors must have the same length");
    // SAFETY: both pointers cover `a.len()` readable floats and the C
    // kernel only reads that many elements from each.
    unsafe { ffi::dot_c_plain(a.as_ptr(), b.as_ptr(), a.len()) }
}

/// C unrolled-by-4 kernel wrapper (tail elements included)
#[cfg(c_implementation_active)]
pub fn dot_c_unrolled(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vectors must have the same length");
    // SAFETY: both pointers cover `a.len()` readable floats and the C
    // kernel only reads that many elements from each.
    unsafe { ffi::dot_c_unrolled(a.as_ptr(), b.as_ptr(), a.len()) }
}

/// Check if C kernels are available
pub const C_IMPL_AVAILABLE: bool = cfg!(c_implementation_active);
