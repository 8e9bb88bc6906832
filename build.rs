//! Build script: compiles the C baseline kernels and links the vendor BLAS.

use std::env;

fn main() {
    println!("cargo:rustc-check-cfg=cfg(c_implementation_active)");
    println!("cargo:rustc-check-cfg=cfg(blas_linked)");
    println!("cargo:rerun-if-changed=build.rs");

    link_blas();
    compile_c_kernels();
}

fn link_blas() {
    if env::var_os("CARGO_FEATURE_CBLAS").is_none() {
        return;
    }

    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os == "macos" {
        println!("cargo:rustc-link-lib=framework=Accelerate");
    } else {
        println!("cargo:rustc-link-lib=openblas");
    }
    println!("cargo:rustc-cfg=blas_linked");
}

fn compile_c_kernels() {
    let build = cc::Build::new();
    let compiler = build.get_compiler();
    let is_gnu_like = compiler.is_like_gnu() || compiler.is_like_clang();
    let is_msvc = compiler.is_like_msvc();

    if !(is_gnu_like || is_msvc) {
        println!("cargo:warning=C compiler is not compatible (needs GCC, Clang, or MSVC). C kernels disabled.");
        return;
    }

    let compiler_name = if compiler.is_like_clang() {
        let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
        if target_os != "macos" {
            // Vanilla clang uses the same LLVM backend as rustc.
            println!("cargo:warning=Vanilla Clang detected. C kernels disabled (requires GCC, MSVC, or Apple Clang).");
            return;
        }
        "Apple Clang"
    } else if compiler.is_like_gnu() {
        "GCC"
    } else {
        "MSVC"
    };

    let rustflags = env::var("RUSTFLAGS").unwrap_or_default();
    let encoded_rustflags = env::var("CARGO_ENCODED_RUSTFLAGS").unwrap_or_default();
    let is_rust_native =
        rustflags.contains("target-cpu=native") || encoded_rustflags.contains("target-cpu=native");

    let mut build = cc::Build::new();

    let c_files = glob::glob("src/**/*.c")
        .expect("Failed to read glob pattern")
        .filter_map(|entry| entry.ok());

    for file in c_files {
        println!("cargo:rerun-if-changed={}", file.display());
        build.file(file);
    }

    // Accumulation order must match the Rust kernels, so no -ffast-math.
    build.opt_level(3);

    if is_rust_native {
        build.flag_if_supported("-march=native");
        println!("cargo:warning=Detected Rust target-cpu=native. Enabling -march=native for C compilation.");
    }

    build.compile("dot_kernels_c");

    println!("cargo:rustc-cfg=c_implementation_active");
    println!("cargo:rustc-env=C_COMPILER_NAME={}", compiler_name);
}
