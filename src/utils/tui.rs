//! Text User Interface (TUI) utilities.
//!
//! Help text and the variant listing. Benchmark lines themselves are
//! produced by the harness report so they stay machine-parsable.

use crate::reduction::code::{available_variants, BLAS_AVAILABLE, C_IMPL_AVAILABLE, CHUNK_SIZE};
use crate::reduction::Strategy;
use terminal_size::{terminal_size, Width};

/// Get the current terminal width, constrained to a reasonable range
fn get_term_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        (w as usize).clamp(40, 200)
    } else {
        80
    }
}

/// Truncate string with ellipsis if it exceeds width (character-wise)
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut result: String = s.chars().take(width.saturating_sub(3)).collect();
        result.push_str("...");
        result
    }
}

/// One-line usage message.
pub fn usage_line(program: &str) -> String {
    format!("Usage: {} [OPTIONS] <vector_size> <num_measurements>", program)
}

/// Full help text.
pub fn help_text(program: &str) -> String {
    let strategies: Vec<&str> = Strategy::ALL.iter().map(|s| s.name()).collect();
    let mut text = usage_line(program);
    text.push_str("\n\nOptions:\n");
    text.push_str(&format!(
        "  -s, --strategy NAME  Reduction strategy: {} (default: plain)\n",
        strategies.join(", ")
    ));
    text.push_str("      --impl LANG      Kernel source for plain/unrolled: rust, c (default: rust)\n");
    text.push_str("      --drop-remainder Unrolled kernel ignores the last len % 4 elements\n");
    text.push_str("      --keep-remainder Unrolled kernel includes the tail (default)\n");
    text.push_str(&format!(
        "      --threshold N    Chunk plain/unrolled above N elements (default: {})\n",
        CHUNK_SIZE
    ));
    text.push_str("      --fill X         Fill both vectors with X (default: 1.0)\n");
    text.push_str("      --random SEED    Fill both vectors with seeded values in [-1, 1)\n");
    text.push_str("      --csv PATH       Also export every sample to CSV\n");
    text.push_str("      --pin            Pin the thread to its current core while measuring\n");
    text.push_str("  -v, --verbose        Debug logging on stderr\n");
    text.push_str("  -l, --list           List the kernels built into this binary\n");
    text.push_str("  -h, --help           Show this help message\n");
    text.push_str("\nThe first half of the measurements is discarded as warm-up;\n");
    text.push_str("the summary line averages the second half.\n");
    text.push_str("\nExamples:\n");
    text.push_str(&format!("  {} 1000000 10\n", program));
    text.push_str(&format!("  {} --strategy unrolled 100000000 4\n", program));
    text.push_str(&format!("  {} -s blas --csv blas.csv 50000000 20\n", program));
    text
}

/// Print the help message
pub fn print_help(program: &str) {
    print!("{}", help_text(program));
}

/// Print the strategies and every kernel variant built into this binary
pub fn print_available_variants() {
    let term_width = get_term_width();
    let desc_width = term_width.saturating_sub(24).max(20);

    println!("Strategies:");
    for strategy in Strategy::ALL {
        println!(
            "  {:<20} {}",
            strategy.name(),
            truncate(strategy.description(), desc_width)
        );
    }

    println!();
    println!("Kernels:");
    for variant in available_variants() {
        let name = if variant.name.starts_with("c-") {
            match crate::utils::C_COMPILER_NAME {
                Some(c) => format!("{} ({})", variant.name, c),
                None => variant.name.to_string(),
            }
        } else {
            variant.name.to_string()
        };
        println!(
            "  {:<20} {}",
            truncate(&name, 20),
            truncate(variant.description, desc_width)
        );
    }

    println!();
    println!(
        "C kernels: {}   vendor BLAS: {}",
        if C_IMPL_AVAILABLE { "yes" } else { "no" },
        if BLAS_AVAILABLE { "linked" } else { "not linked (reference sdot)" }
    );
}
