//! Test utilities for the reduction kernels.

#[cfg(test)]
mod tests {
    use crate::reduction::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPSILON: f32 = 1e-4;

    /// Reordering the accumulation moves the result by at most a small
    /// multiple of `Σ|a[i] * b[i]|`, not of the result itself.
    fn assert_close(actual: f32, expected: f32, a: &[f32], b: &[f32], msg: &str) {
        let magnitude: f32 = a.iter().zip(b).map(|(x, y)| (x * y).abs()).sum();
        let diff = (actual - expected).abs();
        assert!(
            diff <= EPSILON * magnitude.max(1.0),
            "{}: expected {}, got {}, diff = {}",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn random_pair(len: usize, seed: u64) -> (Vec<f32>, Vec<f32>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let a: Vec<f32> = (0..len).map(|_| rng.random_range(-1.0..1.0)).collect();
        let b: Vec<f32> = (0..len).map(|_| rng.random_range(-1.0..1.0)).collect();
        (a, b)
    }

    #[test]
    fn test_plain_basic() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [5.0, 6.0, 7.0, 8.0];
        // 1*5 + 2*6 + 3*7 + 4*8 = 5 + 12 + 21 + 32 = 70
        assert_eq!(dot_plain(&a, &b), 70.0);
        assert_eq!(dot_unrolled(&a, &b), 70.0);
        assert_eq!(reference_sdot(&a, &b), 70.0);
    }

    #[test]
    fn test_empty_inputs() {
        let a: [f32; 0] = [];
        assert_eq!(dot_plain(&a, &a), 0.0);
        assert_eq!(dot_unrolled(&a, &a), 0.0);
        assert_eq!(dot_unrolled_truncating(&a, &a), 0.0);
        assert_eq!(reference_sdot(&a, &a), 0.0);
        assert_eq!(dot_chunked(dot_plain, &a, &a, CHUNK_SIZE), 0.0);
        for strategy in Strategy::ALL {
            assert_eq!(reduce(strategy, &a, &a), 0.0, "{}", strategy);
        }
    }

    #[test]
    #[should_panic(expected = "Vectors must have the same length")]
    fn test_length_mismatch_panics() {
        dot_plain(&[1.0, 2.0], &[1.0]);
    }

    #[test]
    fn test_all_ones_exact_below_threshold() {
        for len in [1usize, 3, 4, 5, 1000, 1023, 65_536, 1_000_000] {
            let ones = vec![1.0f32; len];
            for strategy in Strategy::ALL {
                assert_eq!(
                    reduce(strategy, &ones, &ones),
                    len as f32,
                    "{} over {} ones",
                    strategy,
                    len
                );
            }
        }
    }

    #[test]
    fn test_unrolled_matches_plain_for_multiples_of_four() {
        for (len, seed) in [(4usize, 1u64), (256, 2), (4096, 3), (100_000, 4)] {
            let (a, b) = random_pair(len, seed);
            let plain = dot_plain(&a, &b);
            assert_close(dot_unrolled(&a, &b), plain, &a, &b, "unrolled vs plain");
            // Nothing to drop when the length is a multiple of 4
            assert_eq!(dot_unrolled(&a, &b), dot_unrolled_truncating(&a, &b));
        }
    }

    #[test]
    fn test_unrolled_tail_is_kept() {
        let ones = vec![1.0f32; 1023];
        assert_eq!(dot_unrolled(&ones, &ones), 1023.0);

        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let b = [1.0; 7];
        assert_eq!(dot_unrolled(&a, &b), 28.0);
    }

    #[test]
    fn test_truncating_unrolled_drops_tail() {
        // Legacy behaviour: the last len % 4 elements never reach the accumulator.
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let b = [1.0; 7];
        assert_eq!(dot_unrolled_truncating(&a, &b), 10.0);

        let ones = vec![1.0f32; 1023];
        assert_eq!(dot_unrolled_truncating(&ones, &ones), 1020.0);
        assert_eq!(dot_unrolled_truncating(&[2.0; 3], &[2.0; 3]), 0.0);
    }

    #[test]
    fn test_remainder_policy_kernel() {
        let ones = [1.0f32; 6];
        assert_eq!(RemainderPolicy::default(), RemainderPolicy::Keep);
        assert_eq!((RemainderPolicy::Keep.kernel())(&ones, &ones), 6.0);
        assert_eq!((RemainderPolicy::Drop.kernel())(&ones, &ones), 4.0);
    }

    #[test]
    fn test_chunked_matches_direct_below_and_above_chunk() {
        let (a, b) = random_pair(10_000, 11);
        for kernel in [dot_plain as DotProductFn, dot_unrolled] {
            let direct = kernel(&a, &b);
            // Single chunk: identical to the direct call
            assert_eq!(dot_chunked(kernel, &a, &b, a.len()), direct);
            assert_eq!(dot_chunked(kernel, &a, &b, CHUNK_SIZE), direct);
            // Many chunks: same value up to rounding
            assert_close(dot_chunked(kernel, &a, &b, 64), direct, &a, &b, "chunked(64)");
            assert_close(dot_chunked(kernel, &a, &b, 1000), direct, &a, &b, "chunked(1000)");
        }
    }

    #[test]
    fn test_chunked_uneven_last_chunk() {
        let ones = vec![1.0f32; 1000];
        assert_eq!(dot_chunked(dot_plain, &ones, &ones, 64), 1000.0);
        assert_eq!(dot_chunked(dot_unrolled, &ones, &ones, 7), 1000.0);
        assert_eq!(dot_chunked(dot_plain, &ones, &ones, 1), 1000.0);
    }

    #[test]
    #[should_panic(expected = "Chunk size must be positive")]
    fn test_chunked_zero_chunk_panics() {
        dot_chunked(dot_plain, &[1.0], &[1.0], 0);
    }

    #[test]
    fn test_chunk_count() {
        assert_eq!(chunk_count(0, 4), 0);
        assert_eq!(chunk_count(10, 3), 4);
        assert_eq!(chunk_count(CHUNK_SIZE, CHUNK_SIZE), 1);
        assert_eq!(chunk_count(CHUNK_SIZE + 1, CHUNK_SIZE), 2);
        assert_eq!(chunk_count(100_000_000, CHUNK_SIZE), 6);
    }

    #[test]
    fn test_chunking_bounds_accumulation_error() {
        // Past 2^24 a single f32 accumulator no longer absorbs +1.0.
        let len = CHUNK_SIZE + 16;
        let ones = vec![1.0f32; len];

        assert_eq!(dot_plain(&ones, &ones), CHUNK_SIZE as f32);
        assert_eq!(dot_chunked(dot_plain, &ones, &ones, CHUNK_SIZE), len as f32);
        assert_eq!(reduce(Strategy::Plain, &ones, &ones), len as f32);
        for strategy in Strategy::ALL {
            let result = reduce(strategy, &ones, &ones);
            assert!(
                relative_error(result, len as f64) < 1e-6,
                "{} over {} ones gave {}",
                strategy,
                len,
                result
            );
        }
    }

    #[test]
    fn test_blas_accurate_over_several_chunks() {
        let len = CHUNK_SIZE * 3;
        let ones = vec![1.0f32; len];

        let blas = reduce(Strategy::Blas, &ones, &ones);
        assert!(
            relative_error(blas, len as f64) < 1e-6,
            "blas over {} ones gave {}",
            len,
            blas
        );
        // Each 2^24 block sums exactly, and so do the three partials
        assert_eq!(reference_sdot(&ones, &ones), len as f32);
        assert_eq!(reference_sdot(&ones[..CHUNK_SIZE], &ones[..CHUNK_SIZE]), CHUNK_SIZE as f32);
    }

    #[test]
    fn test_plan_selection() {
        for strategy in [Strategy::Plain, Strategy::Unrolled] {
            assert_eq!(
                ReductionPlan::select(strategy, 0, CHUNK_SIZE),
                ReductionPlan::Direct
            );
            assert_eq!(
                ReductionPlan::select(strategy, CHUNK_SIZE, CHUNK_SIZE),
                ReductionPlan::Direct
            );
            assert_eq!(
                ReductionPlan::select(strategy, CHUNK_SIZE + 1, CHUNK_SIZE),
                ReductionPlan::Chunked {
                    chunk_size: CHUNK_SIZE
                }
            );
            assert_eq!(
                ReductionPlan::select(strategy, 100_000_000, CHUNK_SIZE),
                ReductionPlan::Chunked {
                    chunk_size: CHUNK_SIZE
                }
            );
        }
        for len in [0, CHUNK_SIZE, 100_000_000] {
            assert_eq!(
                ReductionPlan::select(Strategy::Blas, len, CHUNK_SIZE),
                ReductionPlan::Vendor
            );
        }
    }

    #[test]
    fn test_reducer_small_threshold_takes_chunked_path() {
        let reducer =
            Reducer::new(Strategy::Plain, Implementation::Rust, RemainderPolicy::Keep, 100)
                .expect("rust kernels are always built");
        assert_eq!(reducer.plan(100), ReductionPlan::Direct);
        assert_eq!(reducer.plan(101), ReductionPlan::Chunked { chunk_size: 100 });

        let (a, b) = random_pair(1000, 5);
        assert_close(reducer.reduce(&a, &b), dot_plain(&a, &b), &a, &b, "chunked reducer");

        let ones = vec![1.0f32; 1000];
        assert_eq!(reducer.reduce(&ones, &ones), 1000.0);
    }

    #[test]
    fn test_reducer_blas_uses_sdot() {
        let reducer =
            Reducer::new(Strategy::Blas, Implementation::Rust, RemainderPolicy::Keep, CHUNK_SIZE)
                .expect("blas always resolves");
        assert_eq!(reducer.sdot_name(), Some(default_sdot().name()));
        assert_eq!(reducer.plan(CHUNK_SIZE * 2), ReductionPlan::Vendor);

        let reference = reducer.with_sdot(&ReferenceSdot);
        assert_eq!(reference.sdot_name(), Some("reference"));
        let ones = vec![1.0f32; 4099];
        assert_eq!(reference.reduce(&ones, &ones), 4099.0);
    }

    #[test]
    fn test_reducer_with_sdot_ignored_for_kernels() {
        let reducer =
            Reducer::new(Strategy::Unrolled, Implementation::Rust, RemainderPolicy::Drop, 64)
                .expect("rust kernels are always built")
                .with_sdot(&ReferenceSdot);
        assert_eq!(reducer.sdot_name(), None);
        // Truncation happens per chunk: 100 = 64 + 36, both multiples of 4
        let ones = vec![1.0f32; 100];
        assert_eq!(reducer.reduce(&ones, &ones), 100.0);
        // 70 = 64 + 6: the second chunk loses 2 elements
        let ones = vec![1.0f32; 70];
        assert_eq!(reducer.reduce(&ones, &ones), 68.0);
    }

    #[test]
    fn test_c_kernel_availability() {
        let plain_c =
            Reducer::new(Strategy::Plain, Implementation::C, RemainderPolicy::Keep, CHUNK_SIZE);
        assert_eq!(plain_c.is_some(), C_IMPL_AVAILABLE);

        // No truncating C kernel is built
        assert!(
            Reducer::new(Strategy::Unrolled, Implementation::C, RemainderPolicy::Drop, CHUNK_SIZE)
                .is_none()
        );

        if let Some(reducer) = plain_c {
            let ones = vec![1.0f32; 4097];
            assert_eq!(reducer.reduce(&ones, &ones), 4097.0);
        }
    }

    #[test]
    fn test_reference_sdot_head_lengths() {
        // Every len % 5 head length
        for len in 0..=12usize {
            let a: Vec<f32> = (1..=len).map(|i| i as f32).collect();
            let b = vec![2.0f32; len];
            let expected = (len * (len + 1)) as f32;
            assert_eq!(reference_sdot(&a, &b), expected, "len {}", len);
            assert_eq!(ReferenceSdot.sdot(&a, &b), expected, "len {}", len);
        }
    }

    #[test]
    fn test_reference_sdot_matches_plain() {
        let (a, b) = random_pair(9999, 21);
        assert_close(reference_sdot(&a, &b), dot_plain(&a, &b), &a, &b, "reference sdot");
    }

    #[test]
    fn test_strategy_parse_and_display() {
        assert_eq!("plain".parse::<Strategy>(), Ok(Strategy::Plain));
        assert_eq!("UNROLLED".parse::<Strategy>(), Ok(Strategy::Unrolled));
        assert_eq!("Blas".parse::<Strategy>(), Ok(Strategy::Blas));
        assert_eq!("fma".parse::<Strategy>(), Err("fma".to_string()));
        assert_eq!(Strategy::default(), Strategy::Plain);
        assert_eq!(Strategy::Unrolled.to_string(), "unrolled");

        assert_eq!("C".parse::<Implementation>(), Ok(Implementation::C));
        assert_eq!("rust".parse::<Implementation>(), Ok(Implementation::Rust));
        assert!("asm".parse::<Implementation>().is_err());
    }

    #[test]
    fn test_relative_error() {
        assert_eq!(relative_error(100.0, 100.0), 0.0);
        assert!((relative_error(99.0, 100.0) - 0.01).abs() < 1e-12);
        assert_eq!(relative_error(0.5, 0.0), 0.5);
    }

    #[test]
    fn test_variants_start_with_plain() {
        let variants = available_variants();
        assert_eq!(variants[0].name, "plain");
        assert!(variants.iter().any(|v| v.name == "unrolled"));
        assert!(variants.iter().any(|v| v.name == "sdot-reference"));
        assert_eq!(variants.iter().any(|v| v.name == "c-plain"), C_IMPL_AVAILABLE);
        assert_eq!(variants.iter().any(|v| v.name == "sdot-cblas"), BLAS_AVAILABLE);
    }

    #[test]
    fn test_verify_all_variants() {
        verify_with_seed(1023, 42).expect("variants agree on 1023 elements");
        verify_with_seed(4096, 7).expect("variants agree on 4096 elements");
        verify().expect("variants agree on random input");
    }

    #[test]
    fn test_verify_is_reproducible() {
        assert_eq!(verify().is_ok(), verify_with_seed(1023, VERIFY_SEED).is_ok());

        let err = crate::error::VerificationError::ToleranceExceeded {
            variant: "unrolled",
            len: 1023,
            seed: 7,
            expected: 1.0,
            actual: 2.0,
            tolerance: 0.1,
        };
        let message = err.to_string();
        assert!(message.contains("1023 elements"), "{}", message);
        assert!(message.contains("seed 7"), "{}", message);
    }
}
