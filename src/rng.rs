//! Internal random number generator implementation based on PCG32.
//!
//! This module provides a minimal, high-quality PRNG so the crate does not need the
//! `rand` dependency tree. The generators own their randomness: a [`Pcg32`] is injected
//! at construction, which makes every permutation reproducible from a single `u64` seed
//! while still offering wall-clock entropy seeding for casual runs.
//!
//! # PCG32 Algorithm
//!
//! PCG (Permuted Congruential Generator) is a family of simple fast space-efficient
//! statistically good algorithms for random number generation. PCG32 specifically:
//! - Has 64 bits of state, producing 32-bit output
//! - Period of 2^64
//! - Passes TestU01 statistical tests
//! - Is fast and simple to implement
//!
//! Reference: <https://www.pcg-random.org/>
//!
//! # Usage
//!
//! ```rust
//! use permchase::rng::{Pcg32, Rng, SeedableRng, shuffle};
//!
//! // Seeded RNG for deterministic behavior
//! let mut rng = Pcg32::seed_from_u64(12345);
//! let value = rng.gen_range_usize(0..100);
//!
//! // Unbiased Fisher-Yates shuffle of a slice
//! let mut order: Vec<usize> = (0..16).collect();
//! shuffle(&mut rng, &mut order);
//! ```

/// PCG32 random number generator.
///
/// A minimal implementation of the PCG-XSH-RR variant with 64-bit state.
/// Suitable for benchmark permutation generation, but NOT cryptographically secure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pcg32 {
    state: u64,
    inc: u64,
}

/// Default increment for single-stream PCG32.
/// This is a standard value from the PCG paper.
const PCG_DEFAULT_INCREMENT: u64 = 1442695040888963407;

/// Multiplier constant for the LCG step.
/// This is the standard multiplier for 64-bit state PCG.
const PCG_MULTIPLIER: u64 = 6364136223846793005;

impl Pcg32 {
    /// Creates a new PCG32 generator with the given state and stream.
    ///
    /// The stream (increment) allows for multiple independent sequences.
    /// The increment must be odd; if even, it will be made odd by OR-ing with 1.
    #[must_use]
    pub const fn new(state: u64, stream: u64) -> Self {
        // The increment must be odd
        let inc = (stream << 1) | 1;
        // Initialize state to 0, then advance once, then add the initial state
        // This is the standard PCG seeding procedure
        let mut pcg = Self { state: 0, inc };
        // Can't call non-const fn in const context, so we inline the step
        pcg.state = pcg.state.wrapping_mul(PCG_MULTIPLIER).wrapping_add(pcg.inc);
        pcg.state = pcg.state.wrapping_add(state);
        pcg.state = pcg.state.wrapping_mul(PCG_MULTIPLIER).wrapping_add(pcg.inc);
        pcg
    }

    /// Generates the next 32-bit random value.
    #[inline]
    #[must_use]
    pub fn next_u32(&mut self) -> u32 {
        let old_state = self.state;
        // Advance internal state
        self.state = old_state
            .wrapping_mul(PCG_MULTIPLIER)
            .wrapping_add(self.inc);
        // Calculate output using XSH-RR (xor-shift, random rotate)
        let xorshifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Generates the next 64-bit random value by combining two 32-bit values.
    #[inline]
    #[must_use]
    pub fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.next_u32());
        let low = u64::from(self.next_u32());
        (high << 32) | low
    }
}

/// Trait for seeding random number generators.
///
/// Provides a simple interface for creating deterministic RNG instances.
pub trait SeedableRng: Sized {
    /// Creates a new RNG seeded from a 64-bit value.
    ///
    /// Different seeds produce different (statistically independent) sequences.
    #[must_use]
    fn seed_from_u64(seed: u64) -> Self;

    /// Creates a new RNG with a random seed derived from system timing.
    ///
    /// This uses timing information and thread identity for entropy, which is
    /// sufficient for benchmark permutations but NOT cryptographically secure.
    #[must_use]
    fn from_entropy() -> Self;
}

impl SeedableRng for Pcg32 {
    fn seed_from_u64(seed: u64) -> Self {
        Self::new(seed, PCG_DEFAULT_INCREMENT)
    }

    fn from_entropy() -> Self {
        Self::seed_from_u64(timing_entropy_seed())
    }
}

/// Trait for random number generation.
///
/// Provides the operations the permutation generators need. Implemented for [`Pcg32`];
/// generators are generic over this trait so tests can substitute a scripted source.
pub trait Rng {
    /// Returns the next 32-bit random value.
    fn next_u32(&mut self) -> u32;

    /// Returns the next 64-bit random value.
    fn next_u64(&mut self) -> u64;

    /// Generates a random `usize` value in the given range `[low, high)`.
    ///
    /// # Empty Range Behavior
    /// If `range.is_empty()`, logs a warning and returns `range.start`.
    fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        let span = range.end.wrapping_sub(range.start);
        if span == 0 {
            tracing::warn!(
                start = range.start,
                end = range.end,
                "gen_range_usize called with empty range"
            );
            return range.start;
        }

        // Use rejection sampling to avoid bias
        if span <= u32::MAX as usize {
            // Use 32-bit arithmetic for smaller ranges
            let threshold = (span as u32).wrapping_neg() % (span as u32);
            loop {
                let random_value = self.next_u32();
                if random_value >= threshold {
                    return range
                        .start
                        .wrapping_add((random_value % span as u32) as usize);
                }
            }
        } else {
            // Use 64-bit arithmetic for larger ranges
            let span64 = span as u64;
            let threshold = span64.wrapping_neg() % span64;
            loop {
                let random_value = self.next_u64();
                if random_value >= threshold {
                    return range.start.wrapping_add((random_value % span64) as usize);
                }
            }
        }
    }
}

impl Rng for Pcg32 {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        Self::next_u32(self)
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        Self::next_u64(self)
    }
}

/// Uniformly shuffles a slice in place using the Fisher-Yates algorithm.
///
/// Every permutation of the slice is equally likely (given a uniform `rng`),
/// because the swap index is drawn with rejection sampling rather than a
/// biased modulo. Empty and single-element slices are left untouched.
pub fn shuffle<R: Rng + ?Sized, T>(rng: &mut R, slice: &mut [T]) {
    for i in (1..slice.len()).rev() {
        let j = rng.gen_range_usize(0..i + 1);
        slice.swap(i, j);
    }
}

/// Gets a timing-based seed for RNG initialization.
///
/// Combines high-precision timing via `web_time::Instant`, thread identity, and a
/// per-process call counter, so two generators constructed in the same instant
/// still draw independent sequences.
///
/// # Non-Determinism Warning
///
/// This function is intentionally non-deterministic. For reproducible permutations
/// (required for comparing generator strategies across runs), always use
/// [`Pcg32::seed_from_u64`] with a fixed seed instead.
fn timing_entropy_seed() -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    use std::sync::atomic::{AtomicU64, Ordering};
    use web_time::Instant;

    // Two seeds derived in the same instant must still differ; the counter
    // guarantees that even where the clock cannot.
    static ENTROPY_CALLS: AtomicU64 = AtomicU64::new(0);
    let call = ENTROPY_CALLS.fetch_add(1, Ordering::Relaxed);

    // Use timing for entropy - this is intentionally non-deterministic
    let now = Instant::now();

    // Mix in thread ID for additional entropy across threads
    let thread_hash = {
        let mut hasher = DefaultHasher::new();
        std::thread::current().id().hash(&mut hasher);
        hasher.finish()
    };

    let timing_hash = {
        let mut hasher = DefaultHasher::new();
        now.elapsed().as_nanos().hash(&mut hasher);
        hasher.finish()
    };

    thread_hash
        .wrapping_mul(timing_hash)
        .wrapping_add(call.wrapping_mul(0x9e3779b97f4a7c15))
        .wrapping_add(0x9e3779b97f4a7c15)
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    #[test]
    fn test_pcg32_deterministic() {
        let mut rng1 = Pcg32::seed_from_u64(12345);
        let mut rng2 = Pcg32::seed_from_u64(12345);

        for _ in 0..1000 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_pcg32_different_seeds() {
        let mut rng1 = Pcg32::seed_from_u64(12345);
        let mut rng2 = Pcg32::seed_from_u64(54321);

        // Should produce different sequences
        let mut same_count = 0;
        for _ in 0..100 {
            if rng1.next_u32() == rng2.next_u32() {
                same_count += 1;
            }
        }
        // Extremely unlikely to have more than a few collisions
        assert!(same_count < 10);
    }

    #[test]
    fn test_pcg32_distribution() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut buckets = [0u32; 16];

        // Generate many values and check distribution
        for _ in 0..16000 {
            let val = rng.next_u32();
            let bucket = (val >> 28) as usize; // Use top 4 bits
            buckets[bucket] += 1;
        }

        // Each bucket should have roughly 1000 values (16000/16)
        // Allow significant variance for statistical tests
        for &count in &buckets {
            assert!(count > 500, "Bucket too low: {count}");
            assert!(count < 1500, "Bucket too high: {count}");
        }
    }

    // Test that known seed produces expected sequence (golden test)
    #[test]
    fn test_pcg32_golden() {
        let mut rng = Pcg32::seed_from_u64(0);

        // These values are from running the implementation with seed 0
        // They serve as a regression test to ensure we don't accidentally change the algorithm
        let expected = [
            0x348a463f_u32,
            0x4f205a1b_u32,
            0x2946c488_u32,
            0x805e36de_u32,
            0x79f994a9_u32,
        ];

        for &exp in &expected {
            assert_eq!(rng.next_u32(), exp, "Golden test failed");
        }
    }

    #[test]
    fn test_gen_range_usize_small() {
        let mut rng = Pcg32::seed_from_u64(42);

        for _ in 0..1000 {
            let val = rng.gen_range_usize(10..20);
            assert!(val >= 10);
            assert!(val < 20);
        }
    }

    #[test]
    fn test_gen_range_usize_large() {
        let mut rng = Pcg32::seed_from_u64(42);

        // Test with a range larger than u32::MAX
        let large_start: usize = (u32::MAX as usize) + 1000;
        let large_end: usize = large_start + 1000;

        for _ in 0..100 {
            let val = rng.gen_range_usize(large_start..large_end);
            assert!(val >= large_start);
            assert!(val < large_end);
        }
    }

    #[test]
    fn test_gen_range_usize_single_value() {
        let mut rng = Pcg32::seed_from_u64(42);

        // Single value range should always return that value
        for _ in 0..100 {
            let val = rng.gen_range_usize(42..43);
            assert_eq!(val, 42);
        }
    }

    #[test]
    fn test_gen_range_usize_empty_returns_start() {
        let mut rng = Pcg32::seed_from_u64(42);

        // Empty range (start == end)
        let result = rng.gen_range_usize(500..500);
        assert_eq!(result, 500, "Empty range should return start value");

        let result = rng.gen_range_usize(0..0);
        assert_eq!(result, 0, "Empty range at 0 should return 0");
    }

    #[test]
    fn test_next_u64_combines_correctly() {
        let mut rng = Pcg32::seed_from_u64(42);

        // Verify u64 covers full range (tests high bits are populated)
        let mut has_high_bits = false;
        for _ in 0..1000 {
            let val = rng.next_u64();
            if val > u64::from(u32::MAX) {
                has_high_bits = true;
                break;
            }
        }
        assert!(
            has_high_bits,
            "next_u64 should produce values with high bits set"
        );
    }

    #[test]
    fn test_seedable_from_entropy() {
        // Just verify it doesn't panic
        let _rng = Pcg32::from_entropy();
    }

    #[test]
    fn test_from_entropy_same_instant_differs() {
        // Back-to-back construction lands in the same clock tick; the seeds must
        // differ anyway.
        let mut rng1 = Pcg32::from_entropy();
        let mut rng2 = Pcg32::from_entropy();

        let seq1: Vec<u32> = (0..8).map(|_| rng1.next_u32()).collect();
        let seq2: Vec<u32> = (0..8).map(|_| rng2.next_u32()).collect();
        assert_ne!(seq1, seq2, "same-instant entropy seeds collided");
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut values: Vec<usize> = (0..256).collect();
        shuffle(&mut rng, &mut values);

        let mut sorted = values.clone();
        sorted.sort_unstable();
        let expected: Vec<usize> = (0..256).collect();
        assert_eq!(sorted, expected, "Shuffle must preserve the element set");
    }

    #[test]
    fn test_shuffle_handles_degenerate_slices() {
        let mut rng = Pcg32::seed_from_u64(7);

        let mut empty: [usize; 0] = [];
        shuffle(&mut rng, &mut empty);

        let mut single = [9usize];
        shuffle(&mut rng, &mut single);
        assert_eq!(single, [9]);
    }

    #[test]
    fn test_shuffle_moves_elements() {
        let mut rng = Pcg32::seed_from_u64(99);
        let original: Vec<usize> = (0..512).collect();
        let mut values = original.clone();
        shuffle(&mut rng, &mut values);

        // A 512-element shuffle landing on the identity has probability 1/512!.
        assert_ne!(values, original, "Shuffle left a large slice untouched");
    }
}

// =============================================================================
// Property-Based Tests
// =============================================================================

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Same seed always produces identical sequence.
        ///
        /// This is what makes permutation runs reproducible for cross-strategy
        /// comparisons.
        #[test]
        fn prop_determinism_same_seed_same_sequence(seed in any::<u64>()) {
            let mut rng1 = Pcg32::seed_from_u64(seed);
            let mut rng2 = Pcg32::seed_from_u64(seed);

            for _ in 0..100 {
                prop_assert_eq!(
                    rng1.next_u32(), rng2.next_u32(),
                    "Same seed must produce identical sequences"
                );
            }
        }

        /// Property: Different seeds produce different sequences.
        ///
        /// While collisions are possible, they should be astronomically rare.
        #[test]
        fn prop_different_seeds_different_sequences(seed1 in any::<u64>(), seed2 in any::<u64>()) {
            prop_assume!(seed1 != seed2);

            let mut rng1 = Pcg32::seed_from_u64(seed1);
            let mut rng2 = Pcg32::seed_from_u64(seed2);

            // Collect first 10 values
            let seq1: Vec<u32> = (0..10).map(|_| rng1.next_u32()).collect();
            let seq2: Vec<u32> = (0..10).map(|_| rng2.next_u32()).collect();

            prop_assert_ne!(seq1, seq2, "Different seeds should produce different sequences");
        }

        /// Property: gen_range_usize output is always within the specified range.
        #[test]
        fn prop_gen_range_usize_within_bounds(
            seed in any::<u64>(),
            start in 0usize..10000,
            span in 1usize..10000,
        ) {
            let end = start.saturating_add(span);
            prop_assume!(end > start);

            let mut rng = Pcg32::seed_from_u64(seed);

            for _ in 0..50 {
                let val = rng.gen_range_usize(start..end);
                prop_assert!(val >= start, "gen_range_usize output {} below start {}", val, start);
                prop_assert!(val < end, "gen_range_usize output {} >= end {}", val, end);
            }
        }

        /// Property: Shuffling never adds or removes elements.
        #[test]
        fn prop_shuffle_preserves_multiset(seed in any::<u64>(), len in 0usize..512) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let original: Vec<usize> = (0..len).collect();
            let mut values = original.clone();

            shuffle(&mut rng, &mut values);

            let mut sorted = values;
            sorted.sort_unstable();
            prop_assert_eq!(sorted, original, "Shuffle must be a permutation of its input");
        }

        /// Property: Shuffle is deterministic for a given seed.
        #[test]
        fn prop_shuffle_deterministic(seed in any::<u64>(), len in 0usize..256) {
            let mut rng1 = Pcg32::seed_from_u64(seed);
            let mut rng2 = Pcg32::seed_from_u64(seed);

            let mut values1: Vec<usize> = (0..len).collect();
            let mut values2: Vec<usize> = (0..len).collect();

            shuffle(&mut rng1, &mut values1);
            shuffle(&mut rng2, &mut values2);

            prop_assert_eq!(values1, values2, "Same seed must produce the same shuffle");
        }

        /// Property: Clone produces identical RNG that generates same sequence.
        #[test]
        fn prop_clone_produces_identical_sequence(seed in any::<u64>(), advance in 0usize..100) {
            let mut rng1 = Pcg32::seed_from_u64(seed);

            // Advance RNG by some amount
            for _ in 0..advance {
                let _ = rng1.next_u32();
            }

            // Clone at this point
            let mut rng2 = rng1.clone();

            // Both should produce identical values going forward
            for _ in 0..50 {
                prop_assert_eq!(
                    rng1.next_u32(), rng2.next_u32(),
                    "Cloned RNG must produce identical sequence"
                );
            }
        }
    }
}
