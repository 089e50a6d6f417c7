//! Stride histogram and its fixed-width ASCII rendering.
//!
//! Every hop of a traversal has a signed stride: the successor's index minus the
//! current index. A good benchmark permutation spreads strides across the whole
//! [-(N-1), N-1] range with no dominant value a prefetcher could latch onto; the
//! histogram is how that property gets eyeballed.
//!
//! Two granularities live here:
//!
//! - [`StrideHistogram`]: one raw bucket per possible stride (2N buckets, indexed by
//!   `stride + N`). This is what the analyzer records into.
//! - [`DisplayRow`]: the raw buckets coarsened into 20 equal-width ranges over
//!   [-N, N), each rendered as a bar of at most [`BAR_WIDTH`] characters scaled
//!   against the fullest bucket.

use crate::{ChaseError, ChaseResult};

/// Number of coarse buckets in the rendered histogram.
pub const DISPLAY_BUCKETS: usize = 20;

/// Maximum bar length, in characters, of a rendered histogram row.
pub const BAR_WIDTH: u64 = 40;

/// Per-stride occurrence counts for one analyzed chain.
///
/// Buckets cover the full stride domain [-(N-1), N-1] of a chain with N slots.
/// Counts are `u32`: a single stride value can occur at most once per visited slot,
/// and chain lengths are well below `u32::MAX`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrideHistogram {
    /// `counts[stride + chain_len]` is the number of hops with that stride.
    counts: Vec<u32>,
    chain_len: usize,
}

impl StrideHistogram {
    /// Allocates an empty histogram for a chain of `chain_len` slots.
    ///
    /// # Errors
    ///
    /// [`ChaseError::Allocation`] if the 2N bucket buffer cannot be allocated.
    pub fn with_chain_len(chain_len: usize) -> ChaseResult<Self> {
        let buckets = chain_len.saturating_mul(2);
        let mut counts = Vec::new();
        counts
            .try_reserve_exact(buckets)
            .map_err(|_reserve_error| ChaseError::Allocation {
                len: buckets,
                bytes: buckets.saturating_mul(std::mem::size_of::<u32>()),
            })?;
        counts.resize(buckets, 0);

        Ok(Self { counts, chain_len })
    }

    /// The chain length this histogram was sized for.
    #[must_use]
    pub fn chain_len(&self) -> usize {
        self.chain_len
    }

    /// Records one hop with the given signed stride.
    ///
    /// # Panics
    ///
    /// Panics if `stride` lies outside [-(N-1), N-1]. Strides computed between two
    /// in-bounds slot indices always fit.
    pub fn record(&mut self, stride: i64) {
        let n = self.chain_len as i64;
        assert!(
            stride > -n && stride < n,
            "stride {stride} outside [-(N-1), N-1] for N = {n}"
        );
        self.counts[(stride + n) as usize] += 1;
    }

    /// Returns the number of hops recorded with exactly this stride.
    #[must_use]
    pub fn count(&self, stride: i64) -> u32 {
        let n = self.chain_len as i64;
        if stride <= -n || stride >= n {
            return 0;
        }
        self.counts[(stride + n) as usize]
    }

    /// Total number of recorded hops. Equals the cycle length of the analyzed walk.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&count| u64::from(count)).sum()
    }

    /// Coarsens the raw buckets into [`DISPLAY_BUCKETS`] contiguous ranges over
    /// [-N, N).
    ///
    /// Bucket bounds use truncating float arithmetic (`-N + (2N/20)*i`, truncated
    /// toward zero), matching the reference rendering bit for bit; each bucket's
    /// upper bound is the next bucket's lower bound, so the rows partition the
    /// domain and their counts sum to [`total`](Self::total).
    #[must_use]
    pub fn display_rows(&self) -> Vec<DisplayRow> {
        let n = self.chain_len as f64;
        let width = 2.0 * n / DISPLAY_BUCKETS as f64;

        (0..DISPLAY_BUCKETS)
            .map(|i| {
                let lo = (-n + width * i as f64) as i64;
                let hi = (-n + width * (i + 1) as f64) as i64;

                let count = (lo..hi)
                    .map(|stride| u64::from(self.count(stride)))
                    .sum();

                DisplayRow { lo, hi, count }
            })
            .collect()
    }

    /// Renders the 20-bucket histogram as fixed-width ASCII rows.
    ///
    /// Bars are scaled so the fullest bucket spans [`BAR_WIDTH`] characters. An
    /// all-empty histogram renders zero-length bars rather than dividing by zero.
    #[must_use]
    pub fn render(&self) -> String {
        use std::fmt::Write;

        let rows = self.display_rows();
        let max_count = rows.iter().map(|row| row.count).max().unwrap_or(0);

        let mut out = String::new();
        for row in rows {
            let dots = if max_count == 0 {
                0
            } else {
                (BAR_WIDTH * row.count / max_count) as usize
            };

            let _ = writeln!(
                out,
                "[{:>9};{:>9}) {:<width$} ({})",
                row.lo,
                row.hi,
                "*".repeat(dots),
                row.count,
                width = BAR_WIDTH as usize
            );
        }
        out
    }
}

/// One coarse bucket of the rendered histogram: strides in `[lo, hi)` and the
/// number of hops that landed there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DisplayRow {
    /// Inclusive lower stride bound.
    pub lo: i64,
    /// Exclusive upper stride bound.
    pub hi: i64,
    /// Number of hops with a stride in `[lo, hi)`.
    pub count: u64,
}
