//! # permchase
//!
//! Generator and verifier for randomized pointer-chase permutations, the access
//! patterns behind latency-sensitive memory benchmarks.
//!
//! A benchmark kernel that chases pointers through an array measures true memory
//! latency only if the hardware cannot guess the next access. permchase builds the
//! traversal orders such kernels need - a [`SuccessorChain`] where slot `i` stores
//! the index visited after `i`, forming one randomized Hamiltonian cycle over all
//! N slots - and, just as importantly, *verifies* them: the [`analyze`] walk checks
//! that a chain really is a single full cycle and measures the distribution of hop
//! strides that defeats prefetchers.
//!
//! # Components
//!
//! - [`ShuffleGenerator`]: the core strategy. Randomizes the interior of the
//!   visiting order, so the output is a single N-cycle for every draw of the RNG.
//! - [`ScatterGenerator`]: a uniformly random successor permutation, included as
//!   the statistical comparison baseline; its coverage is measured, not guaranteed.
//! - [`analyze`] / [`ChainReport`]: cycle length, coverage percentage, terminal
//!   index and the per-stride histogram of one traversal.
//! - [`StrideHistogram`]: raw per-stride counts plus the classic 20-bucket ASCII
//!   rendering.
//! - [`Suite`] and friends in [`harness`]: the standard batch of sizes and
//!   strategies the `permchase` binary executes.
//!
//! # Example
//!
//! ```rust
//! use permchase::{analyze, ChainGenerator, ShuffleGenerator};
//!
//! let mut generator = ShuffleGenerator::seeded(42);
//! let chain = generator.generate(1024)?;
//!
//! let report = analyze(&chain)?;
//! assert!(report.is_hamiltonian());
//! assert_eq!(report.cycle_length(), 1024);
//! # Ok::<(), permchase::ChaseError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub use analyzer::{analyze, ChainReport};
pub use chain::{SuccessorChain, MIN_CHAIN_LEN};
pub use error::{ChaseError, ChaseResult};
pub use generator::{ChainGenerator, GeneratorKind, ScatterGenerator, ShuffleGenerator};
pub use harness::{run_averaged, run_trial, AverageReport, Suite, SuiteOutcome, TrialConfig};
pub use histogram::{DisplayRow, StrideHistogram, BAR_WIDTH, DISPLAY_BUCKETS};

pub mod analyzer;
pub mod chain;
pub mod error;
pub mod generator;
pub mod harness;
pub mod histogram;
pub mod prelude;
/// Internal random number generator module based on PCG32.
///
/// Provides a minimal, high-quality PRNG so permutation generation does not pull in
/// the `rand` dependency tree. See the module documentation for usage details.
pub mod rng;
