//! Convenient re-exports for common usage.
//!
//! This module provides a "prelude" that re-exports the most commonly used types
//! from permchase, allowing you to import them all at once.
//!
//! # Usage
//!
//! ```rust
//! use permchase::prelude::*;
//! ```
//!
//! # What's Included
//!
//! - **Generation**: [`ChainGenerator`], [`ShuffleGenerator`], [`ScatterGenerator`],
//!   [`GeneratorKind`]
//! - **Verification**: [`analyze`], [`ChainReport`]
//! - **Data model**: [`SuccessorChain`], [`StrideHistogram`]
//! - **Batch runs**: [`Suite`], [`TrialConfig`], [`run_trial`], [`run_averaged`]
//! - **Error handling**: [`ChaseError`], [`ChaseResult`]
//! - **Randomness**: [`Pcg32`], [`Rng`], [`SeedableRng`]
//!
//! # Example
//!
//! ```rust
//! use permchase::prelude::*;
//!
//! let mut generator = ShuffleGenerator::seeded(7);
//! let chain = generator.generate(128)?;
//! let report = analyze(&chain)?;
//! assert!(report.is_hamiltonian());
//! # Ok::<(), ChaseError>(())
//! ```

pub use crate::analyzer::{analyze, ChainReport};
pub use crate::chain::{SuccessorChain, MIN_CHAIN_LEN};
pub use crate::error::{ChaseError, ChaseResult};
pub use crate::generator::{ChainGenerator, GeneratorKind, ScatterGenerator, ShuffleGenerator};
pub use crate::harness::{
    run_averaged, run_trial, AverageReport, Suite, SuiteOutcome, TrialConfig,
};
pub use crate::histogram::{DisplayRow, StrideHistogram, BAR_WIDTH, DISPLAY_BUCKETS};
pub use crate::rng::{Pcg32, Rng, SeedableRng};
