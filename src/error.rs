//! Error and result types for fallible operations.

use std::error::Error;
use std::fmt;
use std::fmt::Display;

/// This enum contains all error messages this library can return. Most fallible API functions
/// will generally return a [`Result<T, ChaseError>`].
///
/// Incomplete cycle coverage is deliberately *not* an error: the analyzer reports it as data
/// (see [`ChainReport`]) so batch runs can continue and aggregate.
///
/// [`Result<T, ChaseError>`]: std::result::Result
/// [`ChainReport`]: crate::analyzer::ChainReport
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChaseError {
    /// The requested chain length is below the minimum the generators support.
    /// A circular chain needs at least three slots before randomizing the interior
    /// means anything.
    ChainTooShort {
        /// The length that was requested.
        len: usize,
        /// The smallest length the generators accept.
        min: usize,
    },
    /// Allocating the successor chain (or an analysis buffer) failed. Chains of tens of
    /// millions of slots are routine for this tool, so exhaustion is surfaced explicitly
    /// instead of aborting.
    Allocation {
        /// The number of slots that could not be allocated.
        len: usize,
        /// The size of the failed request in bytes.
        bytes: usize,
    },
}

/// Shorthand result type for fallible permchase operations.
pub type ChaseResult<T> = Result<T, ChaseError>;

impl Display for ChaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChaseError::ChainTooShort { len, min } => {
                write!(
                    f,
                    "Chain of {} slots is too short: generators require at least {} slots.",
                    len, min
                )
            }
            ChaseError::Allocation { len, bytes } => {
                write!(
                    f,
                    "Failed to allocate {} bytes for a chain of {} slots.",
                    bytes, len
                )
            }
        }
    }
}

impl Error for ChaseError {}
