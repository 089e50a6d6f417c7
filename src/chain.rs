//! Successor-chain data model.
//!
//! A [`SuccessorChain`] is the array representation of a cyclic singly-linked list:
//! slot `i` holds the index of the slot visited after `i`. Benchmark kernels chase
//! these indices the way they would chase pointers, so the quality of the permutation
//! directly controls how well the workload defeats caches and prefetchers.
//!
//! The chain owns its storage. Generators allocate one, hand it to the caller, and
//! scope-based ownership releases it - there is no manual lifetime management and no
//! shared references into the buffer.

use crate::{ChaseError, ChaseResult};

/// The smallest chain the generators accept.
///
/// With fewer than three slots there is no interior to randomize: the only cycles over
/// one or two slots are the trivial ones, and the reference algorithm's shuffle range
/// would be empty or negative. Shorter requests fail fast with
/// [`ChaseError::ChainTooShort`].
pub const MIN_CHAIN_LEN: usize = 3;

/// An index-addressable sequence of machine-word slots, where slot `i` stores the
/// index of its successor in the traversal.
///
/// A chain fresh out of a generator is expected to be a single Hamiltonian cycle over
/// all of its slots; [`analyze`](crate::analyzer::analyze) verifies that instead of
/// trusting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessorChain {
    slots: Vec<usize>,
}

impl SuccessorChain {
    /// Allocates a zero-initialized chain of `len` slots.
    ///
    /// # Errors
    ///
    /// - [`ChaseError::ChainTooShort`] if `len < MIN_CHAIN_LEN`.
    /// - [`ChaseError::Allocation`] if the backing buffer cannot be allocated. Chains
    ///   of tens of millions of slots are routine, so exhaustion is an expected
    ///   failure mode, not a programming error.
    pub fn with_len(len: usize) -> ChaseResult<Self> {
        if len < MIN_CHAIN_LEN {
            return Err(ChaseError::ChainTooShort {
                len,
                min: MIN_CHAIN_LEN,
            });
        }

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(len)
            .map_err(|_reserve_error| ChaseError::Allocation {
                len,
                bytes: len.saturating_mul(std::mem::size_of::<usize>()),
            })?;
        slots.resize(len, 0);

        Ok(Self { slots })
    }

    /// Returns the number of slots in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the chain has no slots.
    ///
    /// Never true for a chain built through [`SuccessorChain::with_len`], which
    /// enforces [`MIN_CHAIN_LEN`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the successor index stored in `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of bounds. The analyzer only ever walks indices that
    /// came out of the chain itself, which [`set_successor`](Self::set_successor)
    /// keeps in bounds.
    #[must_use]
    pub fn successor_of(&self, slot: usize) -> usize {
        self.slots[slot]
    }

    /// Returns the successor index stored in `slot`, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<usize> {
        self.slots.get(slot).copied()
    }

    /// Stores `successor` as the slot visited after `slot`.
    ///
    /// This is how generators write their traversal order into the chain, and how
    /// tests corrupt single entries to exercise the analyzer's defect detection.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds; a successor pointing outside the
    /// chain would turn the traversal into an out-of-bounds chase.
    pub fn set_successor(&mut self, slot: usize, successor: usize) {
        assert!(
            successor < self.slots.len(),
            "successor {successor} out of bounds for chain of {} slots",
            self.slots.len()
        );
        self.slots[slot] = successor;
    }

    /// Returns the raw slot buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.slots
    }
}
