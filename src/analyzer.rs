//! Cycle and stride verification.
//!
//! The analyzer is the correctness check of the whole tool: it takes a successor
//! chain on faith from *any* generator, walks it from slot 0, and reports what the
//! chain actually is - how long the cycle reachable from slot 0 runs, what fraction
//! of the chain it covers, where the walk terminated, and how the hop strides
//! distribute.
//!
//! Full coverage (every slot visited before any slot repeats) is the pass criterion
//! for "this generator produces a valid benchmark permutation". Anything less means
//! the chain decomposed into disjoint cycles - reported as data, never as an error,
//! so statistical batch runs can keep aggregating defective draws.

use tracing::debug;

use crate::chain::SuccessorChain;
use crate::histogram::StrideHistogram;
use crate::{ChaseError, ChaseResult};

/// Walks `chain` from slot 0 and reports cycle length, coverage and stride
/// distribution.
///
/// The walk marks each slot as visited and stops as soon as the *next* slot has been
/// seen before. Each iteration marks one unvisited slot and slots are never
/// unmarked, so the walk terminates after at most N hops. Repeated calls on an
/// unmodified chain return identical reports.
///
/// # Errors
///
/// [`ChaseError::Allocation`] if the visited bitmap or the histogram buckets cannot
/// be allocated. The walk itself cannot fail: every stored successor is in bounds by
/// construction of [`SuccessorChain`].
pub fn analyze(chain: &SuccessorChain) -> ChaseResult<ChainReport> {
    let len = chain.len();

    let mut visited = Vec::new();
    visited
        .try_reserve_exact(len)
        .map_err(|_reserve_error| ChaseError::Allocation {
            len,
            bytes: len,
        })?;
    visited.resize(len, false);

    let mut histogram = StrideHistogram::with_chain_len(len)?;

    let mut cycle_length = 0usize;
    let mut current = 0usize;
    loop {
        visited[current] = true;
        cycle_length += 1;

        let successor = chain.successor_of(current);
        histogram.record(successor as i64 - current as i64);
        current = successor;

        if visited[current] {
            break;
        }
    }

    let report = ChainReport {
        chain_len: len,
        cycle_length,
        terminal_index: current,
        histogram,
    };
    debug!(
        chain_len = len,
        cycle_length,
        coverage = report.coverage_percent(),
        terminal_index = current,
        "chain analyzed"
    );
    Ok(report)
}

/// The result of walking one successor chain.
///
/// Carries the raw measurements; coverage and pass/fail are derived views so they
/// can never disagree with the counts they come from.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainReport {
    chain_len: usize,
    cycle_length: usize,
    terminal_index: usize,
    histogram: StrideHistogram,
}

impl ChainReport {
    /// Number of slots in the analyzed chain.
    #[must_use]
    pub fn chain_len(&self) -> usize {
        self.chain_len
    }

    /// Number of distinct slots visited before the walk hit a repeat.
    /// Always in `[1, chain_len]`.
    #[must_use]
    pub fn cycle_length(&self) -> usize {
        self.cycle_length
    }

    /// The first slot the walk reached twice.
    ///
    /// Slot 0 means the traversal closed cleanly back to its start. Any other value
    /// means the walk ran into a slot of its own path mid-chain - the signature of a
    /// chain that decomposed into multiple cycles.
    #[must_use]
    pub fn terminal_index(&self) -> usize {
        self.terminal_index
    }

    /// `true` if the walk ended by returning to slot 0 rather than colliding with
    /// the middle of its own path.
    #[must_use]
    pub fn returned_to_start(&self) -> bool {
        self.terminal_index == 0
    }

    /// Percentage of all slots visited by the walk. 100.0 exactly when the chain is
    /// one full cycle.
    #[must_use]
    pub fn coverage_percent(&self) -> f64 {
        100.0 * self.cycle_length as f64 / self.chain_len as f64
    }

    /// The pass criterion: did the traversal visit every slot exactly once before
    /// closing?
    #[must_use]
    pub fn is_hamiltonian(&self) -> bool {
        self.cycle_length == self.chain_len
    }

    /// The per-stride histogram recorded during the walk. Its total equals
    /// [`cycle_length`](Self::cycle_length).
    #[must_use]
    pub fn histogram(&self) -> &StrideHistogram {
        &self.histogram
    }

    /// Renders the stride histogram as the fixed 20-row ASCII chart.
    #[must_use]
    pub fn render_histogram(&self) -> String {
        self.histogram.render()
    }

    /// Serializes the report to a compact JSON string.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the report to a pretty-printed JSON string.
    #[cfg(feature = "json")]
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl serde::Serialize for ChainReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("ChainReport", 6)?;
        state.serialize_field("chain_len", &self.chain_len)?;
        state.serialize_field("cycle_length", &self.cycle_length)?;
        state.serialize_field("coverage_percent", &self.coverage_percent())?;
        state.serialize_field("terminal_index", &self.terminal_index)?;
        state.serialize_field("returned_to_start", &self.returned_to_start())?;
        // The raw 2N buckets are too bulky to export; the 20 display rows carry the
        // same information at report granularity.
        state.serialize_field("histogram", &self.histogram.display_rows())?;
        state.end()
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    /// Builds a chain whose slots point wherever the test says.
    fn chain_from(successors: &[usize]) -> SuccessorChain {
        let mut chain = SuccessorChain::with_len(successors.len()).unwrap();
        for (slot, &successor) in successors.iter().enumerate() {
            chain.set_successor(slot, successor);
        }
        chain
    }

    #[test]
    fn identity_cycle_has_full_coverage() {
        // 0 -> 1 -> 2 -> 3 -> 0
        let chain = chain_from(&[1, 2, 3, 0]);
        let report = analyze(&chain).unwrap();

        assert_eq!(report.cycle_length(), 4);
        assert!(report.is_hamiltonian());
        assert!((report.coverage_percent() - 100.0).abs() < f64::EPSILON);
        assert_eq!(report.terminal_index(), 0);
        assert!(report.returned_to_start());
    }

    #[test]
    fn strides_of_identity_cycle() {
        let chain = chain_from(&[1, 2, 3, 0]);
        let report = analyze(&chain).unwrap();

        // Three forward hops of stride 1, one closing hop of stride -3.
        assert_eq!(report.histogram().count(1), 3);
        assert_eq!(report.histogram().count(-3), 1);
        assert_eq!(report.histogram().total(), 4);
    }

    #[test]
    fn self_loop_on_start_is_a_one_cycle() {
        // Slot 0 points at itself; slots 1 and 2 form their own cycle.
        let chain = chain_from(&[0, 2, 1]);
        let report = analyze(&chain).unwrap();

        assert_eq!(report.cycle_length(), 1);
        assert!(!report.is_hamiltonian());
        assert_eq!(report.terminal_index(), 0);
        assert!((report.coverage_percent() - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_cycle_reports_partial_coverage() {
        // Two cycles: 0 -> 1 -> 0 and 2 -> 3 -> 2. Only the first is reachable.
        let chain = chain_from(&[1, 0, 3, 2]);
        let report = analyze(&chain).unwrap();

        assert_eq!(report.cycle_length(), 2);
        assert!((report.coverage_percent() - 50.0).abs() < f64::EPSILON);
        assert!(report.returned_to_start());
    }

    #[test]
    fn corrupted_entry_truncates_the_cycle() {
        // Start from a clean 6-cycle, then corrupt slot 3 to point at itself. The
        // walk visits 0, 1, 2, 3 and then finds 3 already visited.
        let mut chain = chain_from(&[1, 2, 3, 4, 5, 0]);
        chain.set_successor(3, 3);

        let report = analyze(&chain).unwrap();
        assert_eq!(report.cycle_length(), 4);
        assert!(!report.is_hamiltonian());
        assert_eq!(report.terminal_index(), 3);
        assert!(!report.returned_to_start());
    }

    #[test]
    fn rho_shaped_chain_terminates_on_foreign_slot() {
        // 0 -> 1 -> 2 -> 3 -> 1: a tail leading into a loop that does not contain
        // the start. The walk stops on slot 1, mid-path.
        let chain = chain_from(&[1, 2, 3, 1, 0]);
        let report = analyze(&chain).unwrap();

        assert_eq!(report.cycle_length(), 4);
        assert_eq!(report.terminal_index(), 1);
        assert!(!report.returned_to_start());
        assert!(!report.is_hamiltonian());
    }

    #[test]
    fn analysis_is_idempotent() {
        let chain = chain_from(&[2, 0, 4, 1, 3]);
        let first = analyze(&chain).unwrap();
        let second = analyze(&chain).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn histogram_total_equals_cycle_length() {
        let chain = chain_from(&[3, 0, 1, 2, 4]);
        let report = analyze(&chain).unwrap();
        assert_eq!(report.histogram().total(), report.cycle_length() as u64);
    }

    #[test]
    fn report_serializes_with_derived_fields() {
        let chain = chain_from(&[1, 2, 0]);
        let report = analyze(&chain).unwrap();

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["chain_len"], 3);
        assert_eq!(value["cycle_length"], 3);
        assert_eq!(value["coverage_percent"], 100.0);
        assert_eq!(value["returned_to_start"], true);
        assert_eq!(value["histogram"].as_array().unwrap().len(), 20);
    }

    #[cfg(feature = "json")]
    #[test]
    fn report_exports_json_strings() {
        let chain = chain_from(&[1, 2, 0]);
        let report = analyze(&chain).unwrap();

        let compact = report.to_json().unwrap();
        assert!(compact.contains("\"coverage_percent\":100.0"));

        let pretty = report.to_json_pretty().unwrap();
        assert!(pretty.contains("\"cycle_length\": 3"));
    }
}
