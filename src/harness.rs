//! Batch run orchestration.
//!
//! A single trial is "generate a chain, analyze it". The harness composes trials
//! into the two run shapes the tool is used in:
//!
//! - single runs that keep the full report (including the stride histogram) for
//!   inspection, and
//! - averaged runs that repeat generate+analyze many times and keep only the mean
//!   coverage, for judging a strategy statistically rather than from one lucky draw.
//!
//! A [`Suite`] bundles the standard size ladder for both shapes; the CLI executes
//! the default suite, tests build smaller ones.

use tracing::{debug, info};

use crate::analyzer::{analyze, ChainReport};
use crate::generator::GeneratorKind;
use crate::ChaseResult;

/// One generate-and-analyze run: which strategy, how many slots, and optionally a
/// fixed seed for reproducibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct TrialConfig {
    /// The permutation strategy to run.
    pub kind: GeneratorKind,
    /// Number of slots in the generated chain.
    pub len: usize,
    /// Fixed RNG seed; `None` seeds from system timing entropy.
    pub seed: Option<u64>,
}

impl TrialConfig {
    /// Creates a trial of `kind` over `len` slots, entropy-seeded.
    #[must_use]
    pub fn new(kind: GeneratorKind, len: usize) -> Self {
        Self {
            kind,
            len,
            seed: None,
        }
    }

    /// Pins the trial to a fixed seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Runs one trial: build the configured generator, generate a chain, analyze it.
///
/// # Errors
///
/// Propagates generator and analyzer failures ([`ChaseError`]). A chain with less
/// than full coverage is *not* an error; it comes back inside the report.
///
/// [`ChaseError`]: crate::ChaseError
pub fn run_trial(config: &TrialConfig) -> ChaseResult<ChainReport> {
    let mut generator = config.kind.build(config.seed);
    let chain = generator.generate(config.len)?;
    let report = analyze(&chain)?;

    info!(
        strategy = generator.name(),
        len = config.len,
        cycle_length = report.cycle_length(),
        coverage = report.coverage_percent(),
        terminal_index = report.terminal_index(),
        "trial complete"
    );
    Ok(report)
}

/// Runs `runs` repetitions of a trial with one generator instance and averages the
/// coverage.
///
/// The generator is built once and its RNG stream continues across repetitions, so
/// every repetition sees a fresh permutation even under a pinned seed.
///
/// # Errors
///
/// Propagates the first generator or analyzer failure.
pub fn run_averaged(config: &TrialConfig, runs: usize) -> ChaseResult<AverageReport> {
    let mut generator = config.kind.build(config.seed);

    let mut coverage_sum = 0.0f64;
    let mut full_coverage_runs = 0usize;
    for run in 0..runs {
        let chain = generator.generate(config.len)?;
        let report = analyze(&chain)?;

        coverage_sum += report.coverage_percent();
        if report.is_hamiltonian() {
            full_coverage_runs += 1;
        }
        debug!(
            run,
            coverage = report.coverage_percent(),
            "averaged repetition complete"
        );
    }

    let mean = if runs == 0 {
        0.0
    } else {
        coverage_sum / runs as f64
    };
    info!(
        strategy = %config.kind,
        len = config.len,
        runs,
        mean_coverage = mean,
        "averaged trial complete"
    );

    Ok(AverageReport {
        kind: config.kind,
        len: config.len,
        runs,
        mean_coverage_percent: mean,
        full_coverage_runs,
    })
}

/// Aggregate of an averaged trial.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct AverageReport {
    /// The strategy that was measured.
    pub kind: GeneratorKind,
    /// Chain length of every repetition.
    pub len: usize,
    /// Number of repetitions.
    pub runs: usize,
    /// Mean coverage over all repetitions.
    pub mean_coverage_percent: f64,
    /// How many repetitions achieved full coverage.
    pub full_coverage_runs: usize,
}

/// The standard batch: per strategy, histogram-bearing single runs over a ladder of
/// sizes, then one averaged pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suite {
    /// Strategies to exercise.
    pub kinds: Vec<GeneratorKind>,
    /// Chain lengths for the single (histogram) runs.
    pub single_lens: Vec<usize>,
    /// Chain length for the averaged pass.
    pub averaged_len: usize,
    /// Repetitions of the averaged pass. Zero skips it.
    pub averaged_runs: usize,
    /// Fixed base seed; `None` seeds each generator from entropy.
    pub seed: Option<u64>,
}

impl Default for Suite {
    /// The sizes the tool has always been run at: two small chains that fit in
    /// cache, two that dwarf it, and a 2 Mi-slot averaged pass over 100 draws.
    fn default() -> Self {
        Self {
            kinds: GeneratorKind::ALL.to_vec(),
            single_lens: vec![128, 1024, 6 << 20, 32 << 20],
            averaged_len: 2 << 20,
            averaged_runs: 100,
            seed: None,
        }
    }
}

impl Suite {
    /// The single (histogram) trials this suite will run, in execution order.
    ///
    /// Exposed separately so callers that cannot afford to hold every report at
    /// once - a 32 Mi-slot histogram is a quarter gigabyte - can run and drop them
    /// one at a time.
    #[must_use]
    pub fn single_configs(&self) -> Vec<TrialConfig> {
        self.kinds
            .iter()
            .flat_map(|&kind| {
                self.single_lens.iter().map(move |&len| TrialConfig {
                    kind,
                    len,
                    seed: self.seed,
                })
            })
            .collect()
    }

    /// The averaged trials this suite will run, one per strategy. Empty when
    /// `averaged_runs` is zero.
    #[must_use]
    pub fn averaged_configs(&self) -> Vec<TrialConfig> {
        if self.averaged_runs == 0 {
            return Vec::new();
        }
        self.kinds
            .iter()
            .map(|&kind| TrialConfig {
                kind,
                len: self.averaged_len,
                seed: self.seed,
            })
            .collect()
    }

    /// Runs every configured trial and collects the outcomes.
    ///
    /// # Errors
    ///
    /// Stops at the first generator or analyzer failure. Partial coverage never
    /// stops a suite; it is aggregated into the outcome.
    pub fn run(&self) -> ChaseResult<SuiteOutcome> {
        let mut trials = Vec::new();
        for config in self.single_configs() {
            let report = run_trial(&config)?;
            trials.push((config, report));
        }

        let mut averages = Vec::new();
        for config in self.averaged_configs() {
            averages.push(run_averaged(&config, self.averaged_runs)?);
        }

        Ok(SuiteOutcome { trials, averages })
    }
}

/// Everything a suite run produced.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SuiteOutcome {
    /// Each single run with its full report, in execution order.
    pub trials: Vec<(TrialConfig, ChainReport)>,
    /// The averaged passes, one per strategy.
    pub averages: Vec<AverageReport>,
}

impl SuiteOutcome {
    /// `true` when every single trial achieved full coverage - the suite-level
    /// verification verdict used for the process exit status.
    #[must_use]
    pub fn all_full_coverage(&self) -> bool {
        self.trials.iter().all(|(_, report)| report.is_hamiltonian())
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ChaseError;

    #[test]
    fn shuffle_trial_reports_full_coverage() {
        let config = TrialConfig::new(GeneratorKind::Shuffle, 128).with_seed(11);
        let report = run_trial(&config).unwrap();

        assert_eq!(report.cycle_length(), 128);
        assert!((report.coverage_percent() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn trial_propagates_short_chain_error() {
        let config = TrialConfig::new(GeneratorKind::Shuffle, 2).with_seed(11);
        assert_eq!(
            run_trial(&config),
            Err(ChaseError::ChainTooShort { len: 2, min: 3 })
        );
    }

    #[test]
    fn seeded_trials_are_reproducible() {
        let config = TrialConfig::new(GeneratorKind::Scatter, 512).with_seed(21);
        let first = run_trial(&config).unwrap();
        let second = run_trial(&config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn averaged_shuffle_coverage_is_always_full() {
        // The shuffle strategy is deterministically correct, so its average over any
        // number of draws is exactly 100.
        let config = TrialConfig::new(GeneratorKind::Shuffle, 4096).with_seed(5);
        let average = run_averaged(&config, 100).unwrap();

        assert_eq!(average.runs, 100);
        assert_eq!(average.full_coverage_runs, 100);
        assert!((average.mean_coverage_percent - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn averaged_scatter_coverage_falls_short() {
        // A uniform random successor permutation splits into several cycles almost
        // surely over enough draws; the mean coverage exposes that.
        let config = TrialConfig::new(GeneratorKind::Scatter, 4096).with_seed(5);
        let average = run_averaged(&config, 50).unwrap();

        assert!(average.mean_coverage_percent < 100.0);
        assert!(average.full_coverage_runs < average.runs);
    }

    #[test]
    fn averaged_with_zero_runs_reports_zero_mean() {
        let config = TrialConfig::new(GeneratorKind::Shuffle, 64).with_seed(1);
        let average = run_averaged(&config, 0).unwrap();
        assert_eq!(average.runs, 0);
        assert!((average.mean_coverage_percent - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn suite_runs_all_combinations() {
        let suite = Suite {
            kinds: GeneratorKind::ALL.to_vec(),
            single_lens: vec![128, 256],
            averaged_len: 512,
            averaged_runs: 10,
            seed: Some(9),
        };
        let outcome = suite.run().unwrap();

        assert_eq!(outcome.trials.len(), 4);
        assert_eq!(outcome.averages.len(), 2);

        for (config, report) in &outcome.trials {
            assert_eq!(report.chain_len(), config.len);
        }
    }

    #[test]
    fn suite_verdict_tracks_shuffle_and_scatter() {
        let shuffle_only = Suite {
            kinds: vec![GeneratorKind::Shuffle],
            single_lens: vec![128, 1024],
            averaged_len: 128,
            averaged_runs: 0,
            seed: Some(3),
        };
        assert!(shuffle_only.run().unwrap().all_full_coverage());

        // Scatter chains of this size essentially never form a single cycle; run a
        // few seeds so the verdict does not hinge on one lucky permutation.
        let mut any_partial = false;
        for seed in 0..8 {
            let scatter_only = Suite {
                kinds: vec![GeneratorKind::Scatter],
                single_lens: vec![2048],
                averaged_len: 128,
                averaged_runs: 0,
                seed: Some(seed),
            };
            if !scatter_only.run().unwrap().all_full_coverage() {
                any_partial = true;
                break;
            }
        }
        assert!(any_partial, "scatter produced 8 full cycles in a row");
    }

    #[test]
    fn suite_enumerates_configs_in_order() {
        let suite = Suite {
            kinds: vec![GeneratorKind::Shuffle, GeneratorKind::Scatter],
            single_lens: vec![8, 16],
            averaged_len: 32,
            averaged_runs: 5,
            seed: Some(2),
        };

        let singles = suite.single_configs();
        assert_eq!(singles.len(), 4);
        assert_eq!(
            singles[0],
            TrialConfig {
                kind: GeneratorKind::Shuffle,
                len: 8,
                seed: Some(2),
            }
        );
        assert_eq!(
            singles[3],
            TrialConfig {
                kind: GeneratorKind::Scatter,
                len: 16,
                seed: Some(2),
            }
        );

        assert_eq!(suite.averaged_configs().len(), 2);
    }

    #[test]
    fn suite_skips_averaged_pass_when_runs_is_zero() {
        let suite = Suite {
            kinds: vec![GeneratorKind::Shuffle],
            single_lens: vec![64],
            averaged_len: 64,
            averaged_runs: 0,
            seed: Some(1),
        };
        assert!(suite.run().unwrap().averages.is_empty());
    }
}
