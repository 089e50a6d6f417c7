//! Command-line driver for permchase.
//!
//! Runs the standard suite - or a custom selection of strategies and sizes - and
//! prints a human-readable verdict per trial: slot count, cycle length, coverage
//! percentage, terminating index, and the 20-bucket stride histogram.
//!
//! # Usage
//!
//! ```bash
//! # The standard batch: both strategies over the full size ladder,
//! # then a 100-run averaged pass per strategy
//! permchase
//!
//! # One reproducible shuffle run with a histogram
//! permchase --generator shuffle --len 1024 --seed 42 --runs 0
//!
//! # Statistical comparison only, skipping the big single runs
//! permchase --len 128 --runs 100 --averaged-len 2097152
//! ```
//!
//! The process exits nonzero if any single trial's traversal covered less than
//! 100% of its chain.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use permchase::{run_averaged, run_trial, ChaseError, GeneratorKind, Suite};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Interior shuffle of the visiting order; single full cycle by construction.
    Shuffle,
    /// Uniformly random successor permutation; coverage not guaranteed.
    Scatter,
}

impl From<StrategyArg> for GeneratorKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Shuffle => GeneratorKind::Shuffle,
            StrategyArg::Scatter => GeneratorKind::Scatter,
        }
    }
}

#[derive(Parser)]
#[command(version, about = "Generate and verify pointer-chase permutations")]
struct Opt {
    /// Chain lengths for the single (histogram) runs; repeatable.
    #[arg(short = 'n', long = "len", value_name = "SLOTS")]
    lens: Vec<usize>,

    /// Strategies to run; repeatable. Default: all of them.
    #[arg(short, long, value_enum)]
    generator: Vec<StrategyArg>,

    /// Fixed RNG seed for reproducible permutations.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Repetitions of the averaged pass per strategy. 0 skips it.
    #[arg(long, default_value_t = 100)]
    runs: usize,

    /// Chain length of the averaged pass.
    #[arg(long, value_name = "SLOTS", default_value_t = 2 << 20)]
    averaged_len: usize,

    /// Suppress the per-trial stride histograms.
    #[arg(long)]
    no_histogram: bool,

    /// Emit one JSON report per single trial instead of text.
    #[cfg(feature = "json")]
    #[arg(long)]
    json: bool,

    /// Log verbosely (overridden by RUST_LOG if set).
    #[arg(short, long)]
    verbose: bool,
}

impl Opt {
    #[cfg(feature = "json")]
    fn json(&self) -> bool {
        self.json
    }

    #[cfg(not(feature = "json"))]
    fn json(&self) -> bool {
        false
    }

    fn suite(&self) -> Suite {
        let defaults = Suite::default();
        Suite {
            kinds: if self.generator.is_empty() {
                defaults.kinds
            } else {
                self.generator.iter().map(|&arg| arg.into()).collect()
            },
            single_lens: if self.lens.is_empty() {
                defaults.single_lens
            } else {
                self.lens.clone()
            },
            averaged_len: self.averaged_len,
            averaged_runs: self.runs,
            seed: self.seed,
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let fallback = if verbose { "permchase=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let opt = Opt::parse();
    init_logging(opt.verbose);

    let suite = opt.suite();
    match run_suite(&suite, !opt.no_histogram, opt.json()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            println!("FAILED: at least one traversal covered less than 100% of its chain");
            ExitCode::FAILURE
        }
        Err(error) => {
            eprintln!("permchase: {error}");
            ExitCode::FAILURE
        }
    }
}

/// Runs the suite trial by trial, printing each report and dropping it before the
/// next one starts; large-chain histograms are too big to accumulate.
///
/// Returns whether every single trial achieved full coverage.
fn run_suite(suite: &Suite, histograms: bool, json: bool) -> Result<bool, ChaseError> {
    let mut all_covered = true;

    for config in suite.single_configs() {
        if !json {
            println!("{}: chain of {} slots", config.kind, config.len);
        }

        let report = run_trial(&config)?;
        if json {
            #[cfg(feature = "json")]
            match report.to_json() {
                Ok(line) => println!("{line}"),
                Err(error) => eprintln!("permchase: failed to serialize report: {error}"),
            }
        } else {
            println!(
                "{}: found cycle of length {} (covering {:.3}%) on index {}",
                config.kind,
                report.cycle_length(),
                report.coverage_percent(),
                report.terminal_index(),
            );
            println!();

            if histograms {
                println!("Histogram of stride lengths");
                print!("{}", report.render_histogram());
                println!();
            }
        }

        all_covered &= report.is_hamiltonian();
    }

    for config in suite.averaged_configs() {
        let average = run_averaged(&config, suite.averaged_runs)?;
        if json {
            #[cfg(feature = "json")]
            match serde_json::to_string(&average) {
                Ok(line) => println!("{line}"),
                Err(error) => eprintln!("permchase: failed to serialize average: {error}"),
            }
        } else {
            println!(
                "{}: for {} slots, average coverage of {:.3}% ({} runs, {} fully covered)",
                average.kind,
                average.len,
                average.mean_coverage_percent,
                average.runs,
                average.full_coverage_runs,
            );
        }
    }

    Ok(all_covered)
}
