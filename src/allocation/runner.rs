//! Multi-trial optimizer.
//!
//! [`AllocationOptimizer`] runs independent trials and keeps the best:
//! derive seeds → run trials → select maximum mean fitness.

use super::config::AllocationConfig;
use super::trial::AllocationTrial;
use super::types::Allocation;
use crate::error::Result;
use crate::model::Population;
use crate::random::{create_rng, derive_seeds};
use crate::scoring::Scorer;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, info_span, instrument};

/// Result of an optimizer run.
#[derive(Debug, Clone)]
pub struct AllocationResult {
    /// The winning partition.
    pub best: Allocation,

    /// Index of the winning trial.
    pub best_trial: usize,

    /// Mean group fitness of the winner (same as `best.score`).
    pub best_score: f64,

    /// `(trial index, score)` of every completed trial, by index.
    pub trial_scores: Vec<(usize, f64)>,

    /// Whether trials were skipped because of cancellation or the time limit.
    pub cancelled: bool,
}

/// Runs many allocation trials and keeps the best.
///
/// Trial seeds are derived from the master seed up front, so with a fixed
/// seed the result does not depend on scheduling. Ties go to the lowest
/// trial index.
///
/// # Usage
///
/// ```ignore
/// let scorer = Scorer::new(scoring, &dimensions, 6)?;
/// let config = AllocationConfig::default().with_trials(50).with_seed(42);
/// let result = AllocationOptimizer::run(&scorer, &females, &config)?;
/// println!("best score: {}", result.best_score);
/// ```
pub struct AllocationOptimizer;

impl AllocationOptimizer {
    /// Runs the optimizer.
    pub fn run(
        scorer: &Scorer,
        population: &Population,
        config: &AllocationConfig,
    ) -> Result<AllocationResult> {
        Self::run_with_cancel(scorer, population, config, None)
    }

    /// Runs the optimizer with an optional cancellation token.
    ///
    /// The flag and the time limit are checked before each trial starts.
    /// Skipped trials leave no trace in the result. Trial 0 always runs.
    #[instrument(skip_all, fields(population = population.name(), trials = config.trials))]
    pub fn run_with_cancel(
        scorer: &Scorer,
        population: &Population,
        config: &AllocationConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AllocationResult> {
        let trial = AllocationTrial::new(scorer, population, config)?;
        let seeds = derive_seeds(config.seed, config.trials);
        let start = Instant::now();
        let deadline = config.time_limit_ms.map(Duration::from_millis);

        let stop = || {
            cancel
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
                || deadline.is_some_and(|d| start.elapsed() >= d)
        };
        let run_one = |index: usize| -> Result<Allocation> {
            let span = info_span!("trial", index);
            let _guard = span.enter();
            let outcome = trial.run(&mut create_rng(seeds[index]));
            if let Ok(allocation) = &outcome {
                info!(
                    score = allocation.score,
                    unmatched = allocation.unmatched.len(),
                    "trial complete"
                );
            }
            outcome
        };
        let run_unless_stopped = |index: usize| (!stop()).then(|| run_one(index));

        let first = run_one(0)?;

        #[cfg(feature = "parallel")]
        let outcomes: Vec<Option<Result<Allocation>>> = if config.parallel {
            (1..seeds.len()).into_par_iter().map(run_unless_stopped).collect()
        } else {
            (1..seeds.len()).map(run_unless_stopped).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<Option<Result<Allocation>>> =
            (1..seeds.len()).map(run_unless_stopped).collect();

        let cancelled = outcomes.iter().any(Option::is_none);
        let mut trial_scores = Vec::with_capacity(seeds.len());
        trial_scores.push((0, first.score));
        let (mut best_trial, mut best) = (0, first);
        for (index, outcome) in (1..).zip(outcomes) {
            let Some(outcome) = outcome else {
                continue;
            };
            let allocation = outcome?;
            trial_scores.push((index, allocation.score));
            if allocation.score > best.score {
                best_trial = index;
                best = allocation;
            }
        }

        info!(
            best_trial,
            best_score = best.score,
            completed = trial_scores.len(),
            cancelled,
            "allocation complete"
        );
        Ok(AllocationResult {
            best_score: best.score,
            best,
            best_trial,
            trial_scores,
            cancelled,
        })
    }
}
