use egrav_core::{EgravError, ErrorInfo, ParamBounds, ParameterVector, RngHandle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::optimize::{minimize, OptimizeOpts, OptimizeOutcome};

fn default_starts() -> usize {
    1
}

fn default_concurrency() -> usize {
    1
}

/// Restart configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MultiStartOpts {
    /// Number of searches; the first always starts from the configured guess.
    #[serde(default = "default_starts")]
    pub starts: usize,
    /// Master seed for the random starting points.
    #[serde(default)]
    pub seed: u64,
    /// Worker threads used to run searches.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for MultiStartOpts {
    fn default() -> Self {
        Self {
            starts: default_starts(),
            seed: 0,
            concurrency: default_concurrency(),
        }
    }
}

/// Summary of one restart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestartSummary {
    /// Restart index; `0` is the configured guess.
    pub index: usize,
    /// Starting point.
    pub start: ParameterVector,
    /// Best loss reached.
    pub loss: f64,
    /// Whether the search met its tolerance.
    pub converged: bool,
}

/// Winner of a restart batch plus per-restart summaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MultiStartOutcome {
    /// Outcome of the winning restart.
    pub best: OptimizeOutcome,
    /// Index of the winning restart.
    pub best_index: usize,
    /// Every restart in index order.
    pub restarts: Vec<RestartSummary>,
}

/// Starting points for a batch: the guess, then seeded uniform draws.
pub fn restart_points(
    initial: &ParameterVector,
    bounds: &ParamBounds,
    opts: &MultiStartOpts,
) -> Vec<ParameterVector> {
    (0..opts.starts)
        .map(|index| {
            if index == 0 {
                *initial
            } else {
                RngHandle::for_substream(opts.seed, index as u64).uniform_point(bounds)
            }
        })
        .collect()
}

/// Runs independent searches and keeps the lowest final loss.
///
/// Each search owns its own copy of the start and bounds. Ties go to the
/// lowest restart index.
pub fn multi_start<F>(
    objective: F,
    initial: &ParameterVector,
    bounds: &ParamBounds,
    optimizer: &OptimizeOpts,
    opts: &MultiStartOpts,
) -> Result<MultiStartOutcome, EgravError>
where
    F: Fn(&ParameterVector) -> f64 + Sync,
{
    if opts.starts == 0 {
        return Err(EgravError::config(
            "invalid-option",
            "starts",
            "at least one start is required",
        ));
    }
    bounds.validate_guess(initial)?;
    optimizer.validate()?;

    let points = restart_points(initial, bounds, opts);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.concurrency.max(1))
        .build()
        .map_err(|err| EgravError::Config(ErrorInfo::new("thread-pool", err.to_string())))?;

    let outcomes: Result<Vec<OptimizeOutcome>, EgravError> = pool.install(|| {
        points
            .par_iter()
            .map(|start| {
                let start = *start;
                let bounds = *bounds;
                minimize(&objective, &start, &bounds, optimizer)
            })
            .collect()
    });
    let outcomes = outcomes?;

    let mut best_index = 0;
    for (index, outcome) in outcomes.iter().enumerate() {
        if outcome.loss < outcomes[best_index].loss {
            best_index = index;
        }
    }
    let restarts = outcomes
        .iter()
        .enumerate()
        .map(|(index, outcome)| RestartSummary {
            index,
            start: outcome.initial,
            loss: outcome.loss,
            converged: outcome.converged(),
        })
        .collect();
    debug!(
        starts = opts.starts,
        best_index,
        loss = outcomes[best_index].loss,
        "multi-start finished"
    );

    Ok(MultiStartOutcome {
        best: outcomes[best_index].clone(),
        best_index,
        restarts,
    })
}
