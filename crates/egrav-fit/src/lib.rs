#![deny(missing_docs)]
#![doc = "Loss evaluation, bounded derivative-free search and the calibration pipeline that fits the emergent-gravity model to measured constants."]

/// Calibration pipeline tying the search to the lattice policy.
pub mod calibrate;
/// Relative-error loss with penalty containment.
pub mod loss;
/// Seeded restarts over a bounded thread pool.
pub mod multistart;
pub mod optimize;

pub use calibrate::{calibrate, round_lattice, CalibrationFit, CalibrationOpts, LatticePolicy};
pub use loss::{loss, loss_terms, weighted_loss, LossTerms, LossWeights, LOSS_PENALTY};
pub use multistart::{
    multi_start, restart_points, MultiStartOpts, MultiStartOutcome, RestartSummary,
};
pub use optimize::{minimize, minimize_with_fixed, OptimizeOpts, OptimizeOutcome, Termination};
