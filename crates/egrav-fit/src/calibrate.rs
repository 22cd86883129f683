use egrav_core::{
    default_initial_guess, round_sig, stable_hash_string, ConstantSet, EgravError, ParamBounds,
    ParamName, ParameterVector,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::loss::{loss_terms, weighted_loss, LossTerms, LossWeights};
use crate::multistart::{multi_start, MultiStartOpts, RestartSummary};
use crate::optimize::{minimize_with_fixed, OptimizeOpts, Termination};

/// Treatment of the lattice size `N` once the continuous search is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LatticePolicy {
    /// Keep the continuous optimum.
    Continuous,
    /// Round `N` to the nearest integer inside its bound, then refit the
    /// other components with `N` held.
    #[default]
    RoundAfterFit,
}

/// Full calibration configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalibrationOpts {
    /// Starting point of the first search.
    #[serde(default = "default_initial_guess")]
    pub initial: ParameterVector,
    /// Search box.
    #[serde(default)]
    pub bounds: ParamBounds,
    /// Simplex options shared by every restart.
    #[serde(default)]
    pub optimizer: OptimizeOpts,
    /// Loss term weights.
    #[serde(default)]
    pub weights: LossWeights,
    /// Restart options.
    #[serde(default)]
    pub multi_start: MultiStartOpts,
    /// Post-fit handling of `N`.
    #[serde(default)]
    pub lattice: LatticePolicy,
}

impl Default for CalibrationOpts {
    fn default() -> Self {
        Self {
            initial: default_initial_guess(),
            bounds: ParamBounds::default(),
            optimizer: OptimizeOpts::default(),
            weights: LossWeights::default(),
            multi_start: MultiStartOpts::default(),
            lattice: LatticePolicy::default(),
        }
    }
}

impl CalibrationOpts {
    /// Checks every option before any search runs.
    pub fn validate(&self) -> Result<(), EgravError> {
        self.bounds.validate_guess(&self.initial)?;
        self.optimizer.validate()?;
        self.weights.validate()?;
        if self.lattice == LatticePolicy::RoundAfterFit {
            let interval = self.bounds.n;
            if interval.min.ceil() > interval.max.floor() {
                return Err(EgravError::config(
                    "no-integer-in-bound",
                    ParamName::N.as_str(),
                    format!(
                        "bound [{}, {}] contains no integer lattice size",
                        interval.min, interval.max
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Calibrated parameters and the diagnostics of the search behind them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalibrationFit {
    /// Label of the constant preset fitted against.
    pub constants_label: String,
    /// Final parameters after the lattice policy.
    pub params: ParameterVector,
    /// Loss at [`CalibrationFit::params`].
    pub loss: f64,
    /// Weights the loss was computed with.
    pub weights: LossWeights,
    /// Loss terms at [`CalibrationFit::params`] when defined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms: Option<LossTerms>,
    /// Continuous optimum before the lattice policy.
    pub continuous_params: ParameterVector,
    /// Loss at the continuous optimum.
    pub continuous_loss: f64,
    /// Loss at the configured initial guess.
    pub initial_loss: f64,
    /// Whether the winning search met its tolerance.
    pub converged: bool,
    /// Iterations of the winning search.
    pub iterations: usize,
    /// Objective evaluations of the winning search and the lattice refit.
    pub evaluations: usize,
    /// Per-restart summaries.
    pub restarts: Vec<RestartSummary>,
    /// Policy applied to `N`.
    pub lattice: LatticePolicy,
    /// Stable hash of the fitted payload.
    pub fit_hash: String,
}

/// Rounds `N` to the nearest integer that lies inside its bound.
pub fn round_lattice(params: &ParameterVector, bounds: &ParamBounds) -> ParameterVector {
    let interval = bounds.n;
    let rounded = params
        .n
        .round()
        .clamp(interval.min.ceil(), interval.max.floor());
    params.with(ParamName::N, rounded)
}

/// Fits the free parameters against `constants`.
///
/// The returned loss never exceeds the loss at `opts.initial`; a lattice
/// refit that cannot beat the initial guess falls back to it.
pub fn calibrate(
    constants: &ConstantSet,
    opts: &CalibrationOpts,
) -> Result<CalibrationFit, EgravError> {
    opts.validate()?;
    info!(
        constants = %constants.label,
        starts = opts.multi_start.starts,
        lattice = ?opts.lattice,
        "starting calibration"
    );

    let objective = |params: &ParameterVector| weighted_loss(params, constants, &opts.weights);
    let batch = multi_start(
        &objective,
        &opts.initial,
        &opts.bounds,
        &opts.optimizer,
        &opts.multi_start,
    )?;
    let best = batch.best;
    if best.termination == Termination::MaxIterations {
        warn!(
            iterations = best.iterations,
            loss = best.loss,
            "simplex search stopped at the iteration limit; reporting best point found"
        );
    }

    let mut evaluations = best.evaluations;
    let mut params = match opts.lattice {
        LatticePolicy::Continuous => best.params,
        LatticePolicy::RoundAfterFit => {
            let rounded = round_lattice(&best.params, &opts.bounds);
            let refit = minimize_with_fixed(
                &objective,
                &rounded,
                &opts.bounds,
                &[ParamName::N],
                &opts.optimizer,
            )?;
            evaluations += refit.evaluations;
            refit.params
        }
    };
    let mut loss = objective(&params);
    let initial_loss = objective(&opts.initial);
    if loss > initial_loss {
        warn!(
            loss,
            initial_loss,
            n = params.n,
            "lattice fit is worse than the initial guess; keeping the initial guess"
        );
        params = opts.initial;
        loss = initial_loss;
    }
    let terms = loss_terms(&params, constants).ok();

    let fit_hash = stable_hash_string(&(
        &constants.label,
        params.to_array().map(round_sig),
        round_sig(loss),
        opts.lattice,
    ))?;

    info!(
        n = params.n,
        theta_1 = params.theta_1,
        cmb_prefactor = params.cmb_prefactor,
        epsilon_vac = params.epsilon_vac,
        loss,
        continuous_loss = best.loss,
        "calibration finished"
    );

    Ok(CalibrationFit {
        constants_label: constants.label.clone(),
        params,
        loss,
        weights: opts.weights,
        terms,
        continuous_params: best.params,
        continuous_loss: best.loss,
        initial_loss,
        converged: best.converged(),
        iterations: best.iterations,
        evaluations,
        restarts: batch.restarts,
        lattice: opts.lattice,
        fit_hash,
    })
}
