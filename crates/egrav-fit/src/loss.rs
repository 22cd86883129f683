use egrav_core::{ConstantSet, EgravError, ParameterVector};
use egrav_model::{bare_coupling, cmb_amplitude, thermo_damping};
use serde::{Deserialize, Serialize};

/// Loss reported for any point where a term is undefined.
pub const LOSS_PENALTY: f64 = 1e6;

fn default_weight() -> f64 {
    1.0
}

/// Per-term weights. The default is the plain unweighted sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossWeights {
    /// Weight of the fine-structure term.
    #[serde(default = "default_weight")]
    pub alpha: f64,
    /// Weight of the entropy-ratio term.
    #[serde(default = "default_weight")]
    pub entropy: f64,
    /// Weight of the CMB amplitude term.
    #[serde(default = "default_weight")]
    pub cmb: f64,
    /// Weight of the vacuum-energy term.
    #[serde(default = "default_weight")]
    pub vacuum: f64,
}

impl Default for LossWeights {
    fn default() -> Self {
        Self {
            alpha: default_weight(),
            entropy: default_weight(),
            cmb: default_weight(),
            vacuum: default_weight(),
        }
    }
}

impl LossWeights {
    /// Rejects negative or non-finite weights.
    pub fn validate(&self) -> Result<(), EgravError> {
        for (name, weight) in [
            ("alpha", self.alpha),
            ("entropy", self.entropy),
            ("cmb", self.cmb),
            ("vacuum", self.vacuum),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(EgravError::config(
                    "invalid-weight",
                    name,
                    format!("loss weight {name} must be finite and non-negative, got {weight}"),
                ));
            }
        }
        Ok(())
    }
}

/// The four relative-error terms of the loss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossTerms {
    /// `|α_bare − α_real| / α_real`.
    pub alpha: f64,
    /// `|4 / θ₁² − 1|`.
    pub entropy: f64,
    /// `|A_cmb − A_cmb_real| / A_cmb_real`.
    pub cmb: f64,
    /// `|ε_vac − Λ| / Λ`.
    pub vacuum: f64,
}

impl LossTerms {
    /// Weighted sum of the terms.
    pub fn total(&self, weights: &LossWeights) -> f64 {
        weights.alpha * self.alpha
            + weights.entropy * self.entropy
            + weights.cmb * self.cmb
            + weights.vacuum * self.vacuum
    }
}

fn relative_error(step: &str, predicted: f64, real: f64) -> Result<f64, EgravError> {
    if real == 0.0 || !real.is_finite() {
        return Err(EgravError::domain(
            step,
            format!("reference value {real} cannot normalise a relative error"),
        ));
    }
    Ok((predicted - real).abs() / real.abs())
}

/// Evaluates the individual loss terms, surfacing domain errors.
pub fn loss_terms(
    params: &ParameterVector,
    constants: &ConstantSet,
) -> Result<LossTerms, EgravError> {
    let alpha_bare = bare_coupling(params.n)?;
    let damping = thermo_damping(params.theta_1)?;
    let a_cmb = cmb_amplitude(params.theta_1, params.cmb_prefactor, params.n)?;
    Ok(LossTerms {
        alpha: relative_error("alpha_bare", alpha_bare, constants.alpha_real)?,
        entropy: (damping - 1.0).abs(),
        cmb: relative_error("a_cmb_predicted", a_cmb, constants.a_cmb_real)?,
        vacuum: relative_error("epsilon_vac", params.epsilon_vac, constants.lambda_real)?,
    })
}

/// Unweighted loss. Never fails: undefined points score [`LOSS_PENALTY`].
pub fn loss(params: &ParameterVector, constants: &ConstantSet) -> f64 {
    weighted_loss(params, constants, &LossWeights::default())
}

/// Weighted loss with the same penalty containment as [`loss`].
pub fn weighted_loss(
    params: &ParameterVector,
    constants: &ConstantSet,
    weights: &LossWeights,
) -> f64 {
    match loss_terms(params, constants) {
        Ok(terms) => {
            let total = terms.total(weights);
            if total.is_finite() && total >= 0.0 {
                total.min(LOSS_PENALTY)
            } else {
                LOSS_PENALTY
            }
        }
        Err(_) => LOSS_PENALTY,
    }
}
