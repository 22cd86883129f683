//! The closed-form formula chain from free parameters to derived couplings.
//!
//! Every step is exposed as its own function so the loss can evaluate only
//! the terms it needs. [`evaluate`] runs the whole chain and fails with a
//! domain error naming the first step that is undefined for the inputs.

use std::f64::consts::PI;

use egrav_core::{ConstantSet, EgravError, ErrorInfo, ParameterVector};
use serde::{Deserialize, Serialize};

/// Geometric factor of a 4-simplex, `π² / 2`.
pub const SIMPLEX_FACTOR: f64 = PI * PI / 2.0;

/// How the model's natural units are tied to SI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum UnitScaling {
    /// Back-derive the factor from `G_real`, which makes the physical `G`
    /// equal to `G_real` by construction.
    #[default]
    Derived,
    /// Use a fixed conversion factor.
    Fixed(f64),
}

/// Every intermediate of one forward evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedQuantities {
    /// `1 + 4 (1 - cos(π / N))`.
    pub e_vac_base: f64,
    /// Gauge suppression factor `1 / E_vac_base`.
    pub g_s: f64,
    /// Bare coupling `g_s / (2π N)`.
    pub alpha_bare: f64,
    /// Always [`SIMPLEX_FACTOR`].
    pub simplex_factor: f64,
    /// Dimensionless theoretical gravitational coupling.
    pub g_eff_theoretical: f64,
    /// `α_real / α_bare`.
    pub alpha_correction: f64,
    /// `4 / θ₁²`.
    pub thermo_damping: f64,
    /// Predicted CMB fluctuation amplitude.
    pub a_cmb_predicted: f64,
    /// `A_cmb_real / A_cmb_predicted`.
    pub cmb_correction: f64,
    /// Geometric mean of the three correction ratios.
    pub l_renorm: f64,
    /// Conversion from model units to SI.
    pub unit_scaling_factor: f64,
    /// Physical gravitational constant. Under [`UnitScaling::Derived`] this
    /// is `G_real` up to rounding and carries no predictive content.
    pub g_physical_predicted: f64,
}

fn finite(step: &str, value: f64) -> Result<f64, EgravError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EgravError::domain(step, format!("{step} evaluated to {value}")))
    }
}

fn nonzero(step: &str, what: &str, value: f64) -> Result<f64, EgravError> {
    if value == 0.0 || !value.is_finite() {
        return Err(EgravError::Domain(
            ErrorInfo::new("undefined", format!("{what} is {value}"))
                .with_context("step", step)
                .with_context("divisor", what),
        ));
    }
    Ok(value)
}

/// Lattice vacuum energy `1 + 4 (1 - cos(π / N))`.
pub fn vacuum_energy_base(n: f64) -> Result<f64, EgravError> {
    let n = nonzero("e_vac_base", "n", n)?;
    finite("e_vac_base", 1.0 + 4.0 * (1.0 - (PI / n).cos()))
}

/// Gauge suppression factor `g_s = 1 / E_vac_base`.
pub fn gauge_suppression(n: f64) -> Result<f64, EgravError> {
    let e_vac = nonzero("g_s", "e_vac_base", vacuum_energy_base(n)?)?;
    finite("g_s", 1.0 / e_vac)
}

/// Bare electromagnetic coupling `g_s / (2π N)`.
pub fn bare_coupling(n: f64) -> Result<f64, EgravError> {
    let g_s = gauge_suppression(n)?;
    finite("alpha_bare", g_s / (2.0 * PI * n))
}

/// Entropy ratio `4 / θ₁²`.
pub fn thermo_damping(theta_1: f64) -> Result<f64, EgravError> {
    let theta_1 = nonzero("thermo_damping", "theta_1", theta_1)?;
    finite("thermo_damping", 4.0 / (theta_1 * theta_1))
}

/// Predicted CMB amplitude `θ₁ / (prefactor · π · N)²`.
pub fn cmb_amplitude(theta_1: f64, cmb_prefactor: f64, n: f64) -> Result<f64, EgravError> {
    let scale = cmb_prefactor * PI * n;
    let denom = nonzero("a_cmb_predicted", "cmb_prefactor * pi * n", scale * scale)?;
    finite("a_cmb_predicted", theta_1 / denom)
}

/// Evaluates the chain with the unit scaling back-derived from `G_real`.
pub fn evaluate(
    params: &ParameterVector,
    constants: &ConstantSet,
) -> Result<DerivedQuantities, EgravError> {
    evaluate_with(params, constants, UnitScaling::Derived)
}

/// Evaluates the chain with an explicit unit scaling mode.
pub fn evaluate_with(
    params: &ParameterVector,
    constants: &ConstantSet,
    scaling: UnitScaling,
) -> Result<DerivedQuantities, EgravError> {
    let e_vac_base = vacuum_energy_base(params.n)?;
    let g_s = gauge_suppression(params.n)?;
    let alpha_bare = bare_coupling(params.n)?;
    let g_eff_theoretical = finite(
        "g_eff_theoretical",
        (alpha_bare * params.epsilon_vac) / SIMPLEX_FACTOR,
    )?;

    let alpha_correction = finite(
        "alpha_correction",
        constants.alpha_real / nonzero("alpha_correction", "alpha_bare", alpha_bare)?,
    )?;
    let thermo_damping = thermo_damping(params.theta_1)?;
    let a_cmb_predicted = cmb_amplitude(params.theta_1, params.cmb_prefactor, params.n)?;
    let cmb_correction = finite(
        "cmb_correction",
        constants.a_cmb_real / nonzero("cmb_correction", "a_cmb_predicted", a_cmb_predicted)?,
    )?;

    let product = alpha_correction * thermo_damping * cmb_correction;
    if product < 0.0 {
        return Err(EgravError::Domain(
            ErrorInfo::new(
                "negative-radicand",
                format!("correction product {product} has no real geometric mean"),
            )
            .with_context("step", "l_renorm")
            .with_hint("alpha_bare, theta_1 and the cmb prefactor must keep the ratios positive"),
        ));
    }
    let l_renorm = finite("l_renorm", product.powf(1.0 / 3.0))?;

    let unit_scaling_factor = match scaling {
        UnitScaling::Derived => {
            let denom = nonzero(
                "unit_scaling_factor",
                "g_eff_theoretical * l_renorm",
                g_eff_theoretical * l_renorm,
            )?;
            finite("unit_scaling_factor", constants.g_real / denom)?
        }
        UnitScaling::Fixed(factor) => finite("unit_scaling_factor", factor)?,
    };
    let g_physical_predicted = finite(
        "g_physical_predicted",
        g_eff_theoretical * unit_scaling_factor * l_renorm,
    )?;

    Ok(DerivedQuantities {
        e_vac_base,
        g_s,
        alpha_bare,
        simplex_factor: SIMPLEX_FACTOR,
        g_eff_theoretical,
        alpha_correction,
        thermo_damping,
        a_cmb_predicted,
        cmb_correction,
        l_renorm,
        unit_scaling_factor,
        g_physical_predicted,
    })
}
