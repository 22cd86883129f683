//! One-off predictions that sit beside the main chain.
//!
//! Each function takes only the inputs it needs and shares no state with
//! [`crate::forward`].

use std::f64::consts::PI;

use egrav_core::{ConstantSet, EgravError};

use crate::forward::thermo_damping;

fn positive(step: &str, what: &str, value: f64) -> Result<f64, EgravError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(EgravError::domain(
            step,
            format!("{what} must be positive and finite, got {value}"),
        ))
    }
}

/// Gravitational-wave echo delays `Δt_n = n · 4GM/c³` for `n = 1..=count`.
pub fn echo_delays(g: f64, mass_kg: f64, c: f64, count: usize) -> Result<Vec<f64>, EgravError> {
    let c = positive("echo_delay", "c", c)?;
    let base = 4.0 * g * mass_kg / c.powi(3);
    if !base.is_finite() {
        return Err(EgravError::domain("echo_delay", "base delay is not finite"));
    }
    Ok((1..=count).map(|n| base * n as f64).collect())
}

/// Interferometer phase shift `m g h T / ħ` in radians.
pub fn quantum_phase_shift(
    mass_kg: f64,
    height_m: f64,
    time_s: f64,
    constants: &ConstantSet,
) -> Result<f64, EgravError> {
    let hbar = positive("phase_shift", "hbar", constants.hbar)?;
    Ok(mass_kg * constants.surface_gravity * height_m * time_s / hbar)
}

/// Horizon area `16π (G M / c²)²` of Sagittarius A*.
pub fn sgr_a_horizon_area(constants: &ConstantSet) -> Result<f64, EgravError> {
    let c = positive("horizon_area", "c", constants.c)?;
    let radius = constants.g_real * constants.sgr_a_mass_kg() / (c * c);
    Ok(16.0 * PI * radius * radius)
}

/// Black-hole entropy of Sagittarius A* with `θ₁²` as the area quantum,
/// `A / (θ₁² L_p²)`.
pub fn black_hole_entropy(theta_1: f64, constants: &ConstantSet) -> Result<f64, EgravError> {
    let cell = theta_1 * theta_1 * constants.planck_length * constants.planck_length;
    let cell = positive("bh_entropy", "theta_1^2 * planck_length^2", cell)?;
    Ok(sgr_a_horizon_area(constants)? / cell)
}

/// Deviation of the entropy ratio from unity, `|4 / θ₁² - 1|`.
pub fn entropy_deviation(theta_1: f64) -> Result<f64, EgravError> {
    Ok((thermo_damping(theta_1)? - 1.0).abs())
}

/// Factor that rescales `ε_vac` onto the observed cosmological constant.
pub fn dark_energy_correction(epsilon_vac: f64, lambda_real: f64) -> Result<f64, EgravError> {
    let epsilon_vac = positive("dark_energy_correction", "epsilon_vac", epsilon_vac)?;
    Ok(lambda_real / epsilon_vac)
}

/// Higgs mass suppressed from the electroweak scale, `v · g_s / 2` in GeV.
pub fn higgs_mass_suppression(g_s: f64, constants: &ConstantSet) -> Result<f64, EgravError> {
    let g_s = positive("higgs_mass", "g_s", g_s)?;
    Ok(constants.electroweak_vev_gev * g_s / 2.0)
}

/// Proton lifetime `M_X⁴ / (α² m_p⁵)` converted to years.
pub fn proton_lifetime_years(alpha_bare: f64, constants: &ConstantSet) -> Result<f64, EgravError> {
    let alpha = positive("proton_lifetime", "alpha_bare", alpha_bare)?;
    let m_p = positive("proton_lifetime", "proton_mass", constants.proton_mass_gev)?;
    let year = positive("proton_lifetime", "seconds_per_year", constants.seconds_per_year)?;
    let natural = constants.gut_scale_gev.powi(4) / (alpha * alpha * m_p.powi(5));
    let years = natural * constants.hbar_gev_s / year;
    if years.is_finite() {
        Ok(years)
    } else {
        Err(EgravError::domain("proton_lifetime", "lifetime is not finite"))
    }
}
