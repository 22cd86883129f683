//! Physical constant tables consumed by the forward model.
//!
//! A [`ConstantSet`] is plain data. Successive model revisions differ only in
//! which literals they use, so each revision is a preset constructor rather
//! than a separate code path.

use serde::{Deserialize, Serialize};

/// Named physical constants in SI units unless noted otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantSet {
    /// Preset label recorded in reports.
    pub label: String,
    /// Speed of light (m/s).
    pub c: f64,
    /// Measured gravitational constant (m³ kg⁻¹ s⁻²).
    pub g_real: f64,
    /// Measured fine-structure constant.
    pub alpha_real: f64,
    /// Planck length (m).
    pub planck_length: f64,
    /// Solar mass (kg).
    pub solar_mass: f64,
    /// Mass of Sagittarius A* in solar masses.
    pub sgr_a_solar_masses: f64,
    /// Reference Bekenstein-Hawking entropy of Sagittarius A*.
    pub sgr_a_entropy: f64,
    /// CMB fluctuation amplitude.
    pub a_cmb_real: f64,
    /// Observed cosmological constant (m⁻²).
    pub lambda_real: f64,
    /// Reduced Planck constant (J s).
    pub hbar: f64,
    /// Reduced Planck constant in GeV s.
    pub hbar_gev_s: f64,
    /// Surface gravity used by the interferometer prediction (m/s²).
    pub surface_gravity: f64,
    /// Electroweak vacuum expectation value (GeV).
    pub electroweak_vev_gev: f64,
    /// Measured Higgs boson mass (GeV).
    pub higgs_mass_gev: f64,
    /// Proton mass (GeV).
    pub proton_mass_gev: f64,
    /// Grand-unification scale used for proton decay (GeV).
    pub gut_scale_gev: f64,
    /// Experimental lower bound on the proton lifetime (years).
    pub proton_lifetime_bound_years: f64,
    /// Seconds in a Julian year.
    pub seconds_per_year: f64,
    /// Hard-coded unit scaling factor of the earliest revisions.
    pub legacy_unit_scaling: f64,
}

impl ConstantSet {
    /// Constants of the final unified revision.
    pub fn unified() -> Self {
        Self {
            label: "unified".to_string(),
            c: 2.997_924_58e8,
            g_real: 6.674_30e-11,
            alpha_real: 1.0 / 137.036,
            planck_length: 1.616e-35,
            solar_mass: 1.989e30,
            sgr_a_solar_masses: 4.3e6,
            sgr_a_entropy: 7.23e90,
            a_cmb_real: 1e-5,
            lambda_real: 1.1056e-52,
            hbar: 1.054_571_817e-34,
            hbar_gev_s: 6.582_119_569e-25,
            surface_gravity: 9.81,
            electroweak_vev_gev: 246.22,
            higgs_mass_gev: 125.25,
            proton_mass_gev: 0.938_272_088,
            gut_scale_gev: 2e16,
            proton_lifetime_bound_years: 1.6e34,
            seconds_per_year: 3.155_76e7,
            legacy_unit_scaling: 1.29e43,
        }
    }

    /// Rounded constants used by the first revisions of the model.
    pub fn legacy() -> Self {
        Self {
            label: "legacy".to_string(),
            c: 3e8,
            lambda_real: 1.11e-52,
            hbar: 1.054e-34,
            ..Self::unified()
        }
    }

    /// Mass of Sagittarius A* in kilograms.
    pub fn sgr_a_mass_kg(&self) -> f64 {
        self.sgr_a_solar_masses * self.solar_mass
    }
}

impl Default for ConstantSet {
    fn default() -> Self {
        Self::unified()
    }
}
