use egrav_core::{
    stable_hash_string, to_canonical_json_bytes, ConstantSet, EgravError, ParameterVector,
};
use egrav_fit::{loss, weighted_loss, CalibrationFit};
use egrav_model::auxiliary::{
    black_hole_entropy, dark_energy_correction, echo_delays, higgs_mass_suppression,
    proton_lifetime_years, quantum_phase_shift,
};
use egrav_model::{evaluate, DerivedQuantities};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tier::{relative_error_pct, Tier};

/// Note attached to rows whose quantity cannot be computed.
pub const UNDEFINED_NOTE: &str = "undefined for these parameters";

const ECHO_SOLAR_MASSES: f64 = 60.0;
const ECHO_COUNT: usize = 3;
const INTERFEROMETER_MASS_KG: f64 = 2.2e-25;
const INTERFEROMETER_HEIGHT_M: f64 = 0.1;
const INTERFEROMETER_TIME_S: f64 = 0.2;

/// One predicted quantity compared with its measured counterpart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comparison {
    /// Stable identifier.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Model value, absent when undefined.
    pub predicted: Option<f64>,
    /// Measured value.
    pub real: f64,
    /// Relative error in percent.
    pub error_pct: Option<f64>,
    /// Agreement tier.
    pub tier: Option<Tier>,
    /// Caveat shown beside the row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A model output with no measured counterpart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    /// Stable identifier.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Model value, absent when undefined.
    pub value: Option<f64>,
    /// Unit of the value.
    pub unit: String,
    /// Caveat shown beside the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Every comparison and prediction for one parameter vector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgreementReport {
    /// Constant preset the report was computed against.
    pub constants_label: String,
    /// Parameters the report describes.
    pub params: ParameterVector,
    /// Calibration loss at the parameters.
    pub loss: f64,
    /// Compared quantities in display order.
    pub comparisons: Vec<Comparison>,
    /// Uncompared predictions in display order.
    pub predictions: Vec<Prediction>,
    /// Content hash of the payload above.
    pub report_hash: String,
}

impl AgreementReport {
    /// Looks up a comparison by identifier.
    pub fn comparison(&self, name: &str) -> Option<&Comparison> {
        self.comparisons.iter().find(|row| row.name == name)
    }

    /// Looks up a prediction by identifier.
    pub fn prediction(&self, name: &str) -> Option<&Prediction> {
        self.predictions.iter().find(|row| row.name == name)
    }

    /// Number of rows in the given tier.
    pub fn count(&self, tier: Tier) -> usize {
        self.comparisons
            .iter()
            .filter(|row| row.tier == Some(tier))
            .count()
    }

    /// Number of rows that could not be computed.
    pub fn undefined(&self) -> usize {
        self.comparisons
            .iter()
            .filter(|row| row.predicted.is_none())
            .count()
    }

    /// Canonical JSON encoding of the report.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EgravError> {
        to_canonical_json_bytes(self)
    }
}

fn undefined_note(err: &EgravError) -> String {
    match err.step() {
        Some(step) => format!("{UNDEFINED_NOTE} ({step})"),
        None => UNDEFINED_NOTE.to_string(),
    }
}

fn compare(
    name: &str,
    label: &str,
    predicted: Result<f64, EgravError>,
    real: f64,
    note: Option<&str>,
) -> Comparison {
    let outcome = predicted.and_then(|value| Ok((value, relative_error_pct(value, real)?)));
    match outcome {
        Ok((value, error_pct)) => Comparison {
            name: name.to_string(),
            label: label.to_string(),
            predicted: Some(value),
            real,
            error_pct: Some(error_pct),
            tier: Some(Tier::classify(error_pct)),
            note: note.map(str::to_string),
        },
        Err(err) => {
            debug!(quantity = name, error = %err, "quantity undefined");
            Comparison {
                name: name.to_string(),
                label: label.to_string(),
                predicted: None,
                real,
                error_pct: None,
                tier: None,
                note: Some(undefined_note(&err)),
            }
        }
    }
}

fn predict(name: &str, label: &str, value: Result<f64, EgravError>, unit: &str) -> Prediction {
    let (value, note) = match value {
        Ok(value) => (Some(value), None),
        Err(err) => (None, Some(undefined_note(&err))),
    };
    Prediction {
        name: name.to_string(),
        label: label.to_string(),
        value,
        unit: unit.to_string(),
        note,
    }
}

fn field(
    derived: &Result<DerivedQuantities, EgravError>,
    pick: impl Fn(&DerivedQuantities) -> f64,
) -> Result<f64, EgravError> {
    derived.as_ref().map(pick).map_err(Clone::clone)
}

fn comparisons(
    params: &ParameterVector,
    constants: &ConstantSet,
    derived: &Result<DerivedQuantities, EgravError>,
) -> Vec<Comparison> {
    vec![
        compare(
            "fine_structure",
            "Fine-structure constant",
            egrav_model::bare_coupling(params.n),
            constants.alpha_real,
            None,
        ),
        compare(
            "thermo_damping",
            "Thermodynamic damping",
            egrav_model::thermo_damping(params.theta_1),
            1.0,
            None,
        ),
        compare(
            "cmb_amplitude",
            "CMB fluctuation amplitude",
            egrav_model::cmb_amplitude(params.theta_1, params.cmb_prefactor, params.n),
            constants.a_cmb_real,
            None,
        ),
        compare(
            "vacuum_energy",
            "Cosmological constant",
            Ok(params.epsilon_vac),
            constants.lambda_real,
            None,
        ),
        compare(
            "gravitational_constant",
            "Gravitational constant",
            field(derived, |d| d.g_physical_predicted),
            constants.g_real,
            Some("consistency check: unit scaling is back-derived from G"),
        ),
        compare(
            "bh_entropy",
            "Black hole entropy (Sgr A*)",
            black_hole_entropy(params.theta_1, constants),
            constants.sgr_a_entropy,
            None,
        ),
        compare(
            "higgs_mass",
            "Higgs mass",
            egrav_model::gauge_suppression(params.n)
                .and_then(|g_s| higgs_mass_suppression(g_s, constants)),
            constants.higgs_mass_gev,
            None,
        ),
    ]
}

fn predictions(
    params: &ParameterVector,
    constants: &ConstantSet,
    derived: &Result<DerivedQuantities, EgravError>,
) -> Vec<Prediction> {
    let mut rows = vec![
        predict("g_s", "Gauge suppression g_s", field(derived, |d| d.g_s), ""),
        predict(
            "alpha_bare",
            "Bare coupling α_bare",
            field(derived, |d| d.alpha_bare),
            "",
        ),
        predict(
            "l_renorm",
            "Renormalization factor L_renorm",
            field(derived, |d| d.l_renorm),
            "",
        ),
        predict(
            "unit_scaling_factor",
            "Unit scaling factor",
            field(derived, |d| d.unit_scaling_factor),
            "",
        ),
    ];

    let mass = ECHO_SOLAR_MASSES * constants.solar_mass;
    let delays = field(derived, |d| d.g_physical_predicted)
        .and_then(|g| echo_delays(g, mass, constants.c, ECHO_COUNT));
    for n in 1..=ECHO_COUNT {
        let value = delays.as_ref().map(|d| d[n - 1]).map_err(Clone::clone);
        rows.push(predict(
            &format!("echo_delay_{n}"),
            &format!("GW echo {n} delay (60 M☉)"),
            value,
            "s",
        ));
    }

    rows.push(predict(
        "phase_shift",
        "Interferometer phase shift",
        quantum_phase_shift(
            INTERFEROMETER_MASS_KG,
            INTERFEROMETER_HEIGHT_M,
            INTERFEROMETER_TIME_S,
            constants,
        ),
        "rad",
    ));
    rows.push(predict(
        "dark_energy_correction",
        "Dark-energy correction Λ/ε_vac",
        dark_energy_correction(params.epsilon_vac, constants.lambda_real),
        "",
    ));

    let mut lifetime = predict(
        "proton_lifetime",
        "Proton lifetime",
        field(derived, |d| d.alpha_bare).and_then(|a| proton_lifetime_years(a, constants)),
        "yr",
    );
    if let Some(years) = lifetime.value {
        lifetime.note = Some(if years > constants.proton_lifetime_bound_years {
            format!("above the {:.1e} yr bound", constants.proton_lifetime_bound_years)
        } else {
            format!("excluded by the {:.1e} yr bound", constants.proton_lifetime_bound_years)
        });
    }
    rows.push(lifetime);
    rows
}

/// Verifies the parameters of a calibration run, scoring them with the
/// fit's loss weights.
pub fn verify_fit(
    fit: &CalibrationFit,
    constants: &ConstantSet,
) -> Result<AgreementReport, EgravError> {
    build(
        &fit.params,
        constants,
        weighted_loss(&fit.params, constants, &fit.weights),
    )
}

/// Recomputes every quantity at `params` and classifies each comparison.
///
/// Undefined quantities become rows with no prediction and an
/// [`UNDEFINED_NOTE`] note; they never abort the report. The only error is
/// a failure to hash the finished payload.
pub fn verify(
    params: &ParameterVector,
    constants: &ConstantSet,
) -> Result<AgreementReport, EgravError> {
    build(params, constants, loss(params, constants))
}

fn build(
    params: &ParameterVector,
    constants: &ConstantSet,
    loss: f64,
) -> Result<AgreementReport, EgravError> {
    let derived = evaluate(params, constants);
    let comparisons = comparisons(params, constants, &derived);
    let predictions = predictions(params, constants, &derived);
    let report_hash = stable_hash_string(&(
        &constants.label,
        params,
        loss,
        &comparisons,
        &predictions,
    ))?;
    Ok(AgreementReport {
        constants_label: constants.label.clone(),
        params: *params,
        loss,
        comparisons,
        predictions,
        report_hash,
    })
}
