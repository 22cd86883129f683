//! Plain-text tables for the terminal.

use std::fmt;

use egrav_fit::CalibrationFit;

use crate::report::{AgreementReport, Comparison, Prediction};
use crate::tier::Tier;

const RULE_WIDTH: usize = 96;

fn value_or_dash(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.4e}"),
        None => "-".to_string(),
    }
}

fn rule(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", "-".repeat(RULE_WIDTH))
}

/// Display adapter for an [`AgreementReport`].
pub struct ReportTable<'a>(pub &'a AgreementReport);

impl ReportTable<'_> {
    fn comparison_row(f: &mut fmt::Formatter<'_>, row: &Comparison) -> fmt::Result {
        let error = match row.error_pct {
            Some(pct) => format!("{pct:.3}%"),
            None => "-".to_string(),
        };
        let tier = row.tier.map(|tier| tier.as_str()).unwrap_or("-");
        write!(
            f,
            "{:<30} {:>12} {:>12} {:>10} {:<10}",
            row.label,
            value_or_dash(row.predicted),
            format!("{:.4e}", row.real),
            error,
            tier
        )?;
        match &row.note {
            Some(note) => writeln!(f, " {note}"),
            None => writeln!(f),
        }
    }

    fn prediction_row(f: &mut fmt::Formatter<'_>, row: &Prediction) -> fmt::Result {
        write!(
            f,
            "{:<36} {:>12} {:<4}",
            row.label,
            value_or_dash(row.value),
            row.unit
        )?;
        match &row.note {
            Some(note) => writeln!(f, " {note}"),
            None => writeln!(f),
        }
    }
}

impl fmt::Display for ReportTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let p = &report.params;
        writeln!(f, "Agreement report ({})", report.constants_label)?;
        writeln!(
            f,
            "N = {:.4}, theta_1 = {:.4}, cmb_prefactor = {:.4}, epsilon_vac = {:.4e}, loss = {:.6e}",
            p.n, p.theta_1, p.cmb_prefactor, p.epsilon_vac, report.loss
        )?;
        rule(f)?;
        writeln!(
            f,
            "{:<30} {:>12} {:>12} {:>10} {:<10}",
            "Quantity", "Predicted", "Measured", "Error", "Tier"
        )?;
        rule(f)?;
        for row in &report.comparisons {
            Self::comparison_row(f, row)?;
        }
        rule(f)?;
        writeln!(
            f,
            "Excellent: {}  Good: {}  Poor: {}  Undefined: {}",
            report.count(Tier::Excellent),
            report.count(Tier::Good),
            report.count(Tier::Poor),
            report.undefined()
        )?;
        writeln!(f)?;
        writeln!(f, "Predictions")?;
        rule(f)?;
        for row in &report.predictions {
            Self::prediction_row(f, row)?;
        }
        rule(f)?;
        writeln!(f, "report hash: {}", report.report_hash)
    }
}

/// Display adapter for a [`CalibrationFit`].
pub struct FitSummary<'a>(pub &'a CalibrationFit);

impl fmt::Display for FitSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fit = self.0;
        writeln!(f, "Calibration ({})", fit.constants_label)?;
        rule(f)?;
        let rows = [
            ("N", fit.continuous_params.n, fit.params.n),
            ("theta_1", fit.continuous_params.theta_1, fit.params.theta_1),
            (
                "cmb_prefactor",
                fit.continuous_params.cmb_prefactor,
                fit.params.cmb_prefactor,
            ),
            (
                "epsilon_vac",
                fit.continuous_params.epsilon_vac,
                fit.params.epsilon_vac,
            ),
        ];
        writeln!(f, "{:<16} {:>14} {:>14}", "Parameter", "Continuous", "Final")?;
        for (name, continuous, last) in rows {
            writeln!(f, "{name:<16} {continuous:>14.6e} {last:>14.6e}")?;
        }
        rule(f)?;
        writeln!(f, "initial loss     {:.6e}", fit.initial_loss)?;
        writeln!(f, "continuous loss  {:.6e}", fit.continuous_loss)?;
        writeln!(f, "final loss       {:.6e} ({:?})", fit.loss, fit.lattice)?;
        if let Some(terms) = &fit.terms {
            writeln!(
                f,
                "terms            alpha {:.3e}  entropy {:.3e}  cmb {:.3e}  vacuum {:.3e}",
                terms.alpha, terms.entropy, terms.cmb, terms.vacuum
            )?;
        }
        let status = if fit.converged {
            "converged"
        } else {
            "iteration limit reached"
        };
        writeln!(
            f,
            "search           {status}, {} iterations, {} evaluations, {} start(s)",
            fit.iterations,
            fit.evaluations,
            fit.restarts.len()
        )?;
        writeln!(f, "fit hash: {}", fit.fit_hash)
    }
}

/// Text table of every comparison and prediction in `report`.
pub fn render_report(report: &AgreementReport) -> String {
    ReportTable(report).to_string()
}

/// Text summary of a calibration run.
pub fn render_fit(fit: &CalibrationFit) -> String {
    FitSummary(fit).to_string()
}
