#![deny(missing_docs)]
#![doc = "Agreement reports for fitted parameters: tiered comparisons against measured constants, informational predictions and text rendering."]

pub mod render;
/// Comparison rows, predictions and the agreement report.
pub mod report;
/// Agreement tiers.
pub mod tier;

pub use render::{render_fit, render_report, FitSummary, ReportTable};
pub use report::{verify, verify_fit, AgreementReport, Comparison, Prediction, UNDEFINED_NOTE};
pub use tier::{relative_error_pct, Tier, EXCELLENT_BELOW_PCT, GOOD_BELOW_PCT};
