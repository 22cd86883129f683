use std::fmt;

use egrav_core::EgravError;
use serde::{Deserialize, Serialize};

/// Upper bound (exclusive) of the Excellent tier, in percent.
pub const EXCELLENT_BELOW_PCT: f64 = 1.0;
/// Upper bound (exclusive) of the Good tier, in percent.
pub const GOOD_BELOW_PCT: f64 = 10.0;

/// Three-level agreement classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Relative error below 1%.
    Excellent,
    /// Relative error below 10%.
    Good,
    /// Everything else, including non-finite errors.
    Poor,
}

impl Tier {
    /// Classifies a relative error given in percent.
    pub fn classify(error_pct: f64) -> Tier {
        if error_pct < EXCELLENT_BELOW_PCT {
            Tier::Excellent
        } else if error_pct < GOOD_BELOW_PCT {
            Tier::Good
        } else {
            Tier::Poor
        }
    }

    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Excellent => "Excellent",
            Tier::Good => "Good",
            Tier::Poor => "Poor",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `|predicted − real| / |real| · 100`.
pub fn relative_error_pct(predicted: f64, real: f64) -> Result<f64, EgravError> {
    if real == 0.0 || !real.is_finite() {
        return Err(EgravError::domain(
            "relative_error",
            format!("reference value {real} cannot normalise a relative error"),
        ));
    }
    let pct = (predicted - real).abs() / real.abs() * 100.0;
    if pct.is_finite() {
        Ok(pct)
    } else {
        Err(EgravError::domain("relative_error", "relative error is not finite"))
    }
}
