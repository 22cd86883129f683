//! Free parameters of the model and their search box.

use serde::{Deserialize, Serialize};

use crate::errors::EgravError;

/// Number of free parameters.
pub const PARAM_COUNT: usize = 4;

/// Identifies a component of [`ParameterVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamName {
    /// Lattice size surrogate `N`.
    N,
    /// Deficit angle `θ₁`.
    Theta1,
    /// Spectral prefactor of the CMB amplitude.
    CmbPrefactor,
    /// Vacuum-energy density `ε_vac`.
    EpsilonVac,
}

impl ParamName {
    /// All components in vector order.
    pub const ALL: [ParamName; PARAM_COUNT] = [
        ParamName::N,
        ParamName::Theta1,
        ParamName::CmbPrefactor,
        ParamName::EpsilonVac,
    ];

    /// Stable identifier used in error context and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamName::N => "n",
            ParamName::Theta1 => "theta_1",
            ParamName::CmbPrefactor => "cmb_prefactor",
            ParamName::EpsilonVac => "epsilon_vac",
        }
    }
}

/// Ordered tuple `(N, θ₁, cmb_prefactor, ε_vac)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterVector {
    /// Lattice size surrogate, optimized as a continuous real.
    pub n: f64,
    /// Deficit angle in radians.
    pub theta_1: f64,
    /// CMB spectral prefactor.
    pub cmb_prefactor: f64,
    /// Dimensionless vacuum-energy density.
    pub epsilon_vac: f64,
}

impl ParameterVector {
    /// Creates a vector from its components.
    pub const fn new(n: f64, theta_1: f64, cmb_prefactor: f64, epsilon_vac: f64) -> Self {
        Self {
            n,
            theta_1,
            cmb_prefactor,
            epsilon_vac,
        }
    }

    /// Returns the components in [`ParamName::ALL`] order.
    pub fn to_array(&self) -> [f64; PARAM_COUNT] {
        [self.n, self.theta_1, self.cmb_prefactor, self.epsilon_vac]
    }

    /// Builds a vector from components in [`ParamName::ALL`] order.
    pub fn from_array(values: [f64; PARAM_COUNT]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }

    /// Returns the named component.
    pub fn get(&self, name: ParamName) -> f64 {
        match name {
            ParamName::N => self.n,
            ParamName::Theta1 => self.theta_1,
            ParamName::CmbPrefactor => self.cmb_prefactor,
            ParamName::EpsilonVac => self.epsilon_vac,
        }
    }

    /// Returns a copy with the named component replaced.
    pub fn with(mut self, name: ParamName, value: f64) -> Self {
        match name {
            ParamName::N => self.n = value,
            ParamName::Theta1 => self.theta_1 = value,
            ParamName::CmbPrefactor => self.cmb_prefactor = value,
            ParamName::EpsilonVac => self.epsilon_vac = value,
        }
        self
    }
}

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Lower bound (inclusive).
    pub min: f64,
    /// Upper bound (inclusive).
    pub max: f64,
}

impl Interval {
    /// Creates an interval without validating it.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns whether the value lies inside the closed interval.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamps the value into the interval.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Width of the interval.
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    fn validate(&self, name: ParamName) -> Result<(), EgravError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(EgravError::config(
                "non-finite-bound",
                name.as_str(),
                format!("bound for {} must be finite", name.as_str()),
            ));
        }
        if self.min >= self.max {
            return Err(EgravError::config(
                "empty-bound",
                name.as_str(),
                format!(
                    "bound for {} is empty or inverted: [{}, {}]",
                    name.as_str(),
                    self.min,
                    self.max
                ),
            ));
        }
        Ok(())
    }
}

/// Per-component search box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamBounds {
    /// Bound on `N`.
    pub n: Interval,
    /// Bound on `θ₁`.
    pub theta_1: Interval,
    /// Bound on the CMB prefactor.
    pub cmb_prefactor: Interval,
    /// Bound on `ε_vac`.
    pub epsilon_vac: Interval,
}

impl ParamBounds {
    /// Returns the named interval.
    pub fn get(&self, name: ParamName) -> Interval {
        match name {
            ParamName::N => self.n,
            ParamName::Theta1 => self.theta_1,
            ParamName::CmbPrefactor => self.cmb_prefactor,
            ParamName::EpsilonVac => self.epsilon_vac,
        }
    }

    /// Returns the intervals in [`ParamName::ALL`] order.
    pub fn to_array(&self) -> [Interval; PARAM_COUNT] {
        [self.n, self.theta_1, self.cmb_prefactor, self.epsilon_vac]
    }

    /// Checks that every interval is finite and non-empty.
    pub fn validate(&self) -> Result<(), EgravError> {
        for name in ParamName::ALL {
            self.get(name).validate(name)?;
        }
        Ok(())
    }

    /// Checks that the bounds are valid and contain the provided point.
    pub fn validate_guess(&self, guess: &ParameterVector) -> Result<(), EgravError> {
        self.validate()?;
        for name in ParamName::ALL {
            let value = guess.get(name);
            let interval = self.get(name);
            if !interval.contains(value) {
                return Err(EgravError::config(
                    "guess-out-of-bounds",
                    name.as_str(),
                    format!(
                        "initial {} = {} lies outside [{}, {}]",
                        name.as_str(),
                        value,
                        interval.min,
                        interval.max
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Returns whether every component lies inside its interval.
    pub fn contains(&self, point: &ParameterVector) -> bool {
        ParamName::ALL
            .iter()
            .all(|name| self.get(*name).contains(point.get(*name)))
    }

    /// Projects a point into the box component-wise.
    pub fn clamp(&self, point: &ParameterVector) -> ParameterVector {
        ParamName::ALL.iter().fold(*point, |acc, name| {
            acc.with(*name, self.get(*name).clamp(point.get(*name)))
        })
    }
}

impl Default for ParamBounds {
    fn default() -> Self {
        Self {
            n: Interval::new(10.0, 50.0),
            theta_1: Interval::new(1.0, 3.0),
            cmb_prefactor: Interval::new(4.0, 12.0),
            epsilon_vac: Interval::new(1e-52, 1.2e-52),
        }
    }
}

/// Initial guess used by the reference calibration run.
pub fn default_initial_guess() -> ParameterVector {
    ParameterVector::new(20.0, 2.0, 8.0, 1.075e-52)
}
