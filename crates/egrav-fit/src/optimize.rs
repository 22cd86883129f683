//! Bounded Nelder–Mead search.
//!
//! The simplex lives in the unit box: each coordinate `u ∈ [0, 1]` maps to
//! `min + u · (max − min)` of its interval, and every trial vertex is
//! clamped back into the box before evaluation. Working in unit coordinates
//! keeps `ε_vac ~ 1e-52` and `N ~ 20` on the same footing.

use egrav_core::{EgravError, ParamBounds, ParamName, ParameterVector, PARAM_COUNT};
use serde::{Deserialize, Serialize};
use tracing::debug;

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

fn default_max_iters() -> usize {
    2_000
}

fn default_f_tol() -> f64 {
    1e-12
}

fn default_x_tol() -> f64 {
    1e-10
}

fn default_initial_step() -> f64 {
    0.05
}

/// Solver configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizeOpts {
    /// Maximum simplex iterations.
    #[serde(default = "default_max_iters")]
    pub max_iters: usize,
    /// Spread of vertex losses below which the search has converged.
    #[serde(default = "default_f_tol")]
    pub f_tol: f64,
    /// Simplex diameter (unit coordinates) below which the search has converged.
    #[serde(default = "default_x_tol")]
    pub x_tol: f64,
    /// Edge length of the initial simplex as a fraction of each interval.
    #[serde(default = "default_initial_step")]
    pub initial_step: f64,
}

impl Default for OptimizeOpts {
    fn default() -> Self {
        Self {
            max_iters: default_max_iters(),
            f_tol: default_f_tol(),
            x_tol: default_x_tol(),
            initial_step: default_initial_step(),
        }
    }
}

impl OptimizeOpts {
    /// Rejects option values the search cannot run with.
    pub fn validate(&self) -> Result<(), EgravError> {
        if self.max_iters == 0 {
            return Err(EgravError::config(
                "invalid-option",
                "max_iters",
                "max_iters must be at least 1",
            ));
        }
        for (name, value) in [("f_tol", self.f_tol), ("x_tol", self.x_tol)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EgravError::config(
                    "invalid-option",
                    name,
                    format!("{name} must be positive and finite, got {value}"),
                ));
            }
        }
        if !(self.initial_step > 0.0 && self.initial_step <= 0.5) {
            return Err(EgravError::config(
                "invalid-option",
                "initial_step",
                format!("initial_step must lie in (0, 0.5], got {}", self.initial_step),
            ));
        }
        Ok(())
    }
}

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Loss spread and simplex size fell below tolerance.
    Converged,
    /// The iteration budget ran out first.
    MaxIterations,
}

/// Result of a single search. Always carries the best point seen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizeOutcome {
    /// Best point evaluated.
    pub params: ParameterVector,
    /// Loss at [`OptimizeOutcome::params`].
    pub loss: f64,
    /// Starting point of the search.
    pub initial: ParameterVector,
    /// Loss at the starting point.
    pub initial_loss: f64,
    /// Simplex iterations performed.
    pub iterations: usize,
    /// Objective evaluations performed.
    pub evaluations: usize,
    /// Stop reason.
    pub termination: Termination,
}

impl OptimizeOutcome {
    /// Whether the tolerance test was met.
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

type Point = [f64; PARAM_COUNT];

struct UnitBox {
    min: Point,
    width: Point,
}

impl UnitBox {
    fn new(bounds: &ParamBounds) -> Self {
        let intervals = bounds.to_array();
        Self {
            min: intervals.map(|interval| interval.min),
            width: intervals.map(|interval| interval.width()),
        }
    }

    fn to_unit(&self, params: &ParameterVector) -> Point {
        let values = params.to_array();
        std::array::from_fn(|i| ((values[i] - self.min[i]) / self.width[i]).clamp(0.0, 1.0))
    }

    fn to_params(&self, unit: &Point) -> ParameterVector {
        ParameterVector::from_array(std::array::from_fn(|i| {
            self.min[i] + unit[i].clamp(0.0, 1.0) * self.width[i]
        }))
    }
}

struct Search<'a, F> {
    objective: F,
    space: &'a UnitBox,
    evaluations: usize,
    best: (ParameterVector, f64),
    pinned: Vec<(ParamName, f64)>,
}

impl<F> Search<'_, F>
where
    F: Fn(&ParameterVector) -> f64,
{
    fn eval_params(&mut self, params: ParameterVector) -> f64 {
        self.evaluations += 1;
        let value = (self.objective)(&params);
        let value = if value.is_nan() { f64::INFINITY } else { value };
        if value < self.best.1 {
            self.best = (params, value);
        }
        value
    }

    fn eval(&mut self, unit: Point) -> (Point, f64) {
        let clamped = unit.map(|u| u.clamp(0.0, 1.0));
        let params = self
            .pinned
            .iter()
            .fold(self.space.to_params(&clamped), |params, &(name, value)| {
                params.with(name, value)
            });
        (clamped, self.eval_params(params))
    }
}

fn blend(from: &Point, to: &Point, t: f64) -> Point {
    std::array::from_fn(|i| from[i] + t * (to[i] - from[i]))
}

fn diameter(simplex: &[(Point, f64)]) -> f64 {
    let best = &simplex[0].0;
    simplex[1..]
        .iter()
        .map(|(vertex, _)| {
            vertex
                .iter()
                .zip(best)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max)
        })
        .fold(0.0, f64::max)
}

fn build_simplex<F>(
    search: &mut Search<'_, F>,
    origin: Point,
    origin_loss: f64,
    free: &[usize],
    step: f64,
) -> Vec<(Point, f64)>
where
    F: Fn(&ParameterVector) -> f64,
{
    let mut simplex = Vec::with_capacity(free.len() + 1);
    simplex.push((origin, origin_loss));
    for &axis in free {
        let mut vertex = origin;
        vertex[axis] = if origin[axis] + step <= 1.0 {
            origin[axis] + step
        } else {
            origin[axis] - step
        };
        simplex.push(search.eval(vertex));
    }
    simplex
}

/// Minimises `objective` inside `bounds` starting from `initial`.
///
/// The returned point is the best one evaluated, so its loss never exceeds
/// the loss at `initial`. Running out of iterations is reported through
/// [`Termination::MaxIterations`], not as an error; only invalid bounds,
/// options or an out-of-box starting point fail.
pub fn minimize<F>(
    objective: F,
    initial: &ParameterVector,
    bounds: &ParamBounds,
    opts: &OptimizeOpts,
) -> Result<OptimizeOutcome, EgravError>
where
    F: Fn(&ParameterVector) -> f64,
{
    minimize_with_fixed(objective, initial, bounds, &[], opts)
}

/// Like [`minimize`], but the components named in `fixed` keep their value
/// from `initial` at every vertex.
///
/// A collapsed simplex is rebuilt once around the best point; the search
/// only reports [`Termination::Converged`] when a rebuilt simplex collapses
/// again without improving the loss by more than `f_tol`.
pub fn minimize_with_fixed<F>(
    objective: F,
    initial: &ParameterVector,
    bounds: &ParamBounds,
    fixed: &[ParamName],
    opts: &OptimizeOpts,
) -> Result<OptimizeOutcome, EgravError>
where
    F: Fn(&ParameterVector) -> f64,
{
    bounds.validate_guess(initial)?;
    opts.validate()?;

    let free: Vec<usize> = ParamName::ALL
        .iter()
        .enumerate()
        .filter(|(_, name)| !fixed.contains(*name))
        .map(|(axis, _)| axis)
        .collect();
    let dim = free.len();

    let space = UnitBox::new(bounds);
    let mut search = Search {
        objective,
        space: &space,
        evaluations: 0,
        best: (*initial, f64::INFINITY),
        pinned: fixed.iter().map(|&name| (name, initial.get(name))).collect(),
    };

    let initial_loss = search.eval_params(*initial);
    let mut iterations = 0;
    let mut termination = Termination::MaxIterations;
    if dim == 0 {
        termination = Termination::Converged;
    }

    let origin = space.to_unit(initial);
    let mut simplex = build_simplex(&mut search, origin, initial_loss, &free, opts.initial_step);
    let mut rebuilt_at: Option<f64> = None;
    while dim > 0 && iterations < opts.max_iters {
        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
        let spread = simplex[dim].1 - simplex[0].1;
        if spread.abs() <= opts.f_tol && diameter(&simplex) <= opts.x_tol {
            let (anchor, best_loss) = simplex[0];
            if let Some(previous) = rebuilt_at {
                if previous - best_loss <= opts.f_tol {
                    termination = Termination::Converged;
                    break;
                }
            }
            iterations += 1;
            rebuilt_at = Some(best_loss);
            simplex = build_simplex(&mut search, anchor, best_loss, &free, opts.initial_step);
            continue;
        }
        iterations += 1;

        let centroid: Point = std::array::from_fn(|i| {
            simplex[..dim].iter().map(|(v, _)| v[i]).sum::<f64>() / dim as f64
        });
        let worst = simplex[dim];
        let second_worst = simplex[dim - 1].1;
        let best = simplex[0].1;

        let reflected = search.eval(blend(&centroid, &worst.0, -REFLECT));
        if reflected.1 < best {
            let expanded = search.eval(blend(&centroid, &worst.0, -EXPAND));
            simplex[dim] = if expanded.1 < reflected.1 {
                expanded
            } else {
                reflected
            };
            continue;
        }
        if reflected.1 < second_worst {
            simplex[dim] = reflected;
            continue;
        }

        let contracted = if reflected.1 < worst.1 {
            search.eval(blend(&centroid, &reflected.0, CONTRACT))
        } else {
            search.eval(blend(&centroid, &worst.0, CONTRACT))
        };
        if contracted.1 < worst.1.min(reflected.1) {
            simplex[dim] = contracted;
            continue;
        }

        let anchor = simplex[0].0;
        for slot in simplex.iter_mut().skip(1) {
            *slot = search.eval(blend(&anchor, &slot.0, SHRINK));
        }
    }

    let (params, loss) = search.best;
    debug!(
        iterations,
        evaluations = search.evaluations,
        loss,
        ?termination,
        "simplex search finished"
    );

    Ok(OptimizeOutcome {
        params,
        loss,
        initial: *initial,
        initial_loss,
        iterations,
        evaluations: search.evaluations,
        termination,
    })
}
