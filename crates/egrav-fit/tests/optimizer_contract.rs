use egrav_core::{
    default_initial_guess, ConstantSet, Interval, ParamBounds, ParamName, ParameterVector,
};
use egrav_fit::{loss, minimize, minimize_with_fixed, OptimizeOpts, Termination};

fn bowl(target: ParameterVector) -> impl Fn(&ParameterVector) -> f64 {
    let bounds = ParamBounds::default();
    move |p: &ParameterVector| {
        let scaled = |value: f64, centre: f64, interval: Interval| {
            ((value - centre) / interval.width()).powi(2)
        };
        scaled(p.n, target.n, bounds.n)
            + scaled(p.theta_1, target.theta_1, bounds.theta_1)
            + scaled(p.cmb_prefactor, target.cmb_prefactor, bounds.cmb_prefactor)
            + scaled(p.epsilon_vac, target.epsilon_vac, bounds.epsilon_vac)
    }
}

#[test]
fn reference_fit_never_worsens_the_initial_loss() {
    let constants = ConstantSet::unified();
    let guess = default_initial_guess();
    let outcome = minimize(
        |p: &ParameterVector| loss(p, &constants),
        &guess,
        &ParamBounds::default(),
        &OptimizeOpts::default(),
    )
    .expect("valid configuration");

    assert!(outcome.loss.is_finite());
    assert_eq!(outcome.initial_loss, loss(&guess, &constants));
    assert!(outcome.loss <= outcome.initial_loss);
    assert!(outcome.loss < 0.1, "loss {}", outcome.loss);
    assert!(ParamBounds::default().contains(&outcome.params));
    assert_eq!(outcome.loss, loss(&outcome.params, &constants));
}

#[test]
fn quadratic_bowl_is_located() {
    let target = ParameterVector::new(30.0, 2.5, 6.0, 1.1e-52);
    let outcome = minimize(
        bowl(target),
        &default_initial_guess(),
        &ParamBounds::default(),
        &OptimizeOpts::default(),
    )
    .expect("valid configuration");

    assert!(outcome.converged());
    assert!((outcome.params.n - 30.0).abs() < 1e-3);
    assert!((outcome.params.theta_1 - 2.5).abs() < 1e-3);
    assert!((outcome.params.cmb_prefactor - 6.0).abs() < 1e-3);
    assert!((outcome.params.epsilon_vac - 1.1e-52).abs() < 1e-56);
}

#[test]
fn optimum_outside_box_lands_on_the_bound() {
    let target = ParameterVector::new(60.0, 2.5, 6.0, 1.1e-52);
    let outcome = minimize(
        bowl(target),
        &default_initial_guess(),
        &ParamBounds::default(),
        &OptimizeOpts::default(),
    )
    .expect("valid configuration");

    assert!((outcome.params.n - 50.0).abs() < 1e-6);
    assert!(outcome.params.n <= 50.0);
}

#[test]
fn iteration_limit_is_reported_not_fatal() {
    let constants = ConstantSet::unified();
    let opts = OptimizeOpts {
        max_iters: 1,
        ..OptimizeOpts::default()
    };
    let outcome = minimize(
        |p: &ParameterVector| loss(p, &constants),
        &default_initial_guess(),
        &ParamBounds::default(),
        &opts,
    )
    .expect("non-convergence is not an error");

    assert_eq!(outcome.termination, Termination::MaxIterations);
    assert!(!outcome.converged());
    assert_eq!(outcome.iterations, 1);
    assert!(outcome.loss <= outcome.initial_loss);
}

#[test]
fn invalid_configuration_fails_before_any_evaluation() {
    let calls = std::cell::Cell::new(0usize);
    let objective = |_: &ParameterVector| {
        calls.set(calls.get() + 1);
        0.0
    };

    let inverted = ParamBounds {
        theta_1: Interval::new(3.0, 1.0),
        ..ParamBounds::default()
    };
    let err = minimize(
        &objective,
        &default_initial_guess(),
        &inverted,
        &OptimizeOpts::default(),
    )
    .unwrap_err();
    assert_eq!(err.info().context.get("param").map(String::as_str), Some("theta_1"));

    let outside = default_initial_guess().with(ParamName::N, 5.0);
    let err = minimize(&objective, &outside, &ParamBounds::default(), &OptimizeOpts::default())
        .unwrap_err();
    assert_eq!(err.info().code, "guess-out-of-bounds");

    let zero_iters = OptimizeOpts {
        max_iters: 0,
        ..OptimizeOpts::default()
    };
    let err = minimize(
        &objective,
        &default_initial_guess(),
        &ParamBounds::default(),
        &zero_iters,
    )
    .unwrap_err();
    assert_eq!(err.info().context.get("param").map(String::as_str), Some("max_iters"));

    assert_eq!(calls.get(), 0);
}

#[test]
fn converged_search_cannot_be_improved_by_restarting() {
    let constants = ConstantSet::unified();
    let objective = |p: &ParameterVector| loss(p, &constants);
    let opts = OptimizeOpts::default();
    let first = minimize(
        objective,
        &default_initial_guess(),
        &ParamBounds::default(),
        &opts,
    )
    .expect("first search");
    assert!(first.loss < 1e-5, "first loss {}", first.loss);

    let second = minimize(objective, &first.params, &ParamBounds::default(), &opts)
        .expect("restarted search");
    assert!(
        first.loss - second.loss <= 1e-9,
        "restart lowered {} to {}",
        first.loss,
        second.loss
    );
}

#[test]
fn fixed_components_keep_their_initial_value() {
    let constants = ConstantSet::unified();
    let start = default_initial_guess().with(ParamName::N, 21.0);
    let outcome = minimize_with_fixed(
        |p: &ParameterVector| loss(p, &constants),
        &start,
        &ParamBounds::default(),
        &[ParamName::N],
        &OptimizeOpts::default(),
    )
    .expect("valid configuration");

    assert_eq!(outcome.params.n, 21.0);
    assert!(outcome.loss <= outcome.initial_loss);
    // Only the alpha term depends on N alone.
    assert!(outcome.loss < 0.01, "loss {}", outcome.loss);
}

#[test]
fn fully_fixed_search_returns_the_start() {
    let start = default_initial_guess();
    let outcome = minimize_with_fixed(
        |_: &ParameterVector| 1.0,
        &start,
        &ParamBounds::default(),
        &ParamName::ALL,
        &OptimizeOpts::default(),
    )
    .expect("valid configuration");
    assert_eq!(outcome.params, start);
    assert_eq!(outcome.evaluations, 1);
    assert!(outcome.converged());
}
