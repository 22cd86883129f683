use egrav_core::{ConstantSet, Interval, ParamBounds, ParameterVector};
use egrav_fit::{
    calibrate, loss, round_lattice, CalibrationOpts, LatticePolicy, MultiStartOpts,
};

#[test]
fn default_calibration_rounds_the_lattice_size() {
    let constants = ConstantSet::unified();
    let fit = calibrate(&constants, &CalibrationOpts::default()).expect("calibration");

    assert_eq!(fit.lattice, LatticePolicy::RoundAfterFit);
    assert_eq!(fit.params.n.fract(), 0.0);
    assert!(ParamBounds::default().contains(&fit.params));
    assert!(fit.continuous_loss <= fit.initial_loss);
    assert!(fit.loss <= fit.initial_loss, "final {} initial {}", fit.loss, fit.initial_loss);
    // Only the alpha term depends on N alone; the refit recovers the rest.
    let terms = fit.terms.expect("defined");
    assert!(terms.cmb < 1e-3, "cmb term {}", terms.cmb);
    assert_eq!(fit.loss, loss(&fit.params, &constants));
    assert_eq!(fit.constants_label, "unified");
    assert_eq!(fit.fit_hash.len(), 64);
}

#[test]
fn rounding_never_loses_to_an_off_lattice_initial_guess() {
    let constants = ConstantSet::unified();
    let relaxed = calibrate(
        &constants,
        &CalibrationOpts {
            lattice: LatticePolicy::Continuous,
            ..CalibrationOpts::default()
        },
    )
    .expect("continuous calibration");

    let opts = CalibrationOpts {
        initial: relaxed.params,
        ..CalibrationOpts::default()
    };
    let fit = calibrate(&constants, &opts).expect("calibration");
    assert!(fit.loss <= fit.initial_loss, "final {} initial {}", fit.loss, fit.initial_loss);
    assert_eq!(fit.loss, loss(&fit.params, &constants));
}

#[test]
fn continuous_policy_keeps_the_search_optimum() {
    let opts = CalibrationOpts {
        lattice: LatticePolicy::Continuous,
        ..CalibrationOpts::default()
    };
    let fit = calibrate(&ConstantSet::unified(), &opts).expect("calibration");
    assert_eq!(fit.params, fit.continuous_params);
    assert_eq!(fit.loss, fit.continuous_loss);
}

#[test]
fn calibration_is_reproducible() {
    let opts = CalibrationOpts {
        multi_start: MultiStartOpts {
            starts: 3,
            seed: 5,
            concurrency: 3,
        },
        ..CalibrationOpts::default()
    };
    let a = calibrate(&ConstantSet::unified(), &opts).expect("first");
    let b = calibrate(&ConstantSet::unified(), &opts).expect("second");
    assert_eq!(a, b);
    assert_eq!(a.restarts.len(), 3);
}

#[test]
fn rounding_respects_the_bound() {
    let bounds = ParamBounds {
        n: Interval::new(10.5, 20.5),
        ..ParamBounds::default()
    };
    let low = ParameterVector::new(10.6, 2.0, 8.0, 1.1e-52);
    let high = ParameterVector::new(20.49, 2.0, 8.0, 1.1e-52);
    assert_eq!(round_lattice(&low, &bounds).n, 11.0);
    assert_eq!(round_lattice(&high, &bounds).n, 20.0);
}

#[test]
fn bound_without_integers_fails_fast_when_rounding() {
    let opts = CalibrationOpts {
        bounds: ParamBounds {
            n: Interval::new(20.1, 20.9),
            ..ParamBounds::default()
        },
        initial: ParameterVector::new(20.5, 2.0, 8.0, 1.075e-52),
        ..CalibrationOpts::default()
    };
    let err = calibrate(&ConstantSet::unified(), &opts).unwrap_err();
    assert_eq!(err.info().code, "no-integer-in-bound");
    assert_eq!(err.info().context.get("param").map(String::as_str), Some("n"));
}

#[test]
fn options_round_trip_json_with_defaults() {
    let decoded: CalibrationOpts = serde_json::from_str("{}").expect("defaults apply");
    assert_eq!(decoded, CalibrationOpts::default());
    let json = serde_json::to_string(&decoded).expect("serialize");
    let again: CalibrationOpts = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(again, decoded);
}
