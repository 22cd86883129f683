use egrav_core::{ConstantSet, ParameterVector};
use egrav_model::{evaluate, gauge_suppression, vacuum_energy_base};
use proptest::prelude::*;

#[test]
fn gauge_suppression_tends_to_one_for_large_lattices() {
    let coarse = gauge_suppression(10.0).expect("defined");
    let fine = gauge_suppression(1e3).expect("defined");
    let finer = gauge_suppression(1e6).expect("defined");
    assert!(coarse < fine && fine < finer);
    assert!((1.0 - finer).abs() < 1e-10);
}

proptest! {
    #[test]
    fn vacuum_energy_is_positive_and_suppression_bounded(n in 1e-3f64..1e9) {
        let e_vac = vacuum_energy_base(n).unwrap();
        prop_assert!(e_vac > 0.0);
        let g_s = gauge_suppression(n).unwrap();
        prop_assert!(g_s > 0.0 && g_s <= 1.0);
        prop_assert_eq!(g_s, 1.0 / e_vac);
    }

    #[test]
    fn chain_is_defined_inside_default_box(
        n in 10.0f64..50.0,
        theta_1 in 1.0f64..3.0,
        prefactor in 4.0f64..12.0,
        eps in 1.0f64..1.2,
    ) {
        let constants = ConstantSet::unified();
        let params = ParameterVector::new(n, theta_1, prefactor, eps * 1e-52);
        let derived = evaluate(&params, &constants).unwrap();
        prop_assert!(derived.l_renorm > 0.0);
        prop_assert!(derived.unit_scaling_factor.is_finite());
        let rel = (derived.g_physical_predicted - constants.g_real).abs() / constants.g_real;
        prop_assert!(rel < 1e-12);
    }
}
