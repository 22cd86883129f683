use egrav_verify::{relative_error_pct, Tier};

#[test]
fn tier_boundaries_are_exclusive() {
    let at_one = relative_error_pct(101.0, 100.0).expect("defined");
    assert_eq!(Tier::classify(at_one), Tier::Good);

    let below_one = relative_error_pct(100.999, 100.0).expect("defined");
    assert_eq!(Tier::classify(below_one), Tier::Excellent);

    let above_ten = relative_error_pct(110.5, 100.0).expect("defined");
    assert_eq!(Tier::classify(above_ten), Tier::Poor);

    assert_eq!(Tier::classify(0.0), Tier::Excellent);
    assert_eq!(Tier::classify(9.999), Tier::Good);
    assert_eq!(Tier::classify(10.0), Tier::Poor);
}

#[test]
fn relative_error_is_symmetric_in_sign() {
    let over = relative_error_pct(105.0, 100.0).expect("over");
    let under = relative_error_pct(95.0, 100.0).expect("under");
    assert!((over - under).abs() < 1e-12);
    assert!((relative_error_pct(-1.0, -2.0).expect("negative") - 50.0).abs() < 1e-12);
}

#[test]
fn zero_reference_is_a_domain_error() {
    let err = relative_error_pct(1.0, 0.0).expect_err("undefined");
    assert!(err.is_domain());
    assert_eq!(err.step(), Some("relative_error"));
    assert!(relative_error_pct(f64::INFINITY, 1.0).is_err());
}

#[test]
fn tiers_serialize_by_name() {
    let json = serde_json::to_string(&Tier::Excellent).expect("encode");
    assert_eq!(json, "\"Excellent\"");
    assert_eq!(Tier::Poor.to_string(), "Poor");
}
