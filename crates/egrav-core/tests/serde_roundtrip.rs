use egrav_core::{
    from_json_slice, round_sig, stable_hash_string, to_canonical_json_bytes, ConstantSet,
    ParamBounds, ParameterVector,
};

#[test]
fn constant_presets_round_trip_json() {
    for constants in [ConstantSet::unified(), ConstantSet::legacy()] {
        let bytes = to_canonical_json_bytes(&constants).expect("serialize");
        let decoded: ConstantSet = from_json_slice(&bytes).expect("deserialize");
        assert_eq!(decoded, constants);
    }
}

#[test]
fn legacy_preset_overrides_revision_literals() {
    let legacy = ConstantSet::legacy();
    let unified = ConstantSet::unified();
    assert_eq!(legacy.lambda_real, 1.11e-52);
    assert_eq!(legacy.c, 3e8);
    assert_eq!(legacy.g_real, unified.g_real);
    assert_ne!(legacy.label, unified.label);
}

#[test]
fn bounds_and_params_round_trip_json() {
    let bounds = ParamBounds::default();
    let params = ParameterVector::new(21.0, 2.0, 6.78, 1.1056e-52);
    let bytes = to_canonical_json_bytes(&(bounds, params)).expect("serialize");
    let decoded: (ParamBounds, ParameterVector) = from_json_slice(&bytes).expect("deserialize");
    assert_eq!(decoded, (bounds, params));
}

#[test]
fn stable_hash_ignores_last_bit_noise_after_rounding() {
    let a = round_sig(1.1056e-52);
    let b = round_sig(1.1056e-52 * (1.0 + 1e-14));
    assert_eq!(a, b);
    assert_eq!(
        stable_hash_string(&a).expect("hash"),
        stable_hash_string(&b).expect("hash")
    );
}

#[test]
fn round_sig_keeps_nine_significant_digits() {
    assert_eq!(round_sig(0.0), 0.0);
    assert!((round_sig(137.035999084) - 137.035999).abs() < 1e-9);
}

#[test]
fn canonical_bytes_sort_struct_fields() {
    #[derive(serde::Serialize)]
    struct Row {
        zeta: u8,
        alpha: u8,
        nested: Nested,
    }
    #[derive(serde::Serialize)]
    struct Nested {
        theta_1: f64,
        n: f64,
    }

    let row = Row {
        zeta: 1,
        alpha: 2,
        nested: Nested { theta_1: 2.0, n: 21.0 },
    };
    let bytes = to_canonical_json_bytes(&row).expect("serialize");
    assert_eq!(
        String::from_utf8(bytes).expect("utf8"),
        r#"{"alpha":2,"nested":{"n":21.0,"theta_1":2.0},"zeta":1}"#
    );
}
