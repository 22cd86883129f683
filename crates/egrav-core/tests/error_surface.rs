use egrav_core::errors::{EgravError, ErrorInfo};

#[test]
fn domain_error_records_step() {
    let err = EgravError::domain("thermo_damping", "theta_1 is zero");
    assert!(err.is_domain());
    assert_eq!(err.step(), Some("thermo_damping"));
    assert_eq!(err.info().code, "undefined");
}

#[test]
fn config_error_names_param() {
    let err = EgravError::config("empty-bound", "theta_1", "bound is empty");
    assert!(!err.is_domain());
    assert_eq!(err.step(), None);
    assert_eq!(err.info().context.get("param").map(String::as_str), Some("theta_1"));
}

#[test]
fn display_lists_code_context_and_hint() {
    let err = EgravError::Domain(
        ErrorInfo::new("negative-radicand", "correction product is negative")
            .with_context("step", "l_renorm")
            .with_context("product", "-0.5")
            .with_hint("keep theta_1 non-zero"),
    );
    assert_eq!(
        err.to_string(),
        "domain error [negative-radicand] correction product is negative \
         (product=-0.5, step=l_renorm); hint: keep theta_1 non-zero"
    );
}

#[test]
fn errors_serialize_by_family() {
    let err = EgravError::config("empty-bound", "n", "bound is empty");
    let json = serde_json::to_value(&err).expect("encode");
    assert_eq!(json["family"], "Config");
    assert_eq!(json["detail"]["context"]["param"], "n");
    assert!(json["detail"].get("hint").is_none());
}
