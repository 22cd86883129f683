use std::error::Error;

use egrav_core::ConstantSet;
use egrav_fit::{calibrate, CalibrationOpts};
use egrav_verify::{render_fit, render_report, verify_fit, Tier};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Filter from a `RUST_LOG`-style directive string, `info` when absent or
/// unparsable.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn init_tracing() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let constants = ConstantSet::unified();
    let opts = CalibrationOpts::default();
    let fit = calibrate(&constants, &opts)?;
    let report = verify_fit(&fit, &constants)?;
    info!(
        excellent = report.count(Tier::Excellent),
        undefined = report.undefined(),
        "verification finished"
    );

    print!("{}", render_fit(&fit));
    println!();
    print!("{}", render_report(&report));
    Ok(())
}
