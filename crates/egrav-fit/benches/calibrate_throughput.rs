use egrav_core::{default_initial_guess, ConstantSet};
use egrav_fit::{calibrate, loss, CalibrationOpts};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_loss(c: &mut Criterion) {
    let constants = ConstantSet::unified();
    let guess = default_initial_guess();
    c.bench_function("loss_eval", |b| {
        b.iter(|| loss(black_box(&guess), black_box(&constants)))
    });
}

fn bench_calibrate(c: &mut Criterion) {
    let constants = ConstantSet::unified();
    let opts = CalibrationOpts::default();
    c.bench_function("calibrate_default", |b| {
        b.iter(|| calibrate(black_box(&constants), black_box(&opts)).expect("calibration"))
    });
}

criterion_group!(benches, bench_loss, bench_calibrate);
criterion_main!(benches);
