use criterion::{criterion_group, criterion_main, Criterion};
use taylor_ode::{solve_scalar_steps, solve_vector_steps, Series, TaylorConfig};

fn logistic(x: &Series<f64>, _p: &(), _t: &Series<f64>) -> Series<f64> {
    x * x
}

fn harmonic(
    dx: &mut nalgebra::DVector<Series<f64>>,
    x: &nalgebra::DVector<Series<f64>>,
    _p: &(),
    _t: &Series<f64>,
) {
    dx[0] = x[1].clone();
    dx[1] = -&x[0];
}

fn bench_scalar(c: &mut Criterion) {
    let config = TaylorConfig::new(20, 1e-15).with_max_steps(1000);
    c.bench_function("scalar logistic to t=0.5", |b| {
        b.iter(|| solve_scalar_steps(logistic, 0.0_f64, 1.0_f64, 0.5, &config, &()).unwrap())
    });
}

fn bench_vector(c: &mut Criterion) {
    let config = TaylorConfig::new(20, 1e-15).with_max_steps(1000);
    c.bench_function("vector harmonic oscillator one period", |b| {
        b.iter(|| {
            let x0 = nalgebra::DVector::from_vec(vec![1.0_f64, 0.0]);
            solve_vector_steps(harmonic, 0.0, x0, 2.0 * std::f64::consts::PI, &config, &()).unwrap()
        })
    });
}

criterion_group!(benches, bench_scalar, bench_vector);
criterion_main!(benches);
