//! The scalar-state driver: one [`Series`] of coefficients per integration
//! step, advanced by the Picard recursion in [`crate::jet`] and stepped
//! adaptively by [`crate::stepsize`].

use super::config::{validate_horizon, validate_trange, TaylorConfig};
use super::interpolant::TaylorInterpolant;
use super::solution::{TaylorSamples, TaylorSolution};
use crate::errors::{TaylorError, TaylorWarning};
use crate::jet::build_jet;
use crate::scalar::Scalar;
use crate::series::{CoefficientRing, Series};
use crate::specialize::{SpecializationOutcome, SpecializationRegistry};
use std::hash::Hash;

/// State accumulated while walking the adaptive grid from `t0` to `tmax`;
/// every public entry point below is a different projection of this run.
#[derive(Debug, Clone)]
struct StepRun<T: Scalar, U: CoefficientRing<Real = T>> {
    times: Vec<T>,
    values: Vec<U>,
    interpolant: TaylorInterpolant<T, Series<U>>,
    warnings: Vec<TaylorWarning>,
}

type RunResult<T, U> = Result<StepRun<T, U>, TaylorError<T, StepRun<T, U>>>;

/// `keep_dense` controls whether the jet built on each step is cloned into
/// the interpolant: "steps" mode has no use for dense output, so it resets
/// and reuses a single jet buffer across the whole run with no per-step
/// allocation; "dense" and "range" mode need a distinct, owned jet per step
/// and pay for the clone.
fn run<U, T, P>(
    f: &dyn Fn(&Series<U>, &P, &Series<T>) -> Series<U>,
    try_specialize: Option<&dyn Fn(&Series<T>, &mut Series<U>) -> SpecializationOutcome>,
    t0: T,
    x0: U,
    tmax: T,
    config: &TaylorConfig<T>,
    p: &P,
    keep_dense: bool,
) -> RunResult<T, U>
where
    U: CoefficientRing<Real = T>,
    T: Scalar + CoefficientRing<Real = T>,
{
    config.validate().map_err(lift_invalid::<T, U>)?;
    validate_horizon::<T, ()>(t0, tmax).map_err(lift_invalid::<T, U>)?;

    let order = config.order();
    let cap = config.max_steps() + 1;
    let mut run = StepRun {
        times: Vec::with_capacity(cap),
        values: Vec::with_capacity(cap),
        interpolant: TaylorInterpolant::new(tmax >= t0),
        warnings: Vec::new(),
    };
    run.times.push(t0);
    run.values.push(x0.clone());

    let sign = if tmax >= t0 { T::one() } else { -T::one() };
    let mut t_cur = t0;
    let mut x_cur = x0;
    let mut steps = 0usize;
    let mut x_jet = Series::constant(x_cur.clone(), order);

    while t_cur != tmax {
        if steps >= config.max_steps() {
            run.warn(TaylorWarning::MaxStepsReached);
            break;
        }

        let t_series = Series::time(t_cur, order);
        x_jet.reset(x_cur.clone());

        let used_specialization = match try_specialize {
            Some(probe) => {
                let outcome = probe(&t_series, &mut x_jet);
                outcome.warn_on_failure();
                outcome == SpecializationOutcome::Applied
            }
            None => false,
        };
        if !used_specialization {
            build_jet(f, &t_series, &mut x_jet, p);
        }

        if !x_jet.coeffs().iter().all(CoefficientRing::is_finite) {
            return Err(TaylorError::NonFiniteStep { t: t_cur, partial: run });
        }

        let h = crate::stepsize::stepsize_with_fallback(std::slice::from_ref(&x_jet), config.abstol());
        let remaining = tmax - t_cur;
        let h_signed = if h > T::zero() {
            if (h * sign).abs() > remaining.abs() {
                remaining
            } else {
                h * sign
            }
        } else {
            // Every coefficient the selector could anchor on is exactly
            // zero: the truncated series already represents the solution
            // exactly, so no truncation error accumulates no matter how
            // large a step is taken. Jump straight to the end.
            remaining
        };
        let new_t = t_cur + h_signed;
        let new_x = x_jet.evaluate(h_signed);

        if keep_dense {
            run.interpolant.push_step(t_cur, x_jet.clone());
        }
        run.times.push(new_t);
        run.values.push(new_x.clone());

        t_cur = new_t;
        x_cur = new_x;
        steps += 1;
    }
    run.interpolant.close(t_cur);
    Ok(run)
}

fn no_specialization<U, T>() -> Option<&'static dyn Fn(&Series<T>, &mut Series<U>) -> SpecializationOutcome>
where
    U: CoefficientRing<Real = T>,
    T: Scalar + CoefficientRing<Real = T>,
{
    None
}

fn lift_invalid<T: Scalar, U: CoefficientRing<Real = T>>(e: TaylorError<T, ()>) -> TaylorError<T, StepRun<T, U>> {
    match e {
        TaylorError::InvalidInput { reason } => TaylorError::InvalidInput { reason },
        TaylorError::NonFiniteStep { .. } => unreachable!("validators never raise NonFiniteStep"),
    }
}

impl<T: Scalar, U: CoefficientRing<Real = T>> StepRun<T, U> {
    fn warn(&mut self, warning: TaylorWarning) {
        warning.log();
        self.warnings.push(warning);
    }
}

/// Integrates from `t0` to `tmax` and returns the adaptive grid the stepper
/// actually chose ("steps" mode).
pub fn solve_scalar_steps<U, T, P>(
    f: impl Fn(&Series<U>, &P, &Series<T>) -> Series<U>,
    t0: T,
    x0: U,
    tmax: T,
    config: &TaylorConfig<T>,
    p: &P,
) -> Result<TaylorSolution<T, U>, TaylorError<T, TaylorSolution<T, U>>>
where
    U: CoefficientRing<Real = T>,
    T: Scalar + CoefficientRing<Real = T>,
{
    match run(&f, no_specialization::<U, T>(), t0, x0, tmax, config, p, false) {
        Ok(run) => {
            let mut sol = TaylorSolution::with_capacity(run.times.len());
            for (t, x) in run.times.into_iter().zip(run.values) {
                sol.push(t, x);
            }
            sol.warnings = run.warnings;
            Ok(sol)
        }
        Err(TaylorError::NonFiniteStep { t, partial }) => {
            let mut sol = TaylorSolution::with_capacity(partial.times.len());
            for (t, x) in partial.times.into_iter().zip(partial.values) {
                sol.push(t, x);
            }
            sol.warnings = partial.warnings;
            Err(TaylorError::NonFiniteStep { t, partial: sol })
        }
        Err(TaylorError::InvalidInput { reason }) => Err(TaylorError::InvalidInput { reason }),
    }
}

/// Integrates from `t0` to `tmax` and returns a [`TaylorInterpolant`] that
/// can be queried at any time in between ("dense" mode).
pub fn solve_scalar_dense<U, T, P>(
    f: impl Fn(&Series<U>, &P, &Series<T>) -> Series<U>,
    t0: T,
    x0: U,
    tmax: T,
    config: &TaylorConfig<T>,
    p: &P,
) -> Result<(TaylorInterpolant<T, Series<U>>, Vec<TaylorWarning>), TaylorError<T, TaylorInterpolant<T, Series<U>>>>
where
    U: CoefficientRing<Real = T>,
    T: Scalar + CoefficientRing<Real = T>,
{
    match run(&f, no_specialization::<U, T>(), t0, x0, tmax, config, p, true) {
        Ok(run) => Ok((run.interpolant, run.warnings)),
        Err(TaylorError::NonFiniteStep { t, partial }) => {
            Err(TaylorError::NonFiniteStep { t, partial: partial.interpolant })
        }
        Err(TaylorError::InvalidInput { reason }) => Err(TaylorError::InvalidInput { reason }),
    }
}

/// Integrates from `t0` to `tmax`, building the same dense interpolant
/// internally, then samples it at each of the caller-supplied `trange`
/// instants ("range" mode). `trange` must start at `t0`, end at `tmax`,
/// and be strictly monotone in the direction of integration.
pub fn solve_scalar_range<U, T, P>(
    f: impl Fn(&Series<U>, &P, &Series<T>) -> Series<U>,
    t0: T,
    x0: U,
    tmax: T,
    trange: &[T],
    config: &TaylorConfig<T>,
    p: &P,
) -> Result<TaylorSamples<T, U>, TaylorError<T, TaylorSamples<T, U>>>
where
    U: CoefficientRing<Real = T>,
    T: Scalar + CoefficientRing<Real = T>,
{
    validate_trange::<T, ()>(trange, t0, tmax).map_err(|e| match e {
        TaylorError::InvalidInput { reason } => TaylorError::InvalidInput { reason },
        TaylorError::NonFiniteStep { .. } => unreachable!(),
    })?;

    match run(&f, no_specialization::<U, T>(), t0, x0, tmax, config, p, true) {
        Ok(run) => {
            let mut samples = TaylorSamples::with_capacity(trange.len());
            for &tau in trange {
                let x = run
                    .interpolant
                    .evaluate(tau)
                    .expect("trange was validated to lie within [t0, tmax]");
                samples.push(tau, x);
            }
            samples.warnings = run.warnings;
            Ok(samples)
        }
        Err(TaylorError::NonFiniteStep { t, partial }) => {
            let mut samples = TaylorSamples::with_capacity(0);
            for &tau in trange {
                if let Some(x) = partial.interpolant.evaluate(tau) {
                    samples.push(tau, x);
                } else {
                    break;
                }
            }
            samples.warnings = partial.warnings;
            Err(TaylorError::NonFiniteStep { t, partial: samples })
        }
        Err(TaylorError::InvalidInput { reason }) => Err(TaylorError::InvalidInput { reason }),
    }
}

/// Like [`solve_scalar_steps`], but consults `registry` under `key` before
/// falling back to the generic jet builder on every step (the `parse_eqs` lever).
/// Honors `config.parse_eqs()`: when `false`, the registry is never
/// consulted even if one is provided.
pub fn solve_scalar_steps_specialized<U, T, P, K>(
    f: impl Fn(&Series<U>, &P, &Series<T>) -> Series<U>,
    registry: &SpecializationRegistry<K, U, T, P>,
    key: &K,
    t0: T,
    x0: U,
    tmax: T,
    config: &TaylorConfig<T>,
    p: &P,
) -> Result<TaylorSolution<T, U>, TaylorError<T, TaylorSolution<T, U>>>
where
    U: CoefficientRing<Real = T>,
    T: CoefficientRing<Real = T> + Scalar,
    K: Eq + Hash,
{
    let probe = |t: &Series<T>, x: &mut Series<U>| registry.try_build(key, t, x, p);
    let try_specialize: Option<&dyn Fn(&Series<T>, &mut Series<U>) -> SpecializationOutcome> =
        if config.parse_eqs() { Some(&probe) } else { None };

    match run(&f, try_specialize, t0, x0, tmax, config, p, false) {
        Ok(run) => {
            let mut sol = TaylorSolution::with_capacity(run.times.len());
            for (t, x) in run.times.into_iter().zip(run.values) {
                sol.push(t, x);
            }
            sol.warnings = run.warnings;
            Ok(sol)
        }
        Err(TaylorError::NonFiniteStep { t, partial }) => {
            let mut sol = TaylorSolution::with_capacity(partial.times.len());
            for (t, x) in partial.times.into_iter().zip(partial.values) {
                sol.push(t, x);
            }
            sol.warnings = partial.warnings;
            Err(TaylorError::NonFiniteStep { t, partial: sol })
        }
        Err(TaylorError::InvalidInput { reason }) => Err(TaylorError::InvalidInput { reason }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logistic(x: &Series<f64>, _p: &(), _t: &Series<f64>) -> Series<f64> {
        x * x
    }

    #[test]
    fn logistic_blow_up_terminates_rather_than_overshooting_silently() {
        // x' = x^2, x(0) = 1 blows up at t = 1; the adaptive stepper must
        // either shrink all the way into a non-finite coefficient and
        // report it, or exhaust the step budget first. Either way it must
        // terminate instead of reporting a bogus finite value near t = 10.
        let config = TaylorConfig::new(15, 1e-16).with_max_steps(2000);
        let result = solve_scalar_steps(logistic, 0.0_f64, 1.0_f64, 10.0, &config, &());
        match result {
            Err(TaylorError::NonFiniteStep { .. }) => {}
            Ok(sol) => assert!(sol.warnings.contains(&TaylorWarning::MaxStepsReached)),
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn step_budget_halts_integration_before_reaching_tmax() {
        // Radius of convergence around t=0 is 1 (the pole at t=1); a single
        // low-order step at a tight tolerance cannot reach tmax = 5.
        let config = TaylorConfig::new(3, 1e-14).with_max_steps(1);
        let sol = solve_scalar_steps(logistic, 0.0_f64, 1.0_f64, 5.0, &config, &()).unwrap();
        assert_eq!(sol.warnings, vec![TaylorWarning::MaxStepsReached]);
        assert!(*sol.t.last().unwrap() < 5.0);
    }

    #[test]
    fn reverse_time_integration_returns_to_the_start() {
        fn decay(x: &Series<f64>, _p: &(), _t: &Series<f64>) -> Series<f64> {
            x * -1.0
        }
        let config = TaylorConfig::new(12, 1e-14).with_max_steps(200);
        let forward = solve_scalar_steps(decay, 0.0_f64, 1.0_f64, 2.0, &config, &()).unwrap();
        let end_t = *forward.t.last().unwrap();
        let end_x = *forward.x.last().unwrap();
        let back = solve_scalar_steps(decay, end_t, end_x, 0.0, &config, &()).unwrap();
        let back_x = *back.x.last().unwrap();
        assert!((back_x - 1.0).abs() < 1e-8);
    }

    #[test]
    fn range_mode_samples_match_steps_mode_at_shared_times() {
        fn decay(x: &Series<f64>, _p: &(), _t: &Series<f64>) -> Series<f64> {
            x * -1.0
        }
        let config = TaylorConfig::new(10, 1e-13).with_max_steps(200);
        let trange = [0.0, 0.25, 0.5, 0.75, 1.0];
        let samples = solve_scalar_range(decay, 0.0_f64, 1.0_f64, 1.0, &trange, &config, &()).unwrap();
        assert_eq!(samples.t, trange);
        for (&t, &x) in samples.t.iter().zip(samples.x.iter()) {
            let expected = (-t).exp();
            assert!((x - expected).abs() < 1e-6, "t={t}: got {x}, expected {expected}");
        }
    }

    #[test]
    fn complex_rotation_matches_eulers_formula() {
        use num_complex::Complex;

        fn rotation(x: &Series<Complex<f64>>, _p: &(), _t: &Series<f64>) -> Series<Complex<f64>> {
            let i = Series::constant(Complex::new(0.0, 1.0), x.order());
            x * &i
        }
        let config = TaylorConfig::new(16, 1e-15).with_max_steps(200);
        let x0 = Complex::new(1.0_f64, 0.0);
        let sol = solve_scalar_steps(rotation, 0.0_f64, x0, 1.0_f64, &config, &()).unwrap();
        let got = *sol.x.last().unwrap();
        let expected = Complex::new(1.0_f64.cos(), 1.0_f64.sin());
        assert!((got - expected).norm() < 1e-8, "got {got}, expected {expected}");
    }

    #[test]
    fn degenerate_zero_field_jumps_straight_to_tmax() {
        // x' = 0 is represented exactly at every order: the fallback rule
        // returns zero, which the driver must read as "no truncation error
        // possible", not as a failure.
        fn zero_field(x: &Series<f64>, _p: &(), _t: &Series<f64>) -> Series<f64> {
            Series::constant(0.0, x.order())
        }
        let config = TaylorConfig::new(8, 1e-12).with_max_steps(5);
        let sol = solve_scalar_steps(zero_field, 0.0_f64, 1.0_f64, 10.0, &config, &()).unwrap();
        assert!(sol.warnings.is_empty());
        assert_eq!(sol.t, vec![0.0, 10.0]);
        assert_eq!(sol.x, vec![1.0, 1.0]);
    }
}
