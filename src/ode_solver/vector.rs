//! The vector-state driver: the same adaptive grid as [`super::scalar`], but
//! for a coupled system of equations held in a [`DVector`] of per-component
//! jets and advanced with [`crate::jet::build_jet_inplace`].

use super::config::{validate_horizon, validate_trange, TaylorConfig};
use super::interpolant::TaylorInterpolant;
use super::solution::{TaylorSamples, TaylorSolution};
use crate::errors::{TaylorError, TaylorWarning};
use crate::jet::build_jet_inplace;
use crate::scalar::Scalar;
use crate::series::{CoefficientRing, Series};
use nalgebra::DVector;

type VectorJet<U> = DVector<Series<U>>;

#[derive(Debug, Clone)]
struct StepRun<T: Scalar, U: CoefficientRing<Real = T>> {
    times: Vec<T>,
    values: Vec<DVector<U>>,
    interpolant: TaylorInterpolant<T, VectorJet<U>>,
    warnings: Vec<TaylorWarning>,
}

type RunResult<T, U> = Result<StepRun<T, U>, TaylorError<T, StepRun<T, U>>>;

impl<T: Scalar, U: CoefficientRing<Real = T>> StepRun<T, U> {
    fn warn(&mut self, warning: TaylorWarning) {
        warning.log();
        self.warnings.push(warning);
    }
}

fn lift_invalid<T: Scalar, U: CoefficientRing<Real = T>>(e: TaylorError<T, ()>) -> TaylorError<T, StepRun<T, U>> {
    match e {
        TaylorError::InvalidInput { reason } => TaylorError::InvalidInput { reason },
        TaylorError::NonFiniteStep { .. } => unreachable!("validators never raise NonFiniteStep"),
    }
}

/// `keep_dense` controls whether the jet built on each step is cloned into
/// the interpolant: "steps" mode has no use for dense output, so it resets
/// and reuses a single jet buffer across the whole run with no per-step
/// allocation; "dense" and "range" mode need a distinct, owned jet per step
/// and pay for the clone.
fn run<U, T, P>(
    mut f_mut: impl FnMut(&mut VectorJet<U>, &VectorJet<U>, &P, &Series<T>),
    t0: T,
    x0: DVector<U>,
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
    if x0.is_empty() {
        return Err(TaylorError::InvalidInput { reason: "state vector must have at least one component" });
    }

    let order = config.order();
    let dim = x0.len();
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

    let mut dx: VectorJet<U> = DVector::from_iterator(dim, x_cur.iter().map(|v| Series::constant(v.zero_like(), order)));
    let mut xaux: VectorJet<U> = dx.clone();
    let mut x_jet: VectorJet<U> =
        DVector::from_iterator(dim, x_cur.iter().map(|v| Series::constant(v.clone(), order)));

    while t_cur != tmax {
        if steps >= config.max_steps() {
            run.warn(TaylorWarning::MaxStepsReached);
            break;
        }

        let t_series = Series::time(t_cur, order);
        for (slot, v) in x_jet.iter_mut().zip(x_cur.iter()) {
            slot.reset(v.clone());
        }

        build_jet_inplace(&mut f_mut, &t_series, &mut x_jet, &mut dx, &mut xaux, p);

        if !x_jet.iter().all(|s| s.coeffs().iter().all(CoefficientRing::is_finite)) {
            return Err(TaylorError::NonFiniteStep { t: t_cur, partial: run });
        }

        let h = crate::stepsize::stepsize_with_fallback(x_jet.as_slice(), config.abstol());
        let remaining = tmax - t_cur;
        let h_signed = if h > T::zero() {
            if (h * sign).abs() > remaining.abs() {
                remaining
            } else {
                h * sign
            }
        } else {
            remaining
        };
        let new_t = t_cur + h_signed;
        let new_x = DVector::from_iterator(dim, x_jet.iter().map(|s| s.evaluate(h_signed)));

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

/// Integrates a coupled system from `t0` to `tmax` and returns the adaptive
/// grid the stepper actually chose ("steps" mode).
pub fn solve_vector_steps<U, T, P>(
    f_mut: impl FnMut(&mut VectorJet<U>, &VectorJet<U>, &P, &Series<T>),
    t0: T,
    x0: DVector<U>,
    tmax: T,
    config: &TaylorConfig<T>,
    p: &P,
) -> Result<TaylorSolution<T, DVector<U>>, TaylorError<T, TaylorSolution<T, DVector<U>>>>
where
    U: CoefficientRing<Real = T>,
    T: Scalar + CoefficientRing<Real = T>,
{
    match run(f_mut, t0, x0, tmax, config, p, false) {
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

/// Integrates a coupled system from `t0` to `tmax` and returns a
/// [`TaylorInterpolant`] that can be queried at any time in between ("dense"
/// mode).
pub fn solve_vector_dense<U, T, P>(
    f_mut: impl FnMut(&mut VectorJet<U>, &VectorJet<U>, &P, &Series<T>),
    t0: T,
    x0: DVector<U>,
    tmax: T,
    config: &TaylorConfig<T>,
    p: &P,
) -> Result<(TaylorInterpolant<T, VectorJet<U>>, Vec<TaylorWarning>), TaylorError<T, TaylorInterpolant<T, VectorJet<U>>>>
where
    U: CoefficientRing<Real = T>,
    T: Scalar + CoefficientRing<Real = T>,
{
    match run(f_mut, t0, x0, tmax, config, p, true) {
        Ok(run) => Ok((run.interpolant, run.warnings)),
        Err(TaylorError::NonFiniteStep { t, partial }) => {
            Err(TaylorError::NonFiniteStep { t, partial: partial.interpolant })
        }
        Err(TaylorError::InvalidInput { reason }) => Err(TaylorError::InvalidInput { reason }),
    }
}

/// Integrates a coupled system from `t0` to `tmax`, then samples the
/// resulting interpolant at each of the caller-supplied `trange` instants
/// ("range" mode).
pub fn solve_vector_range<U, T, P>(
    f_mut: impl FnMut(&mut VectorJet<U>, &VectorJet<U>, &P, &Series<T>),
    t0: T,
    x0: DVector<U>,
    tmax: T,
    trange: &[T],
    config: &TaylorConfig<T>,
    p: &P,
) -> Result<TaylorSamples<T, DVector<U>>, TaylorError<T, TaylorSamples<T, DVector<U>>>>
where
    U: CoefficientRing<Real = T>,
    T: Scalar + CoefficientRing<Real = T>,
{
    validate_trange::<T, ()>(trange, t0, tmax).map_err(|e| match e {
        TaylorError::InvalidInput { reason } => TaylorError::InvalidInput { reason },
        TaylorError::NonFiniteStep { .. } => unreachable!(),
    })?;

    match run(f_mut, t0, x0, tmax, config, p, true) {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn harmonic(dx: &mut VectorJet<f64>, x: &VectorJet<f64>, _p: &(), _t: &Series<f64>) {
        dx[0] = x[1].clone();
        dx[1] = -&x[0];
    }

    #[test]
    fn vector_harmonic_oscillator_traces_a_circle() {
        let config = TaylorConfig::new(14, 1e-14).with_max_steps(500);
        let x0 = DVector::from_vec(vec![1.0_f64, 0.0]);
        let sol = solve_vector_steps(harmonic, 0.0, x0, 2.0 * std::f64::consts::PI, &config, &()).unwrap();
        let end = sol.x.last().unwrap();
        assert!((end[0] - 1.0).abs() < 1e-6, "x(2pi) should return to 1.0, got {}", end[0]);
        assert!(end[1].abs() < 1e-6, "y(2pi) should return to 0.0, got {}", end[1]);
    }

    #[test]
    fn reverse_time_undoes_a_forward_integration() {
        let config = TaylorConfig::new(14, 1e-14).with_max_steps(500);
        let x0 = DVector::from_vec(vec![1.0_f64, 0.0]);
        let forward = solve_vector_steps(harmonic, 0.0, x0.clone(), 1.3, &config, &()).unwrap();
        let end_t = *forward.t.last().unwrap();
        let end_x = forward.x.last().unwrap().clone();
        let back = solve_vector_steps(harmonic, end_t, end_x, 0.0, &config, &()).unwrap();
        let back_x = back.x.last().unwrap();
        assert!((back_x[0] - x0[0]).abs() < 1e-6);
        assert!((back_x[1] - x0[1]).abs() < 1e-6);
    }

    #[test]
    fn range_mode_matches_the_closed_form_solution() {
        let config = TaylorConfig::new(14, 1e-14).with_max_steps(500);
        let x0 = DVector::from_vec(vec![1.0_f64, 0.0]);
        let trange = [0.0, 0.5, 1.0, 1.5, 2.0];
        let samples = solve_vector_range(harmonic, 0.0, x0, 2.0, &trange, &config, &()).unwrap();
        for (&t, x) in samples.t.iter().zip(samples.x.iter()) {
            assert!((x[0] - t.cos()).abs() < 1e-6, "t={t}: x={}", x[0]);
            assert!((x[1] + t.sin()).abs() < 1e-6, "t={t}: y={}", x[1]);
        }
    }

    #[test]
    fn rejects_an_empty_state_vector() {
        let config = TaylorConfig::new(8, 1e-12).with_max_steps(10);
        let x0: DVector<f64> = DVector::from_vec(vec![]);
        let result = solve_vector_steps(harmonic, 0.0, x0, 1.0, &config, &());
        assert!(matches!(result, Err(TaylorError::InvalidInput { .. })));
    }
}
