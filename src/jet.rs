//! The Picard recursion that turns a state known to order `k` into one known
//! to order `k + 1`, one order at a time, for both the scalar and
//! multi-component vector-field shapes.

use crate::series::{CoefficientRing, Series};
use nalgebra::DVector;

/// Extends `x` in place from a series correct only at coefficient 0 to one
/// correct through coefficient `x.order()`, given a vector field
/// `f(x, p, t) -> dx` that is a pure function of its series arguments.
///
/// `t` must already be the canonical time series (`t[0]` = current time,
/// `t[1] = 1`, higher coefficients zero) of the same order as `x`.
pub fn build_jet<U, T, P>(
    f: impl Fn(&Series<U>, &P, &Series<T>) -> Series<U>,
    t: &Series<T>,
    x: &mut Series<U>,
    p: &P,
) where
    U: CoefficientRing,
    T: CoefficientRing<Real = T>,
{
    let order = x.order();
    for ord in 0..order {
        let t_aux = t.truncated(ord);
        let x_aux = x.truncated(ord);
        let dx = f(&x_aux, p, &t_aux);
        x.set(ord + 1, dx.get(ord).div_u32((ord + 1) as u32));
    }
}

/// Vector-field analogue of [`build_jet`] for a system of `D` coupled
/// equations, writing into `dx` in place rather than returning a new series
/// per call.
///
/// `dx` and `xaux` are scratch storage, reused across the whole driver loop;
/// this function performs no allocation of its own beyond what `f_mut`
/// itself does.
pub fn build_jet_inplace<U, T, P>(
    mut f_mut: impl FnMut(&mut DVector<Series<U>>, &DVector<Series<U>>, &P, &Series<T>),
    t: &Series<T>,
    x: &mut DVector<Series<U>>,
    dx: &mut DVector<Series<U>>,
    xaux: &mut DVector<Series<U>>,
    p: &P,
) where
    U: CoefficientRing,
    T: CoefficientRing<Real = T>,
{
    let order = x[0].order();
    for ord in 0..order {
        let t_aux = t.truncated(ord);
        for j in 0..x.len() {
            xaux[j] = x[j].truncated(ord);
        }
        f_mut(dx, xaux, p, &t_aux);
        for j in 0..x.len() {
            let coeff = dx[j].get(ord).div_u32((ord + 1) as u32);
            x[j].set(ord + 1, coeff);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// f(x) = x^2, x(0) = x0 has the closed form x(t) = x0 / (1 - x0*t),
    /// whose k-th Taylor coefficient at t=0 is x0^(k+1).
    #[test]
    fn logistic_coefficients_match_closed_form() {
        let order = 10;
        let x0 = 3.0_f64;
        let t = Series::<f64>::time(0.0, order);
        let mut x = Series::constant(x0, order);

        build_jet(|x: &Series<f64>, _p: &(), _t: &Series<f64>| x * x, &t, &mut x, &());

        for k in 0..=order {
            let expected = x0.powi((k + 1) as i32);
            let got = *x.get(k);
            assert!(
                (got - expected).abs() <= expected.abs() * 1e-9,
                "coefficient {k}: got {got}, expected {expected}"
            );
        }
    }

    #[test]
    fn order_zero_is_a_no_op() {
        let t = Series::<f64>::time(0.0, 0);
        let mut x = Series::constant(5.0, 0);
        build_jet(|x: &Series<f64>, _p: &(), _t: &Series<f64>| x.clone(), &t, &mut x, &());
        assert_eq!(x.coeffs(), &[5.0]);
    }

    #[test]
    fn vector_harmonic_oscillator_matches_sine_cosine_series() {
        let order = 12;
        let t = Series::<f64>::time(0.0, order);
        let mut x = DVector::from_vec(vec![Series::constant(1.0, order), Series::constant(0.0, order)]);
        let mut dx = DVector::from_vec(vec![Series::constant(0.0, order), Series::constant(0.0, order)]);
        let mut xaux = x.clone();

        build_jet_inplace(
            |dx: &mut DVector<Series<f64>>, x: &DVector<Series<f64>>, _p: &(), _t: &Series<f64>| {
                dx[0] = x[1].clone();
                dx[1] = -&x[0];
            },
            &t,
            &mut x,
            &mut dx,
            &mut xaux,
            &(),
        );

        // x(t) = cos(t), y(t) = -sin(t); coefficient k of cos is
        // 0 for odd k, (-1)^(k/2)/k! for even k.
        let fact = |n: u64| (1..=n).product::<u64>() as f64;
        for k in 0..=order {
            let expected_x = if k % 2 == 0 {
                (-1.0_f64).powi((k / 2) as i32) / fact(k as u64)
            } else {
                0.0
            };
            assert!((x[0].get(k) - expected_x).abs() < 1e-9, "x coeff {k}");
        }
    }
}
