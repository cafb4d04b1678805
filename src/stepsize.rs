//! Adaptive step-size selection from the tail of a jet's coefficients.

use crate::scalar::Scalar;
use crate::series::{CoefficientRing, Series};
use num_traits::{Float, One, Zero};

/// Primary step-size rule: the minimum, over the last two coefficients of
/// every component, of `(epsilon / |coeff_k|)^(1/k)`.
///
/// Returns `+infinity` if every inspected coefficient is exactly zero (the
/// series carries no information about the local truncation error yet);
/// callers should fall back to [`stepsize_fallback`] in that case.
pub fn stepsize<U: CoefficientRing>(components: &[Series<U>], epsilon: U::Real) -> U::Real {
    let mut h = U::Real::infinity();
    let order = components.first().map(Series::order).unwrap_or(0);
    if order < 1 {
        return h;
    }
    for x in components {
        for k in [order - 1, order] {
            let norm = x.coeff_norm(k).expect("k is within the series' order");
            if norm.is_zero() {
                continue;
            }
            let candidate = (epsilon / norm).powf(U::Real::one() / U::Real::of_f64(k as f64));
            if candidate < h {
                h = candidate;
            }
        }
    }
    h
}

/// Jorba-Zoo "second step-size control": used when [`stepsize`] returns
/// `+infinity` for every component because the trailing coefficients are
/// exactly zero. Takes the maximum, over the earliest non-vanishing
/// coefficients (excluding the very first and very last), of
/// `(1 / |coeff_k|)^(1/k)`.
///
/// Returns the real zero if every inspected coefficient across every
/// component is zero (an identically-zero solution has no informative
/// coefficient to anchor on; the driver treats this as terminal).
pub fn stepsize_fallback<U: CoefficientRing>(components: &[Series<U>]) -> U::Real {
    let order = components.first().map(Series::order).unwrap_or(0);
    let mut h = U::Real::zero();
    if order < 3 {
        return h;
    }
    for x in components {
        for k in 1..=(order - 2) {
            let norm = x.coeff_norm(k).expect("k is within the series' order");
            if norm.is_zero() {
                continue;
            }
            let candidate = (U::Real::one() / norm).powf(U::Real::one() / U::Real::of_f64(k as f64));
            if candidate > h {
                h = candidate;
            }
        }
    }
    h
}

/// Runs the primary rule and, if it is non-finite, the fallback rule.
pub fn stepsize_with_fallback<U: CoefficientRing>(components: &[Series<U>], epsilon: U::Real) -> U::Real {
    let h = stepsize(components, epsilon);
    if h.is_finite() {
        h
    } else {
        stepsize_fallback(components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::Scalar;

    #[test]
    fn degenerate_zero_field_uses_fallback() {
        // f(x) = 0, x0 = 1: every coefficient past the first is zero, so the
        // primary rule returns +infinity and the fallback has nothing to
        // anchor on either (a genuinely stationary solution).
        let order = 6;
        let x = Series::<f64>::constant(1.0, order);
        let primary = stepsize(std::slice::from_ref(&x), 1e-20);
        assert!(primary.is_infinite());
        let fallback = stepsize_fallback(std::slice::from_ref(&x));
        assert_eq!(fallback, 0.0);
    }

    #[test]
    fn primary_rule_shrinks_with_tighter_tolerance() {
        let order = 8;
        let mut x = Series::<f64>::constant(1.0, order);
        for k in 1..=order {
            x.set(k, 1.0);
        }
        let loose = stepsize(std::slice::from_ref(&x), 1e-3);
        let tight = stepsize(std::slice::from_ref(&x), 1e-12);
        assert!(tight < loose);
    }

    #[test]
    fn fallback_is_finite_when_an_early_coefficient_is_nonzero() {
        let order = 6;
        let mut x = Series::<f64>::constant(1.0, order);
        x.set(2, 0.5);
        let h = stepsize_fallback(std::slice::from_ref(&x));
        assert!(h.is_finite() && h > 0.0);
    }
}
