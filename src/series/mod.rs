//! Truncated power series ("jets") over a generic coefficient ring.
//!
//! This is the crate's stand-in for the external series-algebra dependency
//! the rest of the engine treats as a black box: just enough arithmetic
//! (`+`, `-`, `*`, scalar multiplication, evaluation, a norm) for a user's
//! vector field, written against [`Series<U>`], to compose correctly order
//! by order. A full computer-algebra system (symbolic composition,
//! elementary functions of a series, multivariate series) is out of scope;
//! callers needing `sin`/`exp`/division of series implement those
//! themselves on top of the ring operations exposed here.

mod ops;
mod ring;

pub use ring::CoefficientRing;

use std::fmt::Debug;

/// A truncated power series `a_0 + a_1*tau + ... + a_N*tau^N` with fixed
/// order `N` and coefficients in ring `U`.
///
/// The order never changes once a `Series` is constructed; every coefficient
/// slot from `0` to `order()` always exists, even when its value is
/// logically "not yet known" (the jet builder fills those in order).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(bound = "")]
pub struct Series<U: CoefficientRing> {
    coeffs: Vec<U>,
}

impl<U: CoefficientRing> Series<U> {
    /// A series of the given `order` whose coefficient 0 is `value` and all
    /// higher coefficients are the ring's zero (same "shape" as `value`).
    pub fn constant(value: U, order: usize) -> Self {
        let zero = value.zero_like();
        let mut coeffs = Vec::with_capacity(order + 1);
        coeffs.push(value);
        coeffs.extend(std::iter::repeat(zero).take(order));
        Self { coeffs }
    }

    /// Builds a series directly from a coefficient vector; `coeffs.len() - 1`
    /// becomes the order.
    pub fn from_coeffs(coeffs: Vec<U>) -> Self {
        assert!(!coeffs.is_empty(), "a series needs at least one coefficient");
        Self { coeffs }
    }

    /// The order `N`; the series has `N + 1` coefficients.
    pub fn order(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn coeffs(&self) -> &[U] {
        &self.coeffs
    }

    pub fn get(&self, k: usize) -> &U {
        &self.coeffs[k]
    }

    pub fn set(&mut self, k: usize, value: U) {
        self.coeffs[k] = value;
    }

    /// Overwrites this series in place to represent a fresh constant
    /// `value`, reusing its existing coefficient storage instead of
    /// reallocating. Used by the drivers to re-seed the jet buffer at the
    /// start of each step without a per-step allocation.
    pub fn reset(&mut self, value: U) {
        let zero = value.zero_like();
        self.coeffs[0] = value;
        for c in self.coeffs[1..].iter_mut() {
            *c = zero.clone();
        }
    }

    /// A copy of `self` with every coefficient above `upto` reset to zero.
    ///
    /// Used by the jet builder to present the vector field with a state
    /// known only through the current recursion order; coefficients above
    /// that order are meaningless and must not leak into the composition.
    pub fn truncated(&self, upto: usize) -> Self {
        let zero = self.coeffs[0].zero_like();
        let mut out = self.clone();
        for c in out.coeffs.iter_mut().skip(upto + 1) {
            *c = zero.clone();
        }
        out
    }

    /// Evaluates the series at `delta` via Horner's method.
    pub fn evaluate(&self, delta: U::Real) -> U {
        let mut iter = self.coeffs.iter().rev();
        let mut acc = iter.next().expect("series has at least one coefficient").clone();
        for c in iter {
            acc = acc.scale(delta) + c.clone();
        }
        acc
    }

    /// The infinity norm of the coefficient at index `k`, or `None` if `k`
    /// is out of range.
    pub fn coeff_norm(&self, k: usize) -> Option<U::Real> {
        self.coeffs.get(k).map(CoefficientRing::norm)
    }
}

impl<U: CoefficientRing> Series<U>
where
    U: CoefficientRing<Real = U>,
{
    /// The canonical independent-variable series `t0 + 1*tau` used to seed
    /// the time argument of a jet: `a_0` is the current time, `a_1 = 1`, and
    /// all higher coefficients are zero.
    pub fn time(t0: U, order: usize) -> Self {
        let mut s = Self::constant(t0, order);
        if order >= 1 {
            s.coeffs[1] = U::one_like(&s.coeffs[0]);
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_fills_higher_coefficients_with_zero() {
        let s = Series::<f64>::constant(3.0, 4);
        assert_eq!(s.order(), 4);
        assert_eq!(s.coeffs(), &[3.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn time_series_has_unit_first_coefficient() {
        let t = Series::<f64>::time(1.5, 3);
        assert_eq!(t.coeffs(), &[1.5, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn reset_reuses_storage_without_changing_the_order() {
        let mut s = Series::from_coeffs(vec![1.0, 2.0, 3.0]);
        s.reset(9.0);
        assert_eq!(s.order(), 2);
        assert_eq!(s.coeffs(), &[9.0, 0.0, 0.0]);
    }

    #[test]
    fn truncated_zeroes_the_tail_only() {
        let s = Series::from_coeffs(vec![1.0, 2.0, 3.0, 4.0]);
        let t = s.truncated(1);
        assert_eq!(t.coeffs(), &[1.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn evaluate_matches_horner_by_hand() {
        // 1 + 2*tau + 3*tau^2 at tau=2 -> 1 + 4 + 12 = 17
        let s = Series::from_coeffs(vec![1.0, 2.0, 3.0]);
        assert_eq!(s.evaluate(2.0), 17.0);
    }

    #[test]
    fn cauchy_product_matches_polynomial_multiplication() {
        // (1 + x) * (1 - x) = 1 - x^2, truncated to order 2
        let a = Series::from_coeffs(vec![1.0, 1.0, 0.0]);
        let b = Series::from_coeffs(vec![1.0, -1.0, 0.0]);
        let c = &a * &b;
        assert_eq!(c.coeffs(), &[1.0, 0.0, -1.0]);
    }
}
