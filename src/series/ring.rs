//! The coefficient ring abstraction `U` that [`super::Series`] is generic over.

use crate::scalar::Scalar;
use num_complex::Complex;
use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

/// The algebraic structure a Taylor-series coefficient ring must supply.
///
/// Implemented for plain real scalars (`f64`, `f32`) and for
/// `num_complex::Complex<T>`, which is enough to demonstrate that the jet
/// builder and driver are oblivious to whether they are integrating a real,
/// complex, or (with a user-supplied `CoefficientRing` impl) interval- or
/// perturbation-series-valued system.
pub trait CoefficientRing:
    Clone
    + PartialEq
    + Debug
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + serde::Serialize
    + for<'de> serde::Deserialize<'de>
{
    /// The real type a norm of `Self` reduces to, and that `Self` can be
    /// scaled by.
    type Real: Scalar;

    /// A zero element "of the same shape" as `self` (for a plain scalar
    /// ring this ignores `self`; richer rings, e.g. fixed-size component
    /// vectors, would use it to preserve dimensionality).
    fn zero_like(&self) -> Self;

    /// A multiplicative identity "of the same shape" as `self`.
    fn one_like(&self) -> Self;

    /// Division by a small positive integer, as required by the Picard
    /// recursion's `1/(k+1)` factor.
    fn div_u32(&self, n: u32) -> Self;

    /// Multiplication by a real scalar (used for Horner evaluation and for
    /// scaling a jet by a step size).
    fn scale(&self, s: Self::Real) -> Self;

    /// The infinity-norm reduction to `Self::Real` used by the step-size
    /// selector.
    fn norm(&self) -> Self::Real;

    /// Whether every "lane" of this value is finite; used to detect a
    /// diverging integration.
    fn is_finite(&self) -> bool;
}

macro_rules! impl_coefficient_ring_for_real {
    ($t:ty) => {
        impl CoefficientRing for $t {
            type Real = $t;

            fn zero_like(&self) -> Self {
                0.0
            }
            fn one_like(&self) -> Self {
                1.0
            }
            fn div_u32(&self, n: u32) -> Self {
                self / (n as $t)
            }
            fn scale(&self, s: Self::Real) -> Self {
                self * s
            }
            fn norm(&self) -> Self::Real {
                self.abs()
            }
            fn is_finite(&self) -> bool {
                <$t>::is_finite(*self)
            }
        }
    };
}

impl_coefficient_ring_for_real!(f64);
impl_coefficient_ring_for_real!(f32);

impl<T: Scalar> CoefficientRing for Complex<T> {
    type Real = T;

    fn zero_like(&self) -> Self {
        Complex::new(T::zero(), T::zero())
    }
    fn one_like(&self) -> Self {
        Complex::new(T::one(), T::zero())
    }
    fn div_u32(&self, n: u32) -> Self {
        let d = T::of_f64(n as f64);
        Complex::new(self.re / d, self.im / d)
    }
    fn scale(&self, s: T) -> Self {
        Complex::new(self.re * s, self.im * s)
    }
    fn norm(&self) -> T {
        Complex::norm(*self)
    }
    fn is_finite(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64_div_u32_matches_plain_division() {
        assert_eq!(CoefficientRing::div_u32(&6.0_f64, 3), 2.0);
    }

    #[test]
    fn complex_norm_is_modulus() {
        let z = Complex::new(3.0_f64, 4.0_f64);
        assert_eq!(CoefficientRing::norm(&z), 5.0);
    }
}
