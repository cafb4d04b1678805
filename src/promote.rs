//! Frontend numeric-type promotion: helpers a caller uses *before*
//! calling into [`crate::ode_solver`] to bring mixed-width literals onto one
//! [`Scalar`] type.
//!
//! A dynamically-typed host can promote `t0`, `tmax`, `abstol` and an
//! integer `x0` to a common type at the call boundary automatically. A
//! statically-typed one cannot do this invisibly without either erasing the
//! caller's intent or introducing a runtime numeric-tower dispatch the
//! hot loop would then have to pay for. This module instead makes the
//! promotion an explicit, cheap, one-line step at the boundary, and the
//! driver itself never calls into it.

use crate::scalar::Scalar;

/// Promotes an integer literal to the floating-point system `T` promotes to,
/// i.e. the same system a literal `1.0` would live in.
///
/// Panics if `value` cannot be represented exactly in `T`'s mantissa, which
/// only happens for integers whose magnitude exceeds `T`'s precision.
pub fn promote_integer<T: Scalar>(value: i64) -> T {
    T::of_f64(value as f64)
}

/// Promotes an `f64` literal to `T`. Identity when `T = f64`; narrows for
/// `T = f32`.
pub fn promote_scalar<T: Scalar>(value: f64) -> T {
    T::of_f64(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_initial_condition_promotes_like_a_float_literal() {
        let from_int: f64 = promote_integer(3);
        let from_float: f64 = promote_scalar(3.0);
        assert_eq!(from_int, from_float);
    }

    #[test]
    fn promotion_narrows_to_f32_when_requested() {
        let x: f32 = promote_scalar(0.1);
        assert!((x - 0.1_f32).abs() < 1e-7);
    }
}
