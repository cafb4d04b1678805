//! The real-number ring used for time, step size and tolerances.

use num_traits::{Float, FromPrimitive, One, Zero};
use std::fmt::{Debug, Display};

/// Bounds shared by every real type the integrator can be instantiated with.
///
/// `f64` and `f32` are the two implementations that matter in practice; the
/// trait exists so the driver and step-size selector never hard-code a
/// concrete float width.
pub trait Scalar:
    Float
    + FromPrimitive
    + Zero
    + One
    + Copy
    + Clone
    + Debug
    + Display
    + serde::Serialize
    + for<'de> serde::Deserialize<'de>
    + 'static
{
    /// Shorthand for `FromPrimitive::from_f64(v).unwrap()`, used at promotion
    /// boundaries where the literal is always representable.
    fn of_f64(v: f64) -> Self {
        <Self as FromPrimitive>::from_f64(v).expect("literal representable in target scalar type")
    }
}

impl Scalar for f64 {}
impl Scalar for f32 {}
