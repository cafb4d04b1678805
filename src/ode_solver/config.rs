use crate::errors::TaylorError;
use crate::scalar::Scalar;

/// Parameters shared by every driver entry point.
///
/// `order` and `abstol` have no sensible default and are required at
/// construction; `max_steps` and `parse_eqs` take their usual defaults and
/// are overridden with the fluent `with_*` methods.
#[derive(Debug, Clone, Copy)]
pub struct TaylorConfig<T: Scalar> {
    order: usize,
    abstol: T,
    max_steps: usize,
    parse_eqs: bool,
}

impl<T: Scalar> TaylorConfig<T> {
    pub fn new(order: usize, abstol: T) -> Self {
        Self { order, abstol, max_steps: 500, parse_eqs: true }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_parse_eqs(mut self, parse_eqs: bool) -> Self {
        self.parse_eqs = parse_eqs;
        self
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn abstol(&self) -> T {
        self.abstol
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn parse_eqs(&self) -> bool {
        self.parse_eqs
    }

    /// Validates the entry-boundary invariants: a non-positive order or a
    /// non-positive/non-finite tolerance fails fast, before any working
    /// storage is allocated.
    pub fn validate<S>(&self) -> Result<(), TaylorError<T, S>>
    where
        S: std::fmt::Debug,
    {
        if self.order < 1 {
            return Err(TaylorError::InvalidInput { reason: "order must be a positive integer" });
        }
        if !(self.abstol > T::zero()) || !self.abstol.is_finite() {
            return Err(TaylorError::InvalidInput { reason: "abstol must be a positive, finite real" });
        }
        if self.max_steps < 1 {
            return Err(TaylorError::InvalidInput { reason: "max_steps must be a positive integer" });
        }
        Ok(())
    }
}

/// Validates that `t0` and `tmax` are finite and (for range mode) that
/// `trange` is strictly monotone with endpoints `t0` and `tmax`.
pub fn validate_horizon<T: Scalar, S: std::fmt::Debug>(t0: T, tmax: T) -> Result<(), TaylorError<T, S>> {
    if !t0.is_finite() || !tmax.is_finite() {
        return Err(TaylorError::InvalidInput { reason: "t0 and tmax must be finite" });
    }
    Ok(())
}

pub fn validate_trange<T: Scalar, S: std::fmt::Debug>(trange: &[T], t0: T, tmax: T) -> Result<(), TaylorError<T, S>> {
    if trange.len() < 2 {
        return Err(TaylorError::InvalidInput { reason: "trange must have at least two samples" });
    }
    let sign = (tmax - t0).signum();
    for w in trange.windows(2) {
        if (w[1] - w[0]).signum() != sign {
            return Err(TaylorError::InvalidInput { reason: "trange must be strictly monotone in the integration direction" });
        }
    }
    if trange[0] != t0 {
        return Err(TaylorError::InvalidInput { reason: "trange must start at t0" });
    }
    if trange[trange.len() - 1] != tmax {
        return Err(TaylorError::InvalidInput { reason: "trange must end at tmax" });
    }
    Ok(())
}
