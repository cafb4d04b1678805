//! Dense output ("dense" and "range" modes): evaluating the jet that was
//! active over whichever accepted step covers a query time, rather than
//! re-integrating or linearly interpolating between grid points.

use crate::scalar::Scalar;
use crate::series::{CoefficientRing, Series};
use nalgebra::DVector;

/// A type a [`TaylorInterpolant`] can evaluate at an offset from a step's
/// start time: a scalar jet evaluates to a bare coefficient ring element, a
/// vector jet evaluates to a `DVector` of them.
pub trait JetEval<T: Scalar> {
    type Output;
    fn eval_at(&self, delta: T) -> Self::Output;
}

impl<T: Scalar, U: CoefficientRing<Real = T>> JetEval<T> for Series<U> {
    type Output = U;
    fn eval_at(&self, delta: T) -> U {
        self.evaluate(delta)
    }
}

impl<T: Scalar, U: CoefficientRing<Real = T>> JetEval<T> for DVector<Series<U>> {
    type Output = DVector<U>;
    fn eval_at(&self, delta: T) -> DVector<U> {
        DVector::from_iterator(self.len(), self.iter().map(|s| s.evaluate(delta)))
    }
}

/// The jet accepted on each step of an integration, kept around so a caller
/// can later query any time within `[t0, tmax]` (in the direction of
/// integration) without re-solving.
///
/// `knots[i]` is the time at which `jets[i]` was built; `jets[i]` is valid
/// for offsets in `[0, knots[i + 1] - knots[i]]` (forward) or the mirror
/// image in reverse time. The final knot has no corresponding jet: it marks
/// the end of the last step's validity window.
#[derive(Debug, Clone)]
pub struct TaylorInterpolant<T: Scalar, J> {
    knots: Vec<T>,
    jets: Vec<J>,
    forward: bool,
}

impl<T: Scalar, J> TaylorInterpolant<T, J> {
    pub(crate) fn new(forward: bool) -> Self {
        Self { knots: Vec::new(), jets: Vec::new(), forward }
    }

    pub(crate) fn push_step(&mut self, t_start: T, jet: J) {
        if self.knots.is_empty() {
            self.knots.push(t_start);
        }
        self.jets.push(jet);
    }

    pub(crate) fn close(&mut self, t_end: T) {
        self.knots.push(t_end);
    }

    pub fn knots(&self) -> &[T] {
        &self.knots
    }

    pub fn is_empty(&self) -> bool {
        self.jets.is_empty()
    }

    /// Finds the step whose half-open window (in the direction of
    /// integration) contains `tau`, then evaluates its jet at the offset
    /// from that step's start.
    ///
    /// Returns `None` if `tau` lies outside `[knots[0], knots[last]]` (with
    /// the appropriate end treated as closed, so the very last instant of
    /// the integration is always a valid query).
    pub fn evaluate(&self, tau: T) -> Option<J::Output>
    where
        J: JetEval<T>,
    {
        let last = self.knots.len().checked_sub(1)?;
        if last == 0 {
            return None;
        }
        let idx = if self.forward {
            if tau < self.knots[0] || tau > self.knots[last] {
                return None;
            }
            if tau == self.knots[last] {
                last - 1
            } else {
                self.knots.partition_point(|&k| k <= tau).saturating_sub(1)
            }
        } else {
            if tau > self.knots[0] || tau < self.knots[last] {
                return None;
            }
            if tau == self.knots[last] {
                last - 1
            } else {
                // `knots` is decreasing; find the first knot <= tau by
                // partitioning on the reversed order.
                let count_ge = self.knots.iter().take_while(|&&k| k >= tau).count();
                count_ge.saturating_sub(1)
            }
        };
        let delta = tau - self.knots[idx];
        Some(self.jets[idx].eval_at(delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_within_the_covering_segment() {
        let mut interp: TaylorInterpolant<f64, Series<f64>> = TaylorInterpolant::new(true);
        // step 0: [0, 1), jet = 1 + tau; step 1: [1, 2], jet = 2 + tau
        interp.push_step(0.0, Series::from_coeffs(vec![1.0, 1.0]));
        interp.push_step(1.0, Series::from_coeffs(vec![2.0, 1.0]));
        interp.close(2.0);

        assert_eq!(interp.evaluate(0.5).unwrap(), 1.5);
        assert_eq!(interp.evaluate(1.5).unwrap(), 2.5);
        // exact end of integration is still queryable
        assert_eq!(interp.evaluate(2.0).unwrap(), 3.0);
        assert!(interp.evaluate(2.1).is_none());
        assert!(interp.evaluate(-0.1).is_none());
    }

    #[test]
    fn handles_reverse_time_direction() {
        let mut interp: TaylorInterpolant<f64, Series<f64>> = TaylorInterpolant::new(false);
        interp.push_step(0.0, Series::from_coeffs(vec![1.0, -1.0]));
        interp.push_step(-1.0, Series::from_coeffs(vec![2.0, -1.0]));
        interp.close(-2.0);

        assert_eq!(interp.evaluate(-0.5).unwrap(), 1.5);
        assert_eq!(interp.evaluate(-2.0).unwrap(), 3.0);
        assert!(interp.evaluate(0.1).is_none());
    }
}
