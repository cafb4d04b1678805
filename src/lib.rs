//! Adaptive Taylor-series integration of ordinary differential equations.
//!
//! The integrator advances a solution by building, at each step, a truncated
//! power series ("jet") of the state in the independent variable, via the
//! Picard recursion in [`jet`]; an adaptive rule in [`stepsize`] then picks
//! how far that jet can be trusted before re-expanding around a new point.
//!
//! Two state shapes are supported: a single [`series::Series`] for scalar
//! systems ([`ode_solver::scalar`]) and an [`nalgebra::DVector`] of them for
//! coupled systems ([`ode_solver::vector`]). Both are generic over the
//! coefficient ring ([`series::CoefficientRing`]), so the same driver code
//! integrates real- or complex-valued systems without duplication.

pub mod errors;
pub mod jet;
pub mod ode_solver;
pub mod promote;
pub mod scalar;
pub mod series;
pub mod specialize;
pub mod stepsize;

pub use errors::{TaylorError, TaylorWarning};
pub use jet::{build_jet, build_jet_inplace};
pub use ode_solver::config::TaylorConfig;
pub use ode_solver::interpolant::{JetEval, TaylorInterpolant};
pub use ode_solver::scalar::{solve_scalar_dense, solve_scalar_range, solve_scalar_steps, solve_scalar_steps_specialized};
pub use ode_solver::solution::{TaylorSamples, TaylorSolution};
pub use ode_solver::vector::{solve_vector_dense, solve_vector_range, solve_vector_steps};
pub use scalar::Scalar;
pub use series::{CoefficientRing, Series};
pub use specialize::{ScalarSpecialization, SpecializationError, SpecializationOutcome, SpecializationRegistry};
