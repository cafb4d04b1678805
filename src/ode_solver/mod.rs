//! The adaptive Taylor-series driver: turns a vector-field callback plus a
//! [`TaylorConfig`] into one of three output modes: an adaptive grid
//! ("steps"), a queryable interpolant ("dense"), or samples at
//! caller-chosen instants ("range").
//!
//! Scalar systems go through [`scalar`]; coupled systems of equations go
//! through [`vector`]. The two are kept as separate, structurally parallel
//! modules rather than unified behind one generic abstraction: the
//! `Series<U>` vs. `DVector<Series<U>>` state shapes diverge enough (in-place
//! mutation, scratch buffer reuse) that a shared abstraction would buy
//! little and cost real clarity.

pub mod config;
pub mod interpolant;
pub mod scalar;
pub mod solution;
pub mod vector;

pub use config::TaylorConfig;
pub use interpolant::{JetEval, TaylorInterpolant};
pub use solution::{TaylorSamples, TaylorSolution};
