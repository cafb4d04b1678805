//! The `parse_eqs` performance lever: an optional, pre-registered
//! specialized jet builder that the driver may substitute for the generic
//! order-by-order recursion in [`crate::jet`], after a one-shot dry run
//! confirms it behaves.
//!
//! The registry is an explicit value the caller owns and passes in — never
//! process-wide mutable state — keyed by whatever identity the caller uses
//! to name a vector field (a string tag is the common case; anything
//! `Eq + Hash` works).

use crate::errors::TaylorWarning;
use crate::series::{CoefficientRing, Series};
use std::collections::HashMap;
use std::hash::Hash;

/// A specialized scalar jet builder: given the canonical time series and the
/// current state (coefficient 0 already set), fills in coefficients 1..=N.
/// Returns `Err` if the specialization does not apply to this input and the
/// generic builder should be used instead.
pub type ScalarSpecialization<U, T, P> =
    Box<dyn Fn(&Series<T>, &mut Series<U>, &P) -> Result<(), SpecializationError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecializationError;

impl std::fmt::Display for SpecializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("registered specialization does not apply to this jet")
    }
}

impl std::error::Error for SpecializationError {}

/// A caller-owned map from vector-field identity to a specialized builder.
pub struct SpecializationRegistry<K, U, T, P>
where
    K: Eq + Hash,
    U: CoefficientRing,
    T: CoefficientRing<Real = T>,
{
    specializations: HashMap<K, ScalarSpecialization<U, T, P>>,
}

impl<K, U, T, P> Default for SpecializationRegistry<K, U, T, P>
where
    K: Eq + Hash,
    U: CoefficientRing,
    T: CoefficientRing<Real = T>,
{
    fn default() -> Self {
        Self { specializations: HashMap::new() }
    }
}

impl<K, U, T, P> SpecializationRegistry<K, U, T, P>
where
    K: Eq + Hash,
    U: CoefficientRing,
    T: CoefficientRing<Real = T>,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: K, builder: ScalarSpecialization<U, T, P>) {
        self.specializations.insert(key, builder);
    }

    /// Looks up, dry-runs, and either applies the specialization or reports
    /// that the caller should fall back to the generic builder.
    ///
    /// The dry run is performed on a throwaway clone of `x` so a
    /// specialization that only partially fills in coefficients before
    /// failing cannot corrupt the real jet.
    pub fn try_build(&self, key: &K, t: &Series<T>, x: &mut Series<U>, p: &P) -> SpecializationOutcome
    where
        U: Clone,
    {
        let Some(builder) = self.specializations.get(key) else {
            return SpecializationOutcome::NotRegistered;
        };
        let mut probe = x.clone();
        if builder(t, &mut probe, p).is_err() {
            return SpecializationOutcome::Failed;
        }
        *x = probe;
        SpecializationOutcome::Applied
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecializationOutcome {
    Applied,
    Failed,
    NotRegistered,
}

impl SpecializationOutcome {
    /// Emits [`TaylorWarning::SpecializationFallback`] when the
    /// specialization was attempted and failed (a missing registration is
    /// not a fallback, it is the normal unregistered case).
    pub fn warn_on_failure(&self) {
        if *self == SpecializationOutcome::Failed {
            TaylorWarning::SpecializationFallback.log();
        }
    }
}
