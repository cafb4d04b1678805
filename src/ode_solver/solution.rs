//! Output containers for the three driver modes ("Output modes").

use crate::errors::TaylorWarning;

/// Result of "steps" mode: the sequence of accepted grid points the adaptive
/// step selector actually chose, plus any non-fatal warnings collected along
/// the way.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TaylorSolution<T, U> {
    pub t: Vec<T>,
    pub x: Vec<U>,
    pub warnings: Vec<TaylorWarning>,
}

impl<T, U> TaylorSolution<T, U> {
    pub(crate) fn with_capacity(cap: usize) -> Self {
        Self { t: Vec::with_capacity(cap), x: Vec::with_capacity(cap), warnings: Vec::new() }
    }

    pub(crate) fn push(&mut self, t: T, x: U) {
        self.t.push(t);
        self.x.push(x);
    }

    pub(crate) fn warn(&mut self, warning: TaylorWarning) {
        warning.log();
        self.warnings.push(warning);
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
}

/// Result of "dense" or "range" mode: samples at a caller-chosen set of
/// times, each evaluated from the jet that was active when the adaptive
/// stepper passed over it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TaylorSamples<T, U> {
    pub t: Vec<T>,
    pub x: Vec<U>,
    pub warnings: Vec<TaylorWarning>,
}

impl<T, U> TaylorSamples<T, U> {
    pub(crate) fn with_capacity(cap: usize) -> Self {
        Self { t: Vec::with_capacity(cap), x: Vec::with_capacity(cap), warnings: Vec::new() }
    }

    pub(crate) fn push(&mut self, t: T, x: U) {
        self.t.push(t);
        self.x.push(x);
    }

    pub(crate) fn warn(&mut self, warning: TaylorWarning) {
        warning.log();
        self.warnings.push(warning);
    }
}
