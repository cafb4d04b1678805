//! Error and warning taxonomy for the driver.
//!
//! Validation failures and a non-finite step are the only conditions that
//! stop the driver from returning a normal result; everything else (the
//! step budget being hit, a failed `parse_eqs` specialization probe) is
//! recoverable and is reported through [`TaylorWarning`] instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaylorError<T: std::fmt::Debug, S> {
    #[error("invalid integration input: {reason}")]
    InvalidInput { reason: &'static str },

    #[error("step size became non-finite or non-positive at t = {t:?}")]
    NonFiniteStep {
        t: T,
        /// The prefix of the solution successfully computed before the step
        /// collapsed; still a well-formed, usable result.
        partial: S,
    },
}

/// Benign, user-visible diagnostics that do not prevent a result from being
/// returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TaylorWarning {
    /// The driver stopped because `nsteps` exceeded `max_steps`, not
    /// because it reached `tmax`.
    MaxStepsReached,
    /// `parse_eqs` was requested but the registered specialization failed
    /// its dry run; the generic jet builder was used instead.
    SpecializationFallback,
}

impl std::fmt::Display for TaylorWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            TaylorWarning::MaxStepsReached => "maximum number of integration steps reached",
            TaylorWarning::SpecializationFallback => {
                "parse_eqs specialization failed its dry run, falling back to the generic jet builder"
            }
        };
        f.write_str(msg)
    }
}

impl TaylorWarning {
    /// Emits this warning through the `log` facade, at `warn` level.
    pub fn log(&self) {
        log::warn!("{self}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_log_through_an_installed_subscriber() {
        let _ = env_logger::builder().is_test(true).try_init();
        TaylorWarning::MaxStepsReached.log();
        TaylorWarning::SpecializationFallback.log();
    }
}
