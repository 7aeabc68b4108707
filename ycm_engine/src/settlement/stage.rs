//! Stage outcomes for the settlement pipeline.
//!
//! Each stage reports whether the pipeline can carry on as normal, carry on with a reduced result (e.g. the tour type
//! could not be identified, or the customer is not a member), or must stop.
use log::*;

use crate::ycm_api::errors::SettlementError;

#[derive(Debug)]
pub enum StageOutcome<T> {
    Proceed(T),
    /// Carry on with `value`, but `reason` should be logged.
    Degraded { value: T, reason: String },
    Fatal(SettlementError),
}

impl<T> StageOutcome<T> {
    pub fn degraded<S: Into<String>>(value: T, reason: S) -> Self {
        Self::Degraded { value, reason: reason.into() }
    }

    /// Unwraps the stage result for the next stage, logging degraded outcomes against the stage `label`.
    pub fn proceed(self, label: &str) -> Result<T, SettlementError> {
        match self {
            Self::Proceed(v) => {
                trace!("⚓️ {label}: ok");
                Ok(v)
            },
            Self::Degraded { value, reason } => {
                warn!("⚓️ {label}: continuing without full result. {reason}");
                Ok(value)
            },
            Self::Fatal(e) => {
                warn!("⚓️ {label}: settlement halted. {e}");
                Err(e)
            },
        }
    }
}

impl<T, E: Into<SettlementError>> From<Result<T, E>> for StageOutcome<T> {
    fn from(value: Result<T, E>) -> Self {
        match value {
            Ok(v) => Self::Proceed(v),
            Err(e) => Self::Fatal(e.into()),
        }
    }
}
