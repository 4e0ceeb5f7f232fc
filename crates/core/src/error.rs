//! Engine error model.

use thiserror::Error;

use crate::price::Price;

/// Result type used across the engine.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Engine-level error.
///
/// `NegativeStock` and `PriceConflict` are expected, user-facing two-phase
/// conditions: the caller resolves them by re-submitting with the explicit
/// override/confirmation flag. They are not incidents.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Malformed or missing input, rejected before any mutation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The referenced stock line does not exist.
    #[error("stock line not found")]
    NotFound,

    /// A structural change was detected mid-update (e.g. row vanished).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The computed final quantity is negative and no override was given.
    /// Recoverable: re-submit with `allow_negative = true`.
    #[error("adjustment would drive stock negative (computed {computed})")]
    NegativeStock { computed: i64 },

    /// Selling prices diverge across the SKU's lines.
    /// Recoverable: re-submit with `confirmed = true`.
    #[error("selling price conflict: current {current:?}, proposed {proposed}")]
    PriceConflict { current: Vec<Price>, proposed: Price },

    /// Torn state detected during a multi-row update; retry the whole call.
    #[error("concurrency violation: {0}")]
    Concurrency(String),

    /// Underlying store unavailable. Fatal to the current call.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn concurrency(msg: impl Into<String>) -> Self {
        Self::Concurrency(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Whether the caller can recover by re-submitting with an explicit flag.
    pub fn is_two_phase(&self) -> bool {
        matches!(
            self,
            Self::NegativeStock { .. } | Self::PriceConflict { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_phase_classification() {
        assert!(LedgerError::NegativeStock { computed: -5 }.is_two_phase());
        assert!(
            LedgerError::PriceConflict {
                current: vec![Price::from_minor(999)],
                proposed: Price::from_minor(1250),
            }
            .is_two_phase()
        );
        assert!(!LedgerError::not_found().is_two_phase());
        assert!(!LedgerError::validation("x").is_two_phase());
    }
}
