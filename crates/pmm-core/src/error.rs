//! Error types for the quoting engine.
//!
//! Every variant is a precondition failure: the engine rejects the call
//! instead of letting a NaN or infinity propagate into quote prices.
//! None of these are recoverable inside the engine; retry policy, if
//! any, belongs to the driving control loop.

use thiserror::Error;

use crate::types::Phase;

/// Precondition failures surfaced to the driving loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A denominator that must be nonzero was zero.
    #[error("Division by zero: {0}")]
    DivisionByZero(&'static str),

    /// Risk state cannot feed the spread formula (non-positive book
    /// risk coefficient, or zero inventory risk aversion).
    #[error("Invalid risk state: {0}")]
    InvalidRiskState(&'static str),

    /// Settlement was requested before any quote produced an order size.
    #[error("Uninitialized state: {0}")]
    UninitializedState(&'static str),

    /// Quote and settlement must alternate; the call arrived out of order.
    #[error("Out-of-phase call: engine is awaiting {0}")]
    SequencingViolation(Phase),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::DivisionByZero("order book has no resting orders");
        assert_eq!(
            err.to_string(),
            "Division by zero: order book has no resting orders"
        );

        let err = EngineError::SequencingViolation(Phase::Settlement);
        assert_eq!(err.to_string(), "Out-of-phase call: engine is awaiting settlement");
    }
}
