//! Errors surfaced by a guarded call.

/// Error returned from a call made through a [`CircuitBreaker`](crate::CircuitBreaker).
///
/// `Open` means the operation never ran. `Operation` carries the operation's
/// own error untouched, whether or not it tripped the breaker.
#[derive(Debug, thiserror::Error)]
pub enum BreakerError<E> {
    /// The breaker rejected the call before the operation was attempted
    #[error("circuit breaker is open - call not attempted")]
    Open,
    /// The operation ran and failed
    #[error("{0}")]
    Operation(E),
}

impl<E> BreakerError<E> {
    /// True when the call was rejected without running
    pub fn is_open(&self) -> bool {
        matches!(self, BreakerError::Open)
    }

    /// The operation's own error, if it ran
    pub fn into_operation(self) -> Option<E> {
        match self {
            BreakerError::Open => None,
            BreakerError::Operation(error) => Some(error),
        }
    }

    /// Borrow the operation's own error, if it ran
    pub fn operation(&self) -> Option<&E> {
        match self {
            BreakerError::Open => None,
            BreakerError::Operation(error) => Some(error),
        }
    }
}
