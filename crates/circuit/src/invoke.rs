//! Calling conventions for running operations through a breaker.
//!
//! Every form follows the same algorithm: ask the gate for admission, run the
//! operation, classify its result and record the outcome.

use super::classifier::Outcome;
use super::error::BreakerError;
use super::state::CircuitBreaker;
use super::transitions::{Admission, Gate};
use std::future::Future;

/// Admission token held by a call between admission and outcome.
///
/// A permit dropped without an outcome (panic in the operation or the
/// classifier, or a cancelled future) counts as a tripping failure.
struct Permit<'a> {
    gate: &'a Gate,
    probe: bool,
    settled: bool,
}

impl Permit<'_> {
    fn succeed(mut self) {
        self.settled = true;
        self.gate.record_success();
    }

    fn fail(mut self) {
        self.settled = true;
        self.gate.record_failure();
    }

    fn pass_through(mut self) {
        self.settled = true;
        if self.probe {
            self.gate.release_probe();
        }
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::error!(
                breaker = %self.gate.name(),
                probe = self.probe,
                "admitted call ended without an outcome, counting it as a failure"
            );
            self.gate.record_failure();
        }
    }
}

impl<E> CircuitBreaker<E> {
    fn acquire(&self) -> Result<Permit<'_>, BreakerError<E>> {
        let probe = match self.gate.admit() {
            Admission::Pass => false,
            Admission::Probe => true,
            Admission::Reject => return Err(BreakerError::Open),
        };
        Ok(Permit {
            gate: &self.gate,
            probe,
            settled: false,
        })
    }

    fn settle<T>(&self, permit: Permit<'_>, result: Result<T, E>) -> Result<T, BreakerError<E>> {
        let classifier = self.classifier();
        match Outcome::classify(result, classifier.as_deref()) {
            Outcome::Success(value) => {
                permit.succeed();
                Ok(value)
            }
            Outcome::TrippingFailure(error) => {
                permit.fail();
                Err(BreakerError::Operation(error))
            }
            Outcome::NonTrippingFailure(error) => {
                tracing::debug!(breaker = %self.name(), "error passed through without tripping");
                permit.pass_through();
                Err(BreakerError::Operation(error))
            }
        }
    }

    /// Run `operation` if the breaker admits it.
    ///
    /// Returns `BreakerError::Open` without touching `operation` when the call
    /// is rejected, otherwise the operation's value or its own error.
    pub fn invoke<T, F>(&self, operation: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let permit = self.acquire()?;
        let result = operation();
        self.settle(permit, result)
    }

    /// Run a side-effecting operation that produces no value
    pub fn run<F>(&self, operation: F) -> Result<(), BreakerError<E>>
    where
        F: FnOnce() -> Result<(), E>,
    {
        self.invoke(operation)
    }

    /// Run a side-effecting operation and hand back `value` when it succeeds
    pub fn run_with<V, F>(&self, operation: F, value: V) -> Result<V, BreakerError<E>>
    where
        F: FnOnce() -> Result<(), E>,
    {
        self.invoke(operation).map(|()| value)
    }

    /// Async form of [`invoke`](CircuitBreaker::invoke).
    ///
    /// Dropping the returned future after admission counts as a tripping
    /// failure.
    pub async fn call<T, F, Fut>(&self, operation: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let permit = self.acquire()?;
        let result = operation().await;
        self.settle(permit, result)
    }
}
