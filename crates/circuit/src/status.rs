//! Projection of breaker state onto an external health signal.

use super::transitions::GateState;
use super::types::{CircuitState, Status};
use std::time::{Duration, Instant};

/// Derive the health signal for a snapshot of the breaker.
///
/// An open breaker whose cooldown has run out reports `Degraded`: the next
/// caller will be admitted as a probe.
pub(crate) fn project(gate: &GateState, reset_timeout: Duration, now: Instant) -> Status {
    match gate.state {
        CircuitState::Closed => Status::Healthy,
        CircuitState::HalfOpen => Status::Degraded,
        CircuitState::Open
            if !gate.hard_tripped && gate.cooldown_elapsed(reset_timeout, now) =>
        {
            Status::Degraded
        }
        CircuitState::Open => Status::Unavailable,
    }
}
