//! Core types and enums for circuit breaker functionality.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Circuit is closed - requests pass through normally
    Closed,
    /// Circuit is open - requests fail immediately
    Open,
    /// Circuit is half-open - a single probe is allowed to test recovery
    HalfOpen,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "closed"),
            CircuitState::Open => write!(f, "open"),
            CircuitState::HalfOpen => write!(f, "half-open"),
        }
    }
}

/// Health of the protected dependency as seen through the breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Calls flow normally
    Healthy,
    /// A recovery probe is running or due
    Degraded,
    /// Calls are being rejected
    Unavailable,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Healthy => write!(f, "healthy"),
            Status::Degraded => write!(f, "degraded"),
            Status::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Anything that can report a [`Status`] to a monitoring collaborator.
pub trait Monitorable {
    /// Current health, computed without side effects
    fn status(&self) -> Status;
}

/// Point-in-time snapshot of everything a breaker exposes for telemetry
#[derive(Debug, Clone, Serialize)]
pub struct CircuitBreakerStats {
    pub name: String,
    pub state: CircuitState,
    pub status: Status,
    pub open_count: u64,
    pub last_failure_time: Option<DateTime<Utc>>,
    pub reset_timeout_ms: u64,
    pub hard_tripped: bool,
    pub probe_in_flight: bool,
}
