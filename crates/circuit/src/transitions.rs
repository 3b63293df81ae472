//! State transition logic for circuit breaker.
//!
//! Every decision-critical field (state, last failure, probe marker, hard trip
//! flag) lives behind one mutex so that admission and outcome recording are
//! linearizable. The lock is only held for the transition itself, never while
//! the guarded operation runs.

use super::status;
use super::types::{CircuitState, Status};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Decision-critical breaker fields
#[derive(Debug, Clone, Copy)]
pub(crate) struct GateState {
    pub state: CircuitState,
    pub last_failure: Option<Instant>,
    pub last_failure_time: Option<DateTime<Utc>>,
    pub probe_in_flight: bool,
    pub hard_tripped: bool,
}

impl GateState {
    fn new() -> Self {
        Self {
            state: CircuitState::Closed,
            last_failure: None,
            last_failure_time: None,
            probe_in_flight: false,
            hard_tripped: false,
        }
    }

    pub fn cooldown_elapsed(&self, reset_timeout: Duration, now: Instant) -> bool {
        self.last_failure
            .map_or(true, |at| now.saturating_duration_since(at) >= reset_timeout)
    }
}

/// Result of asking the gate whether a call may run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    /// Circuit closed, call proceeds normally
    Pass,
    /// The single recovery probe for this half-open window
    Probe,
    Reject,
}

/// The breaker state machine
#[derive(Debug)]
pub(crate) struct Gate {
    name: String,
    inner: Mutex<GateState>,
    open_count: AtomicU64,
    reset_timeout_ms: AtomicU64,
}

impl Gate {
    pub fn new(name: String, reset_timeout: Duration) -> Self {
        Self {
            name,
            inner: Mutex::new(GateState::new()),
            open_count: AtomicU64::new(0),
            reset_timeout_ms: AtomicU64::new(duration_to_millis(reset_timeout)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reset_timeout(&self) -> Duration {
        Duration::from_millis(self.reset_timeout_ms.load(Ordering::SeqCst))
    }

    pub fn set_reset_timeout(&self, reset_timeout: Duration) {
        self.reset_timeout_ms
            .store(duration_to_millis(reset_timeout), Ordering::SeqCst);
    }

    pub fn open_count(&self) -> u64 {
        self.open_count.load(Ordering::SeqCst)
    }

    /// Copy of the guarded fields, read without transitioning
    pub fn snapshot(&self) -> GateState {
        *self.inner.lock()
    }

    /// Decide whether the upcoming call may run.
    ///
    /// The open to half-open transition and the probe check-and-set happen
    /// under the same lock acquisition, so only one caller per half-open
    /// window can receive `Admission::Probe`.
    pub fn admit(&self) -> Admission {
        let reset_timeout = self.reset_timeout();
        let mut gate = self.inner.lock();

        if gate.hard_tripped {
            tracing::debug!(breaker = %self.name, "call rejected, breaker hard tripped");
            return Admission::Reject;
        }

        if gate.state == CircuitState::Closed {
            return Admission::Pass;
        }

        if gate.state == CircuitState::Open && gate.cooldown_elapsed(reset_timeout, Instant::now())
        {
            tracing::info!(breaker = %self.name, "circuit breaker entering half-open state");
            gate.state = CircuitState::HalfOpen;
        }

        if gate.state == CircuitState::HalfOpen && !gate.probe_in_flight {
            gate.probe_in_flight = true;
            tracing::debug!(breaker = %self.name, "admitting recovery probe");
            return Admission::Probe;
        }

        tracing::debug!(breaker = %self.name, state = %gate.state, "call rejected");
        Admission::Reject
    }

    /// Record a successful call: close the circuit
    pub fn record_success(&self) {
        let mut gate = self.inner.lock();
        gate.probe_in_flight = false;

        // A call admitted before a hard trip must not undo it
        if gate.hard_tripped {
            return;
        }

        if gate.state != CircuitState::Closed {
            tracing::info!(breaker = %self.name, from = %gate.state, "circuit breaker closing");
            gate.state = CircuitState::Closed;
        }
    }

    /// Record a tripping failure: open the circuit and restart the cooldown
    pub fn record_failure(&self) {
        let mut gate = self.inner.lock();
        let open_count = self.open(&mut gate);
        drop(gate);

        tracing::warn!(breaker = %self.name, open_count, "circuit breaker opening");
    }

    fn open(&self, gate: &mut GateState) -> u64 {
        gate.state = CircuitState::Open;
        gate.last_failure = Some(Instant::now());
        gate.last_failure_time = Some(Utc::now());
        gate.probe_in_flight = false;
        self.open_count.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Give back a probe slot without touching state
    pub fn release_probe(&self) {
        let mut gate = self.inner.lock();
        if gate.probe_in_flight {
            tracing::debug!(breaker = %self.name, "probe finished without a verdict");
            gate.probe_in_flight = false;
        }
    }

    /// Manually open the circuit
    pub fn trip(&self) {
        self.record_failure();
    }

    /// Open the circuit and suppress automatic recovery until `reset`
    pub fn hard_trip(&self) {
        let mut gate = self.inner.lock();
        let open_count = self.open(&mut gate);
        gate.hard_tripped = true;
        drop(gate);

        tracing::warn!(breaker = %self.name, open_count, "circuit breaker hard tripped");
    }

    /// Force the circuit closed and clear any hard trip
    pub fn reset(&self) {
        let mut gate = self.inner.lock();
        gate.state = CircuitState::Closed;
        gate.hard_tripped = false;
        gate.probe_in_flight = false;
        drop(gate);

        tracing::info!(breaker = %self.name, "circuit breaker reset");
    }

    /// Health as seen from outside, without transitioning
    pub fn status(&self) -> Status {
        let reset_timeout = self.reset_timeout();
        let gate = self.snapshot();
        status::project(&gate, reset_timeout, Instant::now())
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
