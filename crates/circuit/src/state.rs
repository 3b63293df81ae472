//! Circuit breaker construction, configuration and observation.

use super::classifier::{OutcomeClassifier, SharedClassifier};
use super::config::CircuitBreakerConfig;
use super::status;
use super::transitions::Gate;
use super::types::{CircuitBreakerStats, CircuitState, Monitorable, Status};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Circuit breaker guarding calls that fail with `E`.
///
/// A breaker is created once per protected dependency and shared between all
/// callers, by reference or inside an `Arc`. Calls go through
/// [`invoke`](CircuitBreaker::invoke) and friends.
pub struct CircuitBreaker<E> {
    pub(crate) gate: Gate,
    classifier: RwLock<Option<SharedClassifier<E>>>,
}

impl<E> CircuitBreaker<E> {
    /// Create a new circuit breaker with the given configuration
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            gate: Gate::new(config.name, config.reset_timeout),
            classifier: RwLock::new(None),
        }
    }

    /// Builder-style classifier installation
    #[must_use]
    pub fn with_classifier<C>(self, classifier: C) -> Self
    where
        C: OutcomeClassifier<E> + 'static,
    {
        self.set_classifier(Some(Arc::new(classifier)));
        self
    }

    /// Replace the classifier; `None` makes every error trip
    pub fn set_classifier(&self, classifier: Option<SharedClassifier<E>>) {
        *self.classifier.write() = classifier;
    }

    pub fn classifier(&self) -> Option<SharedClassifier<E>> {
        self.classifier.read().clone()
    }

    pub fn name(&self) -> &str {
        self.gate.name()
    }

    pub fn reset_timeout(&self) -> Duration {
        self.gate.reset_timeout()
    }

    /// Change the cooldown; the next admission check uses the new value
    pub fn set_reset_timeout(&self, reset_timeout: Duration) {
        self.gate.set_reset_timeout(reset_timeout);
    }

    /// Raw state as last committed. Reading it never moves an open breaker
    /// to half-open.
    pub fn state(&self) -> CircuitState {
        self.gate.snapshot().state
    }

    pub fn is_hard_tripped(&self) -> bool {
        self.gate.snapshot().hard_tripped
    }

    /// Number of times the breaker has opened since it was created
    pub fn open_count(&self) -> u64 {
        self.gate.open_count()
    }

    /// Wall-clock time of the most recent trip
    pub fn last_failure_time(&self) -> Option<DateTime<Utc>> {
        self.gate.snapshot().last_failure_time
    }

    /// Open the circuit as if a call had failed
    pub fn trip(&self) {
        self.gate.trip();
    }

    /// Open the circuit and keep it open until [`reset`](CircuitBreaker::reset)
    pub fn hard_trip(&self) {
        self.gate.hard_trip();
    }

    /// Close the circuit and clear a hard trip
    pub fn reset(&self) {
        self.gate.reset();
    }

    /// Get current circuit breaker statistics, all read from one snapshot
    pub fn stats(&self) -> CircuitBreakerStats {
        let gate = self.gate.snapshot();
        let reset_timeout = self.reset_timeout();
        CircuitBreakerStats {
            name: self.name().to_string(),
            state: gate.state,
            status: status::project(&gate, reset_timeout, Instant::now()),
            open_count: self.open_count(),
            last_failure_time: gate.last_failure_time,
            reset_timeout_ms: u64::try_from(reset_timeout.as_millis()).unwrap_or(u64::MAX),
            hard_tripped: gate.hard_tripped,
            probe_in_flight: gate.probe_in_flight,
        }
    }
}

impl<E> Monitorable for CircuitBreaker<E> {
    fn status(&self) -> Status {
        self.gate.status()
    }
}

impl<E> CircuitBreaker<E> {
    /// Health derived from state and elapsed time. Never transitions.
    pub fn status(&self) -> Status {
        Monitorable::status(self)
    }
}

impl<E> Default for CircuitBreaker<E> {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}

impl<E> std::fmt::Debug for CircuitBreaker<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("gate", &self.gate)
            .field("has_classifier", &self.classifier.read().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Verdict;
    use std::io;

    #[test]
    fn test_defaults() {
        let cb: CircuitBreaker<io::Error> = CircuitBreaker::default();
        assert_eq!(cb.name(), "default");
        assert_eq!(cb.reset_timeout(), Duration::from_millis(15_000));
        assert_eq!(cb.state(), CircuitState::Closed);
        assert_eq!(cb.status(), Status::Healthy);
        assert_eq!(cb.open_count(), 0);
        assert!(cb.last_failure_time().is_none());
        assert!(cb.classifier().is_none());
    }

    #[test]
    fn test_manual_controls() {
        let cb: CircuitBreaker<io::Error> = CircuitBreaker::default();

        cb.trip();
        assert_eq!(cb.state(), CircuitState::Open);
        assert_eq!(cb.status(), Status::Unavailable);
        assert_eq!(cb.open_count(), 1);
        assert!(cb.last_failure_time().is_some());
        assert!(!cb.is_hard_tripped());

        cb.hard_trip();
        assert!(cb.is_hard_tripped());
        assert_eq!(cb.open_count(), 2);

        cb.reset();
        assert_eq!(cb.state(), CircuitState::Closed);
        assert!(!cb.is_hard_tripped());
        assert_eq!(cb.open_count(), 2);
    }

    #[test]
    fn test_classifier_can_be_swapped() {
        let cb: CircuitBreaker<io::Error> =
            CircuitBreaker::default().with_classifier(|_: &io::Error| Verdict::PassThrough);
        assert!(cb.classifier().is_some());

        cb.set_classifier(None);
        assert!(cb.classifier().is_none());
    }

    #[test]
    fn test_stats_snapshot() {
        let config = CircuitBreakerConfig::default()
            .with_name("payments")
            .with_reset_timeout(Duration::from_millis(250));
        let cb: CircuitBreaker<io::Error> = CircuitBreaker::new(config);
        cb.trip();

        let stats = cb.stats();
        assert_eq!(stats.name, "payments");
        assert_eq!(stats.state, CircuitState::Open);
        assert_eq!(stats.status, Status::Unavailable);
        assert_eq!(stats.open_count, 1);
        assert_eq!(stats.reset_timeout_ms, 250);
        assert!(!stats.hard_tripped);
        assert!(!stats.probe_in_flight);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["state"], "open");
        assert_eq!(json["status"], "unavailable");
        assert!(json["last_failure_time"].is_string());
    }

    #[test]
    fn test_stats_state_and_status_agree_under_contention() {
        let cb: CircuitBreaker<io::Error> = CircuitBreaker::new(
            CircuitBreakerConfig::default().with_reset_timeout(Duration::from_secs(60)),
        );

        std::thread::scope(|s| {
            s.spawn(|| {
                for _ in 0..2_000 {
                    cb.trip();
                    cb.reset();
                }
            });
            s.spawn(|| {
                for _ in 0..2_000 {
                    let stats = cb.stats();
                    let expected = match stats.state {
                        CircuitState::Closed => Status::Healthy,
                        CircuitState::Open => Status::Unavailable,
                        CircuitState::HalfOpen => Status::Degraded,
                    };
                    assert_eq!(stats.status, expected, "torn stats: {stats:?}");
                }
            });
        });
    }
}
