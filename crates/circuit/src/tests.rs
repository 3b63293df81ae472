//! Integration tests for circuit breaker functionality.
//!
//! These tests drive the breaker through complete lifecycles using the public
//! calling conventions.

#[cfg(test)]
mod integration_tests {
    use crate::{
        BreakerError, CircuitBreaker, CircuitBreakerConfig, CircuitState, DefaultClassifier,
        Status,
    };
    use proptest::prelude::*;
    use std::io::{Error as IoError, ErrorKind};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::sleep;

    fn breaker(reset_timeout_ms: u64) -> CircuitBreaker<IoError> {
        CircuitBreaker::new(
            CircuitBreakerConfig::default().with_reset_timeout(Duration::from_millis(reset_timeout_ms)),
        )
    }

    fn outage() -> IoError {
        IoError::new(ErrorKind::ConnectionRefused, "dependency down")
    }

    #[tokio::test]
    async fn test_probe_success_closes_breaker() {
        let cb = breaker(100);

        // call 1 trips
        let err = cb.call(|| async { Err::<(), _>(outage()) }).await.unwrap_err();
        assert!(matches!(err, BreakerError::Operation(_)));
        assert_eq!(cb.state(), CircuitState::Open);
        assert_eq!(cb.open_count(), 1);

        // call 2 is rejected
        let err = cb.call(|| async { Ok::<_, IoError>(()) }).await.unwrap_err();
        assert!(err.is_open());

        sleep(Duration::from_millis(150)).await;

        // call 3 is the probe
        cb.call(|| async { Ok::<_, IoError>(()) }).await.unwrap();
        assert_eq!(cb.state(), CircuitState::Closed);

        // call 4 flows normally
        assert_eq!(cb.call(|| async { Ok::<_, IoError>(4) }).await.unwrap(), 4);
        assert_eq!(cb.open_count(), 1);
    }

    #[tokio::test]
    async fn test_probe_failure_reopens_breaker() {
        let cb = breaker(100);

        let _ = cb.call(|| async { Err::<(), _>(outage()) }).await;
        let first_failure = cb.last_failure_time().unwrap();

        sleep(Duration::from_millis(150)).await;

        let err = cb.call(|| async { Err::<(), _>(outage()) }).await.unwrap_err();
        assert!(!err.is_open());
        assert_eq!(cb.state(), CircuitState::Open);
        assert_eq!(cb.open_count(), 2);
        assert!(cb.last_failure_time().unwrap() > first_failure);

        // cooldown restarted with the probe failure
        assert!(cb.call(|| async { Ok::<_, IoError>(()) }).await.unwrap_err().is_open());
    }

    #[tokio::test]
    async fn test_hard_trip_outlasts_many_cooldowns() {
        let cb = breaker(20);
        let attempts = AtomicUsize::new(0);

        cb.hard_trip();
        for _ in 0..5 {
            sleep(Duration::from_millis(40)).await;
            assert_eq!(cb.status(), Status::Unavailable);
            let result = cb.invoke(|| {
                attempts.fetch_add(1, Ordering::SeqCst);
                Ok::<_, IoError>(())
            });
            assert!(result.unwrap_err().is_open());
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 0);

        cb.reset();
        assert_eq!(cb.status(), Status::Healthy);
        cb.invoke(|| {
            attempts.fetch_add(1, Ordering::SeqCst);
            Ok::<_, IoError>(())
        })
        .unwrap();
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_status_tracks_recovery_without_transitioning() {
        let cb = breaker(50);
        cb.trip();
        assert_eq!(cb.status(), Status::Unavailable);

        sleep(Duration::from_millis(80)).await;
        for _ in 0..10 {
            assert_eq!(cb.status(), Status::Degraded);
        }
        assert_eq!(cb.state(), CircuitState::Open);

        cb.invoke(|| Ok::<_, IoError>(())).unwrap();
        assert_eq!(cb.status(), Status::Healthy);
    }

    #[test]
    fn test_default_classifier_tolerance_through_breaker() {
        let cb = breaker(60_000).with_classifier(
            DefaultClassifier::new()
                .ignore(|e: &IoError| e.kind() == ErrorKind::NotFound)
                .tolerate(2, Duration::from_secs(60)),
        );

        let missing = || Err::<(), _>(IoError::new(ErrorKind::NotFound, "no such record"));
        for _ in 0..5 {
            assert!(!cb.invoke(missing).unwrap_err().is_open());
        }
        assert_eq!(cb.state(), CircuitState::Closed);

        let _ = cb.invoke(|| Err::<(), _>(outage()));
        let _ = cb.invoke(|| Err::<(), _>(outage()));
        assert_eq!(cb.state(), CircuitState::Closed);
        assert_eq!(cb.open_count(), 0);

        let _ = cb.invoke(|| Err::<(), _>(outage()));
        assert_eq!(cb.state(), CircuitState::Open);
        assert_eq!(cb.open_count(), 1);
    }

    #[derive(Debug, Clone, Copy)]
    enum Step {
        Call(bool),
        Status,
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![any::<bool>().prop_map(Step::Call), Just(Step::Status)]
    }

    fn replay(steps: &[Step], with_status: bool) -> Vec<(bool, CircuitState, u64)> {
        let cb = breaker(0);
        let mut trace = Vec::new();
        for step in steps {
            match *step {
                Step::Call(ok) => {
                    let result = cb.invoke(|| if ok { Ok(()) } else { Err(outage()) });
                    trace.push((
                        matches!(result, Err(BreakerError::Open)),
                        cb.state(),
                        cb.open_count(),
                    ));
                }
                Step::Status => {
                    if with_status {
                        let _ = cb.status();
                        let _ = cb.stats();
                    }
                }
            }
        }
        trace
    }

    proptest! {
        #[test]
        fn prop_successes_keep_breaker_closed(calls in 1usize..64) {
            let cb = breaker(60_000);
            for i in 0..calls {
                prop_assert_eq!(cb.invoke(|| Ok::<_, IoError>(i)).unwrap(), i);
                prop_assert_eq!(cb.state(), CircuitState::Closed);
            }
            prop_assert_eq!(cb.open_count(), 0);
        }

        #[test]
        fn prop_status_queries_do_not_change_behaviour(steps in proptest::collection::vec(step(), 0..48)) {
            prop_assert_eq!(replay(&steps, true), replay(&steps, false));
        }

        #[test]
        fn prop_each_tripping_failure_counts_once(failures in 1u64..32) {
            let cb = breaker(0);
            for n in 1..=failures {
                let _ = cb.invoke(|| Err::<(), _>(outage()));
                prop_assert_eq!(cb.open_count(), n);
                prop_assert_eq!(cb.state(), CircuitState::Open);
            }
        }
    }
}
