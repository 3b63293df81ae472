//! Outcome classification: deciding which failures count against the breaker.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// What a failed call means for the breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Count the failure against the dependency and open the circuit
    Trip,
    /// Hand the error back unchanged and leave breaker state alone
    PassThrough,
}

/// Policy deciding whether an operation error should trip the breaker.
///
/// Any `Fn(&E) -> Verdict + Send + Sync` closure is a classifier.
pub trait OutcomeClassifier<E>: Send + Sync {
    fn classify(&self, error: &E) -> Verdict;
}

impl<E, F> OutcomeClassifier<E> for F
where
    F: Fn(&E) -> Verdict + Send + Sync,
{
    fn classify(&self, error: &E) -> Verdict {
        self(error)
    }
}

/// Shared handle to a classifier, as stored by the breaker
pub type SharedClassifier<E> = Arc<dyn OutcomeClassifier<E>>;

/// Result of an attempted call once classified
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome<T, E> {
    Success(T),
    TrippingFailure(E),
    NonTrippingFailure(E),
}

impl<T, E> Outcome<T, E> {
    /// Classify a raw result. Without a classifier every error trips.
    pub fn classify(result: Result<T, E>, classifier: Option<&dyn OutcomeClassifier<E>>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(error) => match classifier.map_or(Verdict::Trip, |c| c.classify(&error)) {
                Verdict::Trip => Outcome::TrippingFailure(error),
                Verdict::PassThrough => Outcome::NonTrippingFailure(error),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

type IgnorePredicate<E> = Box<dyn Fn(&E) -> bool + Send + Sync>;

/// Ready-made classifier with ignore rules and an optional failure tolerance.
///
/// Errors matching any ignore predicate never trip. With a tolerance of
/// `limit` errors per `window`, an error trips only once more than `limit`
/// errors have been seen within the trailing window. A zero limit or a zero
/// window disables the tolerance, so every error not ignored trips.
pub struct DefaultClassifier<E> {
    ignored: Vec<IgnorePredicate<E>>,
    limit: usize,
    window: Duration,
    recent: Mutex<VecDeque<Instant>>,
}

impl<E> DefaultClassifier<E> {
    pub fn new() -> Self {
        Self {
            ignored: Vec::new(),
            limit: 0,
            window: Duration::ZERO,
            recent: Mutex::new(VecDeque::new()),
        }
    }

    /// Never trip on errors matching `predicate`
    #[must_use]
    pub fn ignore<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.ignored.push(Box::new(predicate));
        self
    }

    /// Tolerate up to `limit` errors within `window` before tripping
    #[must_use]
    pub fn tolerate(mut self, limit: usize, window: Duration) -> Self {
        self.limit = limit;
        self.window = window;
        self
    }

    fn record_and_check(&self) -> Verdict {
        let now = Instant::now();
        let mut recent = self.recent.lock();
        recent.push_back(now);
        while let Some(&oldest) = recent.front() {
            if now.duration_since(oldest) > self.window {
                recent.pop_front();
            } else {
                break;
            }
        }

        if recent.len() > self.limit {
            Verdict::Trip
        } else {
            Verdict::PassThrough
        }
    }
}

impl<E> Default for DefaultClassifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for DefaultClassifier<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultClassifier")
            .field("ignored", &format_args!("<{} predicates>", self.ignored.len()))
            .field("limit", &self.limit)
            .field("window", &self.window)
            .finish()
    }
}

impl<E> OutcomeClassifier<E> for DefaultClassifier<E> {
    fn classify(&self, error: &E) -> Verdict {
        if self.ignored.iter().any(|ignored| ignored(error)) {
            tracing::trace!("error matched an ignore rule");
            return Verdict::PassThrough;
        }
        if self.limit == 0 || self.window.is_zero() {
            return Verdict::Trip;
        }
        self.record_and_check()
    }
}
