//! Failure-isolation gate (circuit breaker) for fallible calls.
//!
//! A [`CircuitBreaker`] sits in front of an operation, usually a call to a
//! remote dependency, and decides per invocation whether the call may run.
//! After a failure it opens and rejects calls with [`BreakerError::Open`]
//! until its reset timeout has elapsed, then lets exactly one probe call
//! through. A successful probe closes it again; a failed probe reopens it.
//!
//! ## Architecture
//!
//! - [`types`] - Core types and enums (CircuitState, Status, stats)
//! - [`config`] - Configuration and its JSON / environment loaders
//! - [`classifier`] - Deciding which errors trip the breaker
//! - [`error`] - The error returned by guarded calls
//! - `transitions` - The state machine and single-probe admission gate
//! - `status` - Projection of state onto a health signal
//! - `state` / `invoke` - The public breaker and its calling conventions
//!
//! ## Examples
//!
//! ```rust,no_run
//! use fusebox_circuit::{BreakerError, CircuitBreaker, CircuitBreakerConfig, Verdict};
//! use std::io;
//! use std::time::Duration;
//!
//! let config = CircuitBreakerConfig::default().with_reset_timeout(Duration::from_secs(5));
//! let cb = CircuitBreaker::new(config).with_classifier(|e: &io::Error| {
//!     if e.kind() == io::ErrorKind::InvalidInput {
//!         Verdict::PassThrough
//!     } else {
//!         Verdict::Trip
//!     }
//! });
//!
//! match cb.invoke(|| std::fs::read_to_string("/srv/upstream/health")) {
//!     Ok(body) => println!("{body}"),
//!     Err(BreakerError::Open) => eprintln!("upstream is cooling down"),
//!     Err(BreakerError::Operation(e)) => eprintln!("upstream failed: {e}"),
//! }
//! ```

pub mod classifier;
pub mod config;
pub mod error;
mod invoke;
mod state;
mod status;
#[cfg(test)]
mod tests;
mod transitions;
pub mod types;

// Re-export public API
pub use classifier::{DefaultClassifier, Outcome, OutcomeClassifier, SharedClassifier, Verdict};
pub use config::CircuitBreakerConfig;
pub use error::BreakerError;
pub use state::CircuitBreaker;
pub use types::{CircuitBreakerStats, CircuitState, Monitorable, Status};
