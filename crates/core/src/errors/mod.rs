//! Error types for fusebox configuration and tooling

mod builders;
mod display;
mod types;

pub use types::{Error, Result};
