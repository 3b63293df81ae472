//! Core errors and constants shared across the `fusebox` workspace.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the workspace `Error` enum and `Result` alias used by
//!   configuration loading and the command line front end.
//! - **`constants`**: Breaker defaults and the environment variable names the
//!   loaders understand.

pub mod constants;
pub mod errors;

pub use self::{
    constants::*,
    errors::{Error, Result},
};
