//! Core error type definitions

use std::path::PathBuf;

/// Result type alias for fusebox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for fusebox operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors
    Configuration { message: String },

    /// Environment variable related errors
    Environment { variable: String, message: String },

    /// File system operations
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}
