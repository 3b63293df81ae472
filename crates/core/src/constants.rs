/// Constants used throughout the fusebox workspace
use std::time::Duration;

// Breaker defaults
pub const DEFAULT_BREAKER_NAME: &str = "default";
pub const DEFAULT_RESET_TIMEOUT: Duration = Duration::from_millis(15_000);

// Environment variable names
pub const FUSEBOX_LOG_VAR: &str = "FUSEBOX_LOG";
pub const FUSEBOX_BREAKER_NAME_VAR: &str = "FUSEBOX_BREAKER_NAME";
pub const FUSEBOX_RESET_TIMEOUT_VAR: &str = "FUSEBOX_RESET_TIMEOUT_MS";

// Default log filter when FUSEBOX_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";
