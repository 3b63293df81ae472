use clap::Subcommand;
use fusebox_circuit::CircuitBreakerConfig;
use std::path::Path;

pub mod config;
pub mod simulate;

#[derive(Subcommand)]
pub enum Commands {
    /// Run a script of calls through a breaker and report every step
    #[command(visible_alias = "sim")]
    Simulate {
        /// Steps: s=success f=failure i=invalid request (does not trip)
        /// w=wait t=trip h=hard trip r=reset
        script: String,

        /// Override the configured reset timeout
        #[arg(long, value_name = "MILLIS")]
        reset_timeout_ms: Option<u64>,

        /// How long a `w` step waits
        #[arg(long, value_name = "MILLIS", default_value = "100")]
        step_ms: u64,

        /// Emit one JSON object per step instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the effective breaker configuration as JSON
    Config,
}

impl Commands {
    pub async fn execute(self, config: CircuitBreakerConfig) -> eyre::Result<()> {
        match self {
            Commands::Simulate {
                script,
                reset_timeout_ms,
                step_ms,
                json,
            } => simulate::execute(config, &script, reset_timeout_ms, step_ms, json).await,
            Commands::Config => self::config::execute(&config),
        }
    }
}

/// Configuration file (or defaults) overlaid with the breaker environment variables
pub fn load_config(path: Option<&Path>) -> fusebox_core::Result<CircuitBreakerConfig> {
    let base = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading breaker configuration");
            CircuitBreakerConfig::from_file(path)?
        }
        None => CircuitBreakerConfig::default(),
    };
    base.overlay_env()
}
