use clap::Parser;
use std::path::PathBuf;

mod commands;
mod logging;

use commands::Commands;

#[derive(Parser)]
#[command(name = "fusebox")]
#[command(about = "Drive and inspect a circuit breaker", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON breaker configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = commands::load_config(cli.config.as_deref())?;
    cli.command.execute(config).await
}
