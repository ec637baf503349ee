//! tiercheck - tier-aware smoke tests for HTTP endpoints
//!
//! Runs suites of endpoint checks grouped by test-pyramid tier against a
//! server under test, and reports pass/fail with per-tier timing.

use clap::Parser;
use tiercheck::commands::Commands;
use tiercheck::{cli, common::logging};

#[derive(Parser)]
#[command(name = "tiercheck", about = "Tier-aware smoke tests for HTTP endpoints")]
#[command(version, long_about = None)]
struct Cli {
    /// Also write logs to a file under the data directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_file);

    match cli::dispatch(cli.command).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
