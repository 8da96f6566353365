//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// CLI configuration for the demo binary. There is no deployment surface to
// read environment variables from here, so configuration is plain `clap`
// flags rather than the `dotenv`-backed `Config` the rest of the original
// repo uses for its services.
//--------------------------------------------------------------------------------------------------
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Clone, Debug)]
#[command(name = "demo", about = "Exercises the matching engine end-to-end")]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Run the built-in walkthrough scenarios and print a snapshot.
    Scenarios,
    /// Replay a CSV file of incoming orders against a fresh book.
    Replay {
        file: PathBuf,
        #[arg(long, default_value = "AAPL")]
        symbol: String,
        #[arg(long, default_value_t = 5)]
        depth: i64,
    },
    /// Ingest a CSV file of standing orders, then print a snapshot.
    Ingest {
        file: PathBuf,
        #[arg(long, default_value = "AAPL")]
        symbol: String,
        #[arg(long, default_value_t = 5)]
        depth: i64,
    },
}
