//! Caleta catalog maintenance CLI

use std::process;

use caleta_app::observability::init_logging;
use clap::Parser;
use tracing::error;

use crate::cli::Cli;

mod cli;

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(init_error) = init_logging(&cli.logging) {
        eprintln!("{init_error}");
        process::exit(1);
    }

    if let Err(message) = cli.run().await {
        error!("{message}");
        process::exit(1);
    }
}
