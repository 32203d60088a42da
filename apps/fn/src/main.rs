//! docrelay CLI — object-storage upload relay.
//!
//! Reacts to PDF upload notifications: refreshes the knowledge base, asks
//! the configured agent to extract the document's details, and writes the
//! extraction back to object storage.

mod commands;
mod server;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
