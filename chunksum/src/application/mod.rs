pub mod handlers;

use crate::presentation::cli::Cli;
use chunksum_core::error::Result;
use clap::Parser;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    handlers::init_logging(cli.verbose);
    tracing::debug!(?cli, "parsed arguments");

    if cli.list_algorithms {
        return handlers::handle_list_algorithms();
    }
    handlers::handle_hash(cli)
}
