// freqidx - word-frequency indexer
// Main CLI entry point

use clap::Parser;
use freqidx::cli::{Cli, CliDispatcher};
use freqidx::utils::error::UserError;
use freqidx::utils::logging;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let result = CliDispatcher::execute(cli.command).await;

    if let Err(err) = result {
        tracing::debug!(error = ?err, "Command failed");
        let user_error = UserError::from_indexer_error(&err);
        user_error.print();
        process::exit(user_error.exit_code);
    }
}
