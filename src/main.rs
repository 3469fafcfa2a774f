//! CLI entry point for twinegraph

use std::process::ExitCode;

use clap::Parser;
use twinegraph::cli::{self, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    cli::logger::init(cli.log_level());

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            for cause in err.chain().skip(1) {
                eprintln!("Reason: {cause}");
            }
            ExitCode::FAILURE
        }
    }
}
