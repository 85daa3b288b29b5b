//! Pubsub-shell binary entry point.

use std::process::ExitCode;
use std::sync::Arc;

use pubsub_shell::{cli, logging, shell, Config, MemoryConnector};
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("Error: {err}");
            eprintln!("Try 'pubsub-shell --help' for usage.");
            return ExitCode::FAILURE;
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }
    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    logging::init(config.log_filter());
    info!("pubsub-shell v{}", env!("CARGO_PKG_VERSION"));

    match shell::run(config, Arc::new(MemoryConnector)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
