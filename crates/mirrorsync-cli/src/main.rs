use mirrorsync_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Log to the state dir when possible; a read-only home still gets stderr.
    if let Err(e) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable: {e:#}");
    }

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("mirrorsync error: {:#}", err);
        std::process::exit(1);
    }
}
