//! `toodo` entry point.

use clap::Parser;
use log::error;
use std::process::ExitCode;
use toodo_server::{serve, ServerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let config = ServerConfig::parse();

    if let Err(err) = toodo_core::init_logging(
        config.effective_log_level().as_str(),
        config.log_dir.as_deref(),
    ) {
        eprintln!("toodo: {err}");
        return ExitCode::FAILURE;
    }

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=server status=error error={err}");
            eprintln!("toodo: {err}");
            ExitCode::FAILURE
        }
    }
}
