//! chat-cli entry point
//!
//! Run with:
//! ```bash
//! cargo run -p chat-cli -- gateway -t <token>
//! ```
//!
//! The token may also come from `DG_TOKEN`; other settings are read from
//! `DG_*` environment variables or a `.env` file.

use std::process::ExitCode;
use std::sync::Arc;

use chat_cli::{run, Backend, Cli};
use chat_common::try_init_tracing_with_config;
use chat_service::Console;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Load .env before tracing so RUST_LOG from the file applies
    let _ = dotenvy::dotenv();

    if let Err(e) = try_init_tracing_with_config(cli.tracing_config()) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Interrupt received");
                    // Hold-open actions close on the token; the rest are abandoned
                    shutdown.cancel();
                }
                Err(e) => warn!(error = %e, "Failed to listen for ctrl-c"),
            }
        });
    }

    let code = run(
        &cli,
        |key| std::env::var(key).ok(),
        Backend::connect,
        Arc::new(Console::stdio()),
        shutdown,
    )
    .await;

    ExitCode::from(code)
}
