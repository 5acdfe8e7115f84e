//! cmk-discord CLI
//!
//! Checkmk calls the plugin without arguments and passes everything through
//! `NOTIFY_*` environment variables; the flags below only tune the process.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use cmk_discord::io::ReqwestHttpClient;
use cmk_discord::lossy_vars;
use tracing::Level;

#[derive(Parser)]
#[command(name = "cmk-discord")]
#[command(about = "Checkmk notification plugin that posts alerts to a Discord webhook")]
#[command(version)]
struct Args {
    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: Level,

    /// Give up on the webhook request after this many seconds
    #[arg(long, default_value_t = 10)]
    timeout_seconds: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        "Parsed command line arguments: log_level={:?}, timeout_seconds={}",
        args.log_level,
        args.timeout_seconds
    );

    let result = match ReqwestHttpClient::with_timeout(Duration::from_secs(args.timeout_seconds)) {
        Ok(http) => cmk_discord::run(lossy_vars(std::env::vars_os()), Arc::new(http)).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
