/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! FIXP order client.
//!
//! Connects to the trading WebSocket, negotiates and establishes a FIXP
//! session, submits one order and shuts down after its execution report.
//!
//! Run with:
//! ```bash
//! cargo run -p fixp-client -- --user-name <USER> --password <PASSWORD> --account-id <ACCOUNT>
//! ```

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Args;
use fixp_engine::{EngineBuilder, LoggingApplication};
use tracing::info;

/// Initialize logging; `RUST_LOG` refines the INFO default.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let config = args
        .session_config()
        .context("invalid session configuration")?;
    info!(
        url = %args.url,
        account = %config.account(),
        heartbeat_secs = config.heartbeat_interval.as_secs(),
        "Starting FIXP client"
    );

    let initiator = EngineBuilder::new()
        .with_application(LoggingApplication)
        .with_session(config)
        .with_url(args.url.clone())
        .with_connect_timeout(args.connect_timeout())
        .build()
        .context("invalid engine configuration")?;

    let session_id = initiator
        .run()
        .await
        .with_context(|| format!("failed to run session against {}", args.url))?;

    info!(%session_id, "Client finished");
    Ok(())
}
