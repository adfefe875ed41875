//! Media listing service.
//!
//! Main entry point. Loads the `POSTGRES_*` connection parameters and
//! serves the paginated listing endpoint. No pool is created: every
//! request opens its own connection, so startup does not touch the
//! database at all.

use anyhow::{Context, Result};
use gptdex_media::Config;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("Starting gptdex media listing service");

    let config = Config::load()?;
    info!(
        db_host = %config.database.host,
        db_port = config.database.port,
        db_name = %config.database.database,
        "Configuration loaded"
    );

    let addr = config.parse_server_addr()?;
    info!(addr = %addr, "Media service is ready to serve requests");

    gptdex_media::start_server(config.connect_options(), addr)
        .await
        .context("HTTP server failed")?;

    info!("Media service shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,gptdex_media=debug,tower_http=debug"))
        .expect("Invalid RUST_LOG environment variable");

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
