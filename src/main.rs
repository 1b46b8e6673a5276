//! vinylscan - barcode-driven vinyl inventory service
//!
//! Receives a scanned barcode, looks it up against the Discogs catalog,
//! keeps for-sale records in a Firebase Realtime Database, and mirrors
//! every write to a Google Sheets ledger.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use vinylscan::config::Config;
use vinylscan::services::{DiscogsClient, FirebaseStore, SheetsLedger};
use vinylscan::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "vinylscan", version, about = "Vinyl barcode inventory service")]
struct Args {
    /// Path to TOML configuration file
    #[arg(long, env = "VINYLSCAN_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address override, e.g. 0.0.0.0:5001
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting vinylscan v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    // One client handle per external collaborator, built once and
    // injected into the handlers
    let store = FirebaseStore::new(
        config.store_database_url.clone(),
        config.store_auth_token.clone(),
    )?;
    info!("✓ Inventory store client ready ({})", config.store_database_url);

    let catalog = match &config.catalog_base_url {
        Some(base_url) => DiscogsClient::with_base_url(base_url.clone(), config.discogs_token.clone())?,
        None => DiscogsClient::new(config.discogs_token.clone())?,
    };
    info!("✓ Catalog client ready");

    let ledger = SheetsLedger::new(
        config.spreadsheet_id.clone(),
        config.sheet_title.clone(),
        config.sheet_id,
        config.sheets_access_token.clone(),
    )?;
    info!(
        "✓ Ledger mirror client ready (spreadsheet {}, sheet {})",
        config.spreadsheet_id, config.sheet_title
    );

    let state = AppState::new(Arc::new(store), Arc::new(catalog), Arc::new(ledger));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!("vinylscan listening on http://{}", config.bind);
    info!("Health check: http://{}/health", config.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
