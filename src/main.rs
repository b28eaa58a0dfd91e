use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quire::{run, Cli, Config};
use quire_client::{BlogClient, HttpBlogApi};
use quire_storage::{init_database, RedbKeyValueStore};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(level)
        .init();

    // Load configuration
    let mut config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Optional: QUIRE_API_URL (default: http://localhost:5000/api)");
            eprintln!("Optional: QUIRE_DATA_PATH, QUIRE_TIMEOUT_SECS, QUIRE_REFETCH_ON_MISSING_AFTER_UPDATE");
            std::process::exit(1);
        }
    };
    if let Some(api_url) = cli.api_url.clone() {
        config.api_url = api_url;
    }
    if let Some(data) = cli.data.clone() {
        config.data_path = data;
    }

    tracing::debug!("API: {}", config.api_url);
    tracing::debug!("Data path: {}", config.data_path.display());

    // Open local storage
    let db = match init_database(&config.data_path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Storage error: {}", e);
            std::process::exit(1);
        }
    };
    let storage = Arc::new(RedbKeyValueStore::new(db));

    let api = match HttpBlogApi::with_timeout(&config.api_url, config.timeout) {
        Ok(api) => Arc::new(api),
        Err(e) => {
            eprintln!("HTTP client error: {}", e);
            std::process::exit(1);
        }
    };

    let client = BlogClient::new(api, storage, config.client);
    if let Err(e) = client.restore_session() {
        tracing::warn!("Could not restore session: {}", e);
    }

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = run(&client, cli.command, &mut stdout).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
