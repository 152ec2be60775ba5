use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arrshim_core::{
    load_config, reconcile, validate_config, AssociationStore, DownloadEngine, HttpEngineClient,
    SqliteAssociationStore,
};

use arrshim_server::{api::create_router, state::AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("arrshim {}", VERSION);

    // Determine config path
    let config_path = std::env::var("ARRSHIM_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Engine: {}", config.engine.url);
    info!("Database path: {:?}", config.database.path);

    let store: Arc<dyn AssociationStore> = Arc::new(
        SqliteAssociationStore::new(&config.database.path)
            .context("Failed to open association store")?,
    );
    info!("Association store initialized");

    let engine: Arc<dyn DownloadEngine> = Arc::new(
        HttpEngineClient::new(&config.engine).context("Failed to create engine client")?,
    );

    // Downloads with no association are filed here, so it must exist.
    let default_category = &config.categories.default_category;
    store
        .add_category(default_category, &config.engine.download_dir)
        .with_context(|| format!("Failed to create default category {}", default_category))?;

    if config.reconcile.on_startup {
        match reconcile(engine.as_ref(), store.as_ref(), default_category).await {
            Ok(report) => info!(
                "Startup reconciliation: {} engine downloads, {} imported, {} failed",
                report.remote_total,
                report.imported.len(),
                report.failed.len()
            ),
            Err(e) => warn!("Startup reconciliation skipped: {}", e),
        }
    } else {
        info!("Startup reconciliation disabled in config");
    }

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), store, engine));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
