//! airportd - Airport catalog server daemon
//!
//! Serves the airport catalog over HTTP and stores uploaded airport images in
//! object storage.
//!
//! Usage:
//!   airportd [OPTIONS]
//!
//! Without a config file the server listens on port 8080 and writes to the
//! `airportima-bucket` GCS bucket using credentials from the environment.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use airport_api::{create_router, AppState};
use airport_core::{CatalogStore, MemoryObjectStore, ObjectStore};
use airport_gcs::GcsObjectStore;

mod config;

use config::{DaemonConfig, StorageBackend, StorageConfig};

#[derive(Parser, Debug)]
#[command(name = "airportd")]
#[command(about = "Airport catalog server with image uploads")]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, env = "AIRPORTD_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind (overrides config)
    #[arg(long, env = "AIRPORTD_BIND")]
    bind: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "AIRPORTD_PORT")]
    port: Option<u16>,

    /// Object store backend (overrides config)
    #[arg(long, value_enum)]
    storage: Option<StorageBackend>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn apply(&self, config: &mut DaemonConfig) {
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(storage) = self.storage {
            config.storage.backend = storage;
        }
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "airportd=info,airport_api=info,airport_core=info,airport_gcs=info,tower_http=info".into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_tracing(args.log_json);

    tracing::info!("Starting airportd");

    let mut config = if let Some(ref path) = args.config {
        tracing::info!("Loading config from: {}", path.display());
        DaemonConfig::load(path)?
    } else {
        tracing::info!("No config file provided, using defaults");
        DaemonConfig::default()
    };
    args.apply(&mut config);

    let catalog = Arc::new(CatalogStore::new(config.seed()));
    tracing::info!(airports = catalog.len(), "Catalog loaded");

    let object_store = create_object_store(&config.storage)?;
    tracing::info!(
        backend = object_store.kind(),
        bucket = %config.storage.bucket,
        "Object store ready"
    );

    let state = AppState::new(catalog, object_store, config.upload_settings());
    let app = create_router(state);

    let ip: IpAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", config.server.bind))?;
    let addr = SocketAddr::new(ip, config.server.port);
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Build the configured object store backend
fn create_object_store(storage: &StorageConfig) -> anyhow::Result<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match storage.backend {
        StorageBackend::Gcs => {
            let gcs = GcsObjectStore::new(storage.gcs_config())
                .map_err(|e| anyhow::anyhow!("Failed to create GCS client: {}", e))?;
            Arc::new(gcs)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory object store; uploaded images are not persisted");
            Arc::new(MemoryObjectStore::new(storage.public_host.clone()))
        }
    };
    Ok(store)
}

/// Resolve on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
