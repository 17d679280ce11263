//! 0G Storage Gateway
//!
//! HTTP front-end for uploading files to and downloading files from 0G
//! decentralized storage.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zg_storage_gateway::config::{Backend, Config};
use zg_storage_gateway::storage::{
    ClientBinaryConfig, ClientBinaryProvider, MemoryProvider, StorageProvider,
};
use zg_storage_gateway::{routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env first so RUST_LOG can come from it
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zg_storage_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing::info!("Starting 0G Storage Gateway v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("RPC endpoint: {}", config.network.rpc_url);
    tracing::info!("Indexer endpoint: {}", config.network.indexer_rpc);
    tracing::info!("Flow contract: {}", config.network.flow_contract);

    let provider: Arc<dyn StorageProvider> = match config.client.backend {
        Backend::Client => {
            let private_key = config.require_private_key()?.clone();
            let provider = ClientBinaryProvider::new(ClientBinaryConfig {
                binary_path: config.client.binary_path.clone(),
                network: config.network.clone(),
                private_key,
            });
            if !provider.is_available().await {
                tracing::warn!(
                    "Storage client {} is not runnable; uploads and downloads will fail",
                    config.client.binary_path
                );
            }
            Arc::new(provider)
        }
        Backend::Memory => {
            tracing::warn!("Using in-memory storage backend; files are not sent to the network");
            Arc::new(MemoryProvider::new())
        }
    };

    for dir in [&config.server.upload_dir, &config.server.download_dir] {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid SERVER_HOST: {}", config.server.host))?;
    let addr = SocketAddr::new(host, config.server.port);

    let app = routes::router(AppState::new(config, provider));

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running on {}", addr);
    tracing::info!("API docs at http://{}/api-docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
///
/// A signal that cannot be installed is logged and never fires, so the
/// server keeps running on the other one.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Cannot listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal_name = tokio::select! {
        _ = ctrl_c => "Ctrl+C",
        _ = terminate => "SIGTERM",
    };
    tracing::info!(signal = signal_name, "Shutting down, draining in-flight transfers");
}
