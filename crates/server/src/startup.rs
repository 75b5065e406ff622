use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::{init_logging, LogFormat};
use configs::AppConfig;
use dotenvy::dotenv;
use service::{
    runtime,
    services::{FileService, JsonFileService},
    storage::{ByteStore, FsByteStore},
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Wire both endpoint sets onto one filesystem byte store rooted at `storage.root`.
pub fn build_state(cfg: &AppConfig) -> AppState {
    let store: Arc<dyn ByteStore> = Arc::new(FsByteStore::new(&cfg.storage.root));
    AppState {
        files: FileService::new(Arc::clone(&store)),
        json: JsonFileService::new(store, cfg.storage.json_dir.clone()),
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received Ctrl+C, shutting down");
    }
}

/// Public entry: load config from `config.toml` or the environment, set up
/// logging and serve.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_or_env()?;
    init_logging(LogFormat::parse(&cfg.logging.format));
    run_with_config(cfg).await
}

/// Build the app for `cfg` and run the HTTP server until Ctrl+C.
/// Logging must already be initialized by the caller.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    runtime::ensure_env(&cfg.storage.root, &cfg.storage.json_dir).await?;

    let app: Router = routes::build_router(build_state(&cfg), build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, storage_root = %cfg.storage.root.display(), "starting file store server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
