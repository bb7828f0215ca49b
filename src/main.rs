mod auth;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod routes;

use std::net::SocketAddr;

use crate::config::AppConfig;

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: db::Store,
    pub config: AppConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let port = config.port;

    let store = db::connect(&config.mongodb_uri, &config.db_name).await?;

    // Probe the store off the startup path; serving does not wait on it.
    let probe = store.clone();
    tokio::spawn(async move {
        match probe.ping().await {
            Ok(()) => tracing::info!("document store reachable"),
            Err(e) => tracing::error!("document store ping failed: {}", e),
        }
    });

    let state = AppState { store, config };
    let router = routes::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("garage-api listening on {}", addr);
    axum::serve(listener, router).await?;

    Ok(())
}
