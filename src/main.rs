use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use notes_api::app::{app, serve, AppState};
use notes_api::auth::{credentials, JwtVerifier};
use notes_api::{config, database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("notes_api=info,tower_http=info")),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting Notes API in {:?} mode", config.environment);

    let (credentials, _) = credentials::resolve(&config.identity.sources())
        .context("failed to load identity credentials")?;
    let verifier = JwtVerifier::from_credentials(&credentials)
        .await
        .context("failed to initialise identity verifier")?;

    let store = database::connect(&config.database)
        .await
        .context("failed to open note store")?;

    let state = AppState::new(store.clone(), Arc::new(verifier));
    let router = app(state, &config.security.cors_origins);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Notes API listening on http://{}", bind_addr);

    let result = serve(listener, router).await;

    store.close().await;
    tracing::info!("Notes API stopped");

    result.context("server error")
}
