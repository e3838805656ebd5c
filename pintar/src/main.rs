use anyhow::Context;
use pintar::{AppState, config::Config, open_store, routes::create_router};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let address = config.server_address();
    info!(store = %config.store, "starting Dokumen Pintar");

    let store = match open_store(&config).await {
        Ok(store) => store,
        Err(err) => {
            // The API still serves `/` and `/test` without a database.
            error!(%err, "failed to open store; running without a database");
            None
        }
    };

    let state = AppState::new(store, config);
    let app = create_router(state.clone());

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if state.shutdown().await? {
        info!("store shut down");
    }
    info!("server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(%err, "failed to listen for ctrl-c");
    }
}
