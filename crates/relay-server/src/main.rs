mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use relay_api::cors::cors_layer;
use relay_api::registry::MemoryRecipientStore;
use relay_api::state::{AppState, AppStateInner};
use relay_push::LineClient;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "line_relay=debug,relay_api=debug,relay_push=debug,tower_http=debug".into()
            }),
        )
        .init();

    // Config; a missing token stops the process here, before anything binds
    let config = Config::from_env()?;

    let line = LineClient::with_endpoint(config.access_token, config.push_url)?;
    let cors = cors_layer(&config.cors_origins)?;

    let state: AppState = Arc::new(AppStateInner {
        recipients: Arc::new(MemoryRecipientStore::new()),
        line,
        mode: config.mode,
        fixed_recipient: config.fixed_recipient,
        ack_text: config.ack_text,
    });

    info!(
        "Dispatch mode: {}, push endpoint: {}, CORS origins: {:?}",
        state.mode,
        state.line.endpoint(),
        config.cors_origins
    );
    if state.ack_text.is_none() {
        info!("Webhook acknowledgements disabled");
    }

    let app = relay_api::router(state, cors);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("LINE relay listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    tracing::warn!("SIGTERM handler unavailable: {}", e);
                    ctrl_c.await.ok();
                    info!("Received Ctrl+C, shutting down...");
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
