//! # idlookup-api: Binary Entry Point
//!
//! Loads `.env`, reads configuration, connects to both databases, and
//! serves the API until Ctrl-C or SIGTERM. Database connections are closed
//! after the server drains.

use idlookup_api::config::{AppConfig, LogFormat};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the environment may be set directly.
    let dotenv = dotenvy::dotenv();

    let config = AppConfig::from_env()?;
    init_tracing(&config);

    if let Err(e) = dotenv {
        tracing::debug!(error = %e, "no .env file loaded");
    }

    let ctx = idlookup_api::bootstrap::bootstrap(&config).await.map_err(|e| {
        tracing::error!("Bootstrap failed: {e}");
        e
    })?;

    let app = idlookup_api::app(ctx.clone());

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("idlookup API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    ctx.shutdown().await;
    Ok(())
}

/// `RUST_LOG` wins over `LOG_LEVEL`.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
