pub mod app_state;
pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod persistence;
pub mod secrets;
pub mod services;
pub mod telemetry;

pub type Result<T> = std::result::Result<T, anyhow::Error>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use std::{net::SocketAddr, time::Duration};

use axum::http::HeaderName;
use tracing::{error, info};

use crate::app_state::{AppState, OperatorAuth};

pub use telemetry::init_tracing;

/// Boot the controller: config, registry pool + migrations, router, serve.
pub async fn run() -> Result<()> {
    run_with_shutdown(shutdown_signal()).await
}

pub async fn run_with_shutdown<S>(shutdown: S) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let app_config = config::load()?;
    let metrics_handle = telemetry::init_metrics_recorder();

    let operator_tokens: Vec<String> = app_config
        .operator
        .tokens
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if operator_tokens.is_empty() {
        return Err(anyhow::anyhow!("FLEETGATE_CTRL_OPERATOR_TOKENS cannot be empty"));
    }
    let operator_header = app_config
        .operator
        .header_name
        .parse::<HeaderName>()
        .map_err(|err| anyhow::anyhow!("invalid operator header name: {}", err))?;

    let db_pool = persistence::migrations::init_pool(&app_config.database.url).await?;
    persistence::migrations::run_migrations(&db_pool).await?;
    info!(database = %app_config.database.url, "registry schema is up to date");

    let state = AppState {
        db: db_pool,
        http: reqwest::Client::new(),
        operator_auth: OperatorAuth {
            tokens: operator_tokens,
            header_name: operator_header,
        },
        dispatch_timeout: Duration::from_secs(app_config.dispatch.timeout_secs),
        limits: app_config.limits.clone(),
        metrics_handle,
    };

    let addr: SocketAddr = format!("{}:{}", app_config.server.host, app_config.server.port)
        .parse()
        .map_err(|err| anyhow::anyhow!("invalid listen address: {}", err))?;

    let app = http::build_router(state.clone()).with_state(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "controller listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => stream.recv().await,
            Err(err) => {
                error!(%err, "failed to install SIGTERM handler");
                None
            }
        };
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("received SIGTERM, shutting down");
        },
    }
}
