pub mod auth;
pub mod config;
pub mod error;
pub mod gate;
pub mod page;
pub mod receiver;
pub mod sanitize;
pub mod session;
pub mod state;
pub mod telemetry;

pub type Result<T> = std::result::Result<T, anyhow::Error>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{error, info};

use crate::state::{DynStatusStore, FileStatusStore};

pub use telemetry::init_tracing;

/// Shared agent state passed into handlers and the gate.
#[derive(Clone)]
pub struct AgentState {
    /// Shared secret issued by the controller.
    pub secret: String,
    /// Exact-match caller allow-list; empty means open.
    pub allowed_origins: Vec<String>,
    /// The sole authority for the gate's decision.
    pub store: DynStatusStore,
    pub sessions: session::SessionStore,
    /// Optional custom maintenance page template.
    pub maintenance_template: Option<PathBuf>,
    pub metrics_handle: PrometheusHandle,
}

impl AgentState {
    pub fn from_config(cfg: &config::AppConfig, metrics_handle: PrometheusHandle) -> Self {
        Self {
            secret: cfg.secret.clone(),
            allowed_origins: cfg.allowed_origin_list(),
            store: Arc::new(FileStatusStore::new(&cfg.state_path)),
            sessions: session::SessionStore::new(),
            maintenance_template: cfg.maintenance_template.clone().map(PathBuf::from),
            metrics_handle,
        }
    }
}

#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn healthz() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: VERSION,
    })
}

async fn metrics(State(state): State<AgentState>) -> impl IntoResponse {
    let body = state.metrics_handle.render();
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4",
        )],
        body,
    )
}

/// Assemble the agent router: the webhook receiver and ops endpoints stay
/// outside the gate; every site route passes through it.
pub fn build_router(state: AgentState, site: Router<AgentState>) -> Router {
    let gated_site = site.route_layer(middleware::from_fn_with_state(
        state.clone(),
        gate::maintenance_gate,
    ));

    Router::<AgentState>::new()
        .merge(receiver::router())
        .route("/health", get(healthz))
        .route("/metrics", get(metrics))
        .merge(gated_site)
        .with_state(state)
}

/// Default site content used by the standalone binary; embedders supply
/// their own router instead.
pub fn default_site_router() -> Router<AgentState> {
    Router::<AgentState>::new().route("/", get(homepage))
}

async fn homepage() -> impl IntoResponse {
    axum::response::Html("<h1>Welcome</h1>\n<p>This site is served by fleetgate-agent.</p>")
}

/// Boot the agent: config, state store, router, serve.
pub async fn run() -> Result<()> {
    run_with_shutdown(shutdown_signal()).await
}

pub async fn run_with_shutdown<S>(shutdown: S) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let cfg = config::load()?;
    let metrics_handle = telemetry::init_metrics_recorder();
    let state = AgentState::from_config(&cfg, metrics_handle);

    let addr: SocketAddr = format!("{}:{}", cfg.listen_host, cfg.listen_port)
        .parse()
        .map_err(|err| anyhow::anyhow!("invalid listen address: {}", err))?;

    let app = build_router(state, default_site_router());
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "site agent listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
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
