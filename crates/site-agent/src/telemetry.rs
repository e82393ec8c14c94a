use std::sync::OnceLock;

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json())
        .init();
}

pub fn init_metrics_recorder() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            PrometheusBuilder::new()
                .install_recorder()
                .expect("metrics recorder already installed")
        })
        .clone()
}

pub fn record_status_update(result: &str) {
    counter!(
        "site_agent_status_update_total",
        "result" => result.to_string()
    )
    .increment(1);
}

pub fn record_gate_decision(decision: &str) {
    counter!(
        "site_agent_gate_total",
        "decision" => decision.to_string()
    )
    .increment(1);
}
