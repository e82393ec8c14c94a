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

pub fn record_dispatch_result(result: &str) {
    counter!(
        "controller_dispatch_total",
        "result" => result.to_string()
    )
    .increment(1);
}

pub fn record_site_mutation(action: &str) {
    counter!(
        "controller_site_mutations_total",
        "action" => action.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_counter_renders() {
        let handle = init_metrics_recorder();
        record_dispatch_result("success");
        record_site_mutation("register");

        let rendered = handle.render();
        assert!(
            rendered.contains("controller_dispatch_total"),
            "dispatch counter missing: {rendered}"
        );
        assert!(
            rendered.contains("controller_site_mutations_total"),
            "mutation counter missing: {rendered}"
        );
    }
}
