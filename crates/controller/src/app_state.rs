use std::time::Duration;

use axum::http::HeaderName;
use metrics_exporter_prometheus::PrometheusHandle;
use subtle::ConstantTimeEq;

use crate::{config::LimitsConfig, persistence};

/// Shared application state passed into handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: persistence::Db,
    /// Outbound HTTP client used by the webhook dispatcher.
    pub http: reqwest::Client,
    pub operator_auth: OperatorAuth,
    /// Upper bound for a single status push round-trip.
    pub dispatch_timeout: Duration,
    pub limits: LimitsConfig,
    pub metrics_handle: PrometheusHandle,
}

/// Operator authentication configuration.
#[derive(Clone)]
pub struct OperatorAuth {
    pub tokens: Vec<String>,
    pub header_name: HeaderName,
}

impl OperatorAuth {
    pub fn is_operator_token(&self, candidate: &str) -> bool {
        self.tokens.iter().any(|token| {
            if token.len() != candidate.len() {
                return false;
            }
            token.as_bytes().ct_eq(candidate.as_bytes()).into()
        })
    }
}

#[allow(dead_code)]
fn _assert_app_state_bounds() {
    fn assert_bounds<T: Clone + Send + Sync + 'static>() {}
    assert_bounds::<AppState>();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_auth_checks_exact_tokens() {
        let auth = OperatorAuth {
            tokens: vec!["secret-token".to_string()],
            header_name: HeaderName::from_static("authorization"),
        };

        assert!(auth.is_operator_token("secret-token"));
        assert!(!auth.is_operator_token("secret-token-2"));
        assert!(!auth.is_operator_token("SECRET-TOKEN"));
        assert!(!auth.is_operator_token(""));
    }
}
