use std::time::Duration;

use common::api::{SiteStatus, StatusUpdateRequest, StatusUpdateResponse, UPDATE_STATUS_PATH};
use reqwest::{header::CONTENT_TYPE, StatusCode};
use thiserror::Error;
use tracing::warn;

use crate::persistence::SiteRecord;

/// Max characters of a remote error body echoed back to the operator.
const MAX_ECHOED_BODY_CHARS: usize = 300;

/// Confirmed acknowledgment from a site agent.
#[derive(Debug)]
pub struct Ack {
    pub status: SiteStatus,
    pub message: String,
}

/// Failure classes for a status push. The registry is never mutated on any of
/// these; the caller reports the reason to the operator and leaves the record
/// at its last confirmed status.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Transport-level failure: DNS, connection refused, timeout.
    #[error("connection error: {0}")]
    Network(#[source] reqwest::Error),
    /// The site answered with something other than an affirmative 200.
    #[error("client site responded with HTTP code {status}. response body: {body}")]
    RemoteRejected { status: u16, body: String },
}

/// Derive the webhook endpoint from a site's base URL.
pub fn webhook_url(site_url: &str) -> String {
    format!("{}{}", site_url.trim_end_matches('/'), UPDATE_STATUS_PATH)
}

fn truncate_body(body: &str) -> String {
    body.chars().take(MAX_ECHOED_BODY_CHARS).collect()
}

fn build_payload(site: &SiteRecord, new_status: SiteStatus) -> StatusUpdateRequest {
    // Presentation fields ride along only when entering maintenance; on
    // activation the agent erases its local copy regardless.
    let maintenance = matches!(new_status, SiteStatus::Maintenance);
    StatusUpdateRequest {
        key: site.secret.clone(),
        status: new_status.as_str().to_string(),
        maintenance_title: maintenance.then(|| site.maintenance_title.clone()),
        maintenance_logo_url: maintenance.then(|| site.maintenance_logo_url.clone()),
        maintenance_text: maintenance.then(|| site.maintenance_text.clone()),
    }
}

/// Push a status change to a site agent.
///
/// Exactly one attempt, bounded by `timeout`. Success requires an HTTP 200
/// with an affirmative body; everything else is a [`DispatchError`]. This
/// function only sends; the caller commits the registry after `Ok`.
pub async fn push_status(
    client: &reqwest::Client,
    site: &SiteRecord,
    new_status: SiteStatus,
    timeout: Duration,
) -> Result<Ack, DispatchError> {
    let url = webhook_url(&site.site_url);
    let payload = build_payload(site, new_status);

    let res = client
        .post(&url)
        .header(CONTENT_TYPE, "application/json; charset=utf-8")
        .timeout(timeout)
        .json(&payload)
        .send()
        .await
        .map_err(|err| {
            warn!(site_id = %site.id, %url, error = %err, "status push failed to reach site");
            DispatchError::Network(err)
        })?;

    let status = res.status();
    let body = res.text().await.unwrap_or_default();

    if status != StatusCode::OK {
        warn!(site_id = %site.id, %status, "status push rejected by site");
        return Err(DispatchError::RemoteRejected {
            status: status.as_u16(),
            body: truncate_body(&body),
        });
    }

    match serde_json::from_str::<StatusUpdateResponse>(&body) {
        Ok(ack) if ack.success => Ok(Ack {
            status: new_status,
            message: ack.message,
        }),
        _ => {
            warn!(site_id = %site.id, "status push returned 200 without an affirmative body");
            Err(DispatchError::RemoteRejected {
                status: status.as_u16(),
                body: truncate_body(&body),
            })
        }
    }
}
