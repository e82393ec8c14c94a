use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    routing::post,
    Json, Router,
};
use common::api::{
    ErrorResponse, MaintenancePresentation, SiteStatus, StatusUpdateRequest, StatusUpdateResponse,
    UPDATE_STATUS_PATH,
};
use tracing::{info, warn};

use crate::{
    auth,
    error::{ApiResult, AppError},
    sanitize,
    state::SiteState,
    telemetry, AgentState,
};

pub fn router() -> Router<AgentState> {
    Router::<AgentState>::new().route(UPDATE_STATUS_PATH, post(handle_update))
}

fn sanitize_presentation(req: &StatusUpdateRequest) -> MaintenancePresentation {
    // Unspecified fields store as empty strings.
    MaintenancePresentation {
        title: sanitize::plain_text(req.maintenance_title.as_deref().unwrap_or_default()),
        logo_url: sanitize::url(req.maintenance_logo_url.as_deref().unwrap_or_default()),
        text: sanitize::rich_text(req.maintenance_text.as_deref().unwrap_or_default()),
    }
}

/// Webhook receiver: authenticate the controller's push, validate it, and
/// commit the new local state.
///
/// Both auth stages are hard gates enforced in order and nothing is stored on
/// any failure path. The apply step is idempotent: the same payload twice
/// commits the same state twice.
#[utoipa::path(
    post,
    path = "/fleetgate/v1/update-status",
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status applied", body = StatusUpdateResponse),
        (status = 400, description = "Unrecognized status value", body = ErrorResponse),
        (status = 403, description = "Caller address not allowed or invalid key", body = ErrorResponse)
    ),
    tag = "webhook"
)]
pub(crate) async fn handle_update(
    State(state): State<AgentState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(req): Json<StatusUpdateRequest>,
) -> ApiResult<Json<StatusUpdateResponse>> {
    // Stage 1: origin allow-list (skipped when none is configured).
    let caller = peer.ip().to_string();
    if !auth::origin_allowed(&state.allowed_origins, &caller) {
        warn!(%caller, "status update rejected: caller address not allowed");
        telemetry::record_status_update("forbidden_origin");
        return Err(AppError::forbidden_origin());
    }

    // Stage 2: constant-time secret verification.
    if !auth::secret_matches(&state.secret, &req.key) {
        warn!(%caller, "status update rejected: invalid key");
        telemetry::record_status_update("invalid_key");
        return Err(AppError::invalid_key());
    }

    let Some(status) = SiteStatus::parse(&req.status) else {
        warn!(%caller, status = %req.status, "status update rejected: unrecognized status");
        telemetry::record_status_update("invalid_status");
        return Err(AppError::invalid_status(&req.status));
    };

    let new_state = match status {
        SiteStatus::Maintenance => SiteState::maintenance(sanitize_presentation(&req)),
        // Activation erases the presentation in the same commit.
        SiteStatus::Active => SiteState::active(),
    };

    if let Err(err) = state.store.store(&new_state) {
        warn!(%caller, error = %err, "failed to persist status update");
        telemetry::record_status_update("store_error");
        return Err(AppError::internal("failed to persist status"));
    }

    telemetry::record_status_update("applied");
    info!(%caller, status = status.as_str(), "site status updated");

    Ok(Json(StatusUpdateResponse {
        success: true,
        message: format!("Status updated to {}", status.as_str()),
    }))
}
