use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use common::api::{MaintenancePresentation, SiteStatus};
use tracing::{info, warn};

use crate::{page, session, telemetry, AgentState};

/// Per-request maintenance gate wrapped around the normal site routes.
///
/// Decides purely on committed local state: active passes the request
/// through untouched; maintenance logs the caller out and short-circuits
/// with a 503 maintenance page before any normal content is generated. The
/// gate performs no remote calls and must never fail the serving loop.
pub async fn maintenance_gate(
    State(state): State<AgentState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let site_state = match state.store.load() {
        Ok(site_state) => site_state,
        Err(err) => {
            // An unreadable store is not evidence of maintenance mode.
            warn!(error = %err, "gate could not read local state; serving normally");
            return next.run(req).await;
        }
    };

    if site_state.status == SiteStatus::Active {
        telemetry::record_gate_decision("pass");
        return next.run(req).await;
    }

    // Terminate any authenticated session for this requester.
    let session_revoked = req
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(session::session_token_from_cookies)
        .map(|token| state.sessions.revoke(&token))
        .unwrap_or(false);
    if session_revoked {
        info!("logged requester out for maintenance mode");
    }

    telemetry::record_gate_decision("maintenance");
    let presentation = site_state.presentation.unwrap_or_default();
    maintenance_response(&state, &presentation)
}

fn maintenance_response(state: &AgentState, presentation: &MaintenancePresentation) -> Response {
    let (body, content_type) = match &state.maintenance_template {
        Some(path) => match page::render_template(path, presentation) {
            Ok(html) => (html, "text/html; charset=utf-8"),
            Err(err) => {
                // The richer renderer is unavailable; degrade to minimal text
                // rather than failing the request.
                warn!(template = %path.display(), error = %err, "maintenance template unavailable");
                (page::FALLBACK_TEXT.to_string(), "text/plain; charset=utf-8")
            }
        },
        None => (
            page::render_builtin(presentation),
            "text/html; charset=utf-8",
        ),
    };

    let mut response = Response::builder()
        .status(StatusCode::SERVICE_UNAVAILABLE)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap_or_else(|_| {
            let mut fallback = Response::new(Body::from(page::FALLBACK_TEXT));
            *fallback.status_mut() = StatusCode::SERVICE_UNAVAILABLE;
            fallback
        });

    if let Ok(cookie) = HeaderValue::from_str(&session::expired_session_cookie()) {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }

    response
}
