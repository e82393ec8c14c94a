use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use common::api::{self, ErrorResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    auth::require_operator_auth,
    error::{ApiResult, AppError},
    persistence::SiteRecord,
    services::sites as site_service,
};

type SiteSummary = api::SiteSummary;
type SiteSummaryPage = api::SiteSummaryPage;
type SiteCreateRequest = api::SiteCreateRequest;
type SiteCreateResponse = api::SiteCreateResponse;
type SiteUpdateRequest = api::SiteUpdateRequest;
type SetStatusRequest = api::SetStatusRequest;

const DEFAULT_PAGE_LIMIT: u32 = 50;
const MAX_PAGE_LIMIT: u32 = 100;

pub fn build_router(state: AppState) -> Router<AppState> {
    let operator_routes = Router::<AppState>::new()
        .route("/api/v1/sites", post(register_site).get(list_sites))
        .route(
            "/api/v1/sites/{site_id}",
            get(site_detail).put(update_site).delete(delete_site),
        )
        .route("/api/v1/sites/{site_id}/status", post(set_status))
        .route_layer(middleware::from_fn_with_state(
            state,
            require_operator_auth,
        ));

    Router::<AppState>::new()
        .route("/health", get(healthz))
        .route("/metrics", get(metrics))
        .merge(operator_routes)
}

#[derive(Debug, Deserialize, utoipa::IntoParams, utoipa::ToSchema)]
#[into_params(parameter_in = Query)]
pub(crate) struct ListParams {
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    offset: Option<u32>,
}

pub fn parse_limit_offset(
    limit: Option<u32>,
    offset: Option<u32>,
) -> std::result::Result<(u32, u32), AppError> {
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    if limit == 0 || limit > MAX_PAGE_LIMIT {
        return Err(AppError::bad_request(format!(
            "limit must be between 1 and {}",
            MAX_PAGE_LIMIT
        )));
    }
    let offset = offset.unwrap_or(0);
    Ok((limit, offset))
}

fn to_site_summary(record: SiteRecord) -> SiteSummary {
    SiteSummary {
        site_id: record.id,
        name: record.name,
        url: record.site_url,
        status: site_service::to_api_status(record.status),
        maintenance: api::MaintenancePresentation {
            title: record.maintenance_title,
            logo_url: record.maintenance_logo_url,
            text: record.maintenance_text,
        },
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

/// Health response including version metadata.
#[derive(serde::Serialize, utoipa::ToSchema)]
pub(crate) struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Health check", body = HealthResponse)),
    tag = "system"
)]
pub(crate) async fn healthz() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
    })
}

#[utoipa::path(
    get,
    path = "/metrics",
    responses((status = 200, description = "Prometheus metrics", content_type = "text/plain")),
    tag = "system"
)]
pub(crate) async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
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

#[utoipa::path(
    post,
    path = "/api/v1/sites",
    request_body = SiteCreateRequest,
    responses(
        (status = 201, description = "Site registered; the secret is returned only here", body = SiteCreateResponse),
        (status = 400, description = "Invalid name or URL", body = ErrorResponse),
        (status = 401, description = "Missing operator token", body = ErrorResponse),
        (status = 403, description = "Invalid operator token", body = ErrorResponse)
    ),
    security(("operatorBearer" = [])),
    tag = "sites"
)]
pub(crate) async fn register_site(
    State(state): State<AppState>,
    Json(req): Json<SiteCreateRequest>,
) -> ApiResult<(StatusCode, Json<SiteCreateResponse>)> {
    let record = site_service::register_site(
        &state,
        site_service::RegistrationRequest {
            name: req.name,
            url: req.url,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SiteCreateResponse {
            site_id: record.id,
            secret: record.secret,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/sites",
    params(ListParams),
    responses((status = 200, description = "List sites", body = SiteSummaryPage)),
    security(("operatorBearer" = [])),
    tag = "sites"
)]
pub(crate) async fn list_sites(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<SiteSummaryPage>> {
    let (limit, offset) = parse_limit_offset(params.limit, params.offset)?;
    let (records, total) = site_service::list_sites(&state, limit, offset).await?;
    let items = records.into_iter().map(to_site_summary).collect();

    Ok(Json(SiteSummaryPage {
        limit,
        offset,
        total,
        items,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/sites/{site_id}",
    params(("site_id" = Uuid, Path, description = "Site identifier")),
    responses(
        (status = 200, description = "Site detail", body = SiteSummary),
        (status = 404, description = "Site not found", body = ErrorResponse)
    ),
    security(("operatorBearer" = [])),
    tag = "sites"
)]
pub(crate) async fn site_detail(
    State(state): State<AppState>,
    Path(site_id): Path<Uuid>,
) -> ApiResult<Json<SiteSummary>> {
    let record = site_service::get_site(&state, site_id).await?;
    Ok(Json(to_site_summary(record)))
}

#[utoipa::path(
    put,
    path = "/api/v1/sites/{site_id}",
    params(("site_id" = Uuid, Path, description = "Site identifier")),
    request_body = SiteUpdateRequest,
    responses(
        (status = 200, description = "Site updated", body = SiteSummary),
        (status = 404, description = "Site not found", body = ErrorResponse)
    ),
    security(("operatorBearer" = [])),
    tag = "sites"
)]
pub(crate) async fn update_site(
    State(state): State<AppState>,
    Path(site_id): Path<Uuid>,
    Json(req): Json<SiteUpdateRequest>,
) -> ApiResult<Json<SiteSummary>> {
    let record = site_service::update_site(
        &state,
        site_id,
        site_service::SiteUpdate {
            name: req.name,
            url: req.url,
            maintenance_title: req.maintenance_title,
            maintenance_logo_url: req.maintenance_logo_url,
            maintenance_text: req.maintenance_text,
        },
    )
    .await?;

    Ok(Json(to_site_summary(record)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/sites/{site_id}",
    params(("site_id" = Uuid, Path, description = "Site identifier")),
    responses(
        (status = 204, description = "Site deregistered"),
        (status = 404, description = "Site not found", body = ErrorResponse)
    ),
    security(("operatorBearer" = [])),
    tag = "sites"
)]
pub(crate) async fn delete_site(
    State(state): State<AppState>,
    Path(site_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    site_service::delete_site(&state, site_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/sites/{site_id}/status",
    params(("site_id" = Uuid, Path, description = "Site identifier")),
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Status confirmed by the site", body = SiteSummary),
        (status = 404, description = "Site not found", body = ErrorResponse),
        (
            status = 502,
            description = "The site could not be reached or rejected the push; the registry is unchanged",
            body = ErrorResponse,
            example = serde_json::json!({
                "error": "could not update status for \"Acme Storefront\": client site responded with HTTP code 500. response body: boom",
                "code": "dispatch_failed"
            })
        )
    ),
    security(("operatorBearer" = [])),
    tag = "sites"
)]
pub(crate) async fn set_status(
    State(state): State<AppState>,
    Path(site_id): Path<Uuid>,
    Json(req): Json<SetStatusRequest>,
) -> ApiResult<Json<SiteSummary>> {
    let record = site_service::set_status(&state, site_id, req.status).await?;
    Ok(Json(to_site_summary(record)))
}
