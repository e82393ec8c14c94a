use common::api::SiteStatus;
use tracing::info;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    dispatch,
    error::{ApiResult, AppError},
    persistence::{sites as site_store, NewSite, SitePresentationUpdate, SiteRecord},
    secrets, telemetry,
};

pub struct RegistrationRequest {
    pub name: String,
    pub url: String,
}

pub struct SiteUpdate {
    pub name: Option<String>,
    pub url: Option<String>,
    pub maintenance_title: Option<String>,
    pub maintenance_logo_url: Option<String>,
    pub maintenance_text: Option<String>,
}

fn validate_name(state: &AppState, name: &str) -> ApiResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request("site name cannot be empty"));
    }
    if trimmed.len() > state.limits.max_field_len {
        return Err(AppError::bad_request(format!(
            "site name exceeds {} characters",
            state.limits.max_field_len
        )));
    }
    Ok(())
}

fn validate_url(url: &str) -> ApiResult<()> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|err| AppError::bad_request(format!("invalid site url: {err}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AppError::bad_request(format!(
            "unsupported site url scheme: {other}"
        ))),
    }
}

/// Register a site and mint its shared secret. The secret is generated here,
/// stored verbatim, and never changes for the lifetime of the record.
pub async fn register_site(state: &AppState, req: RegistrationRequest) -> ApiResult<SiteRecord> {
    validate_name(state, &req.name)?;
    validate_url(&req.url)?;

    let record = site_store::create_site(
        &state.db,
        NewSite {
            id: Uuid::new_v4(),
            name: req.name.trim().to_string(),
            site_url: req.url.trim().to_string(),
            secret: secrets::generate_secret(),
        },
    )
    .await?;

    telemetry::record_site_mutation("register");
    info!(site_id = %record.id, name = %record.name, "site registered");
    Ok(record)
}

pub async fn get_site(state: &AppState, id: Uuid) -> ApiResult<SiteRecord> {
    site_store::get_site(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("site not found"))
}

pub async fn list_sites(
    state: &AppState,
    limit: u32,
    offset: u32,
) -> ApiResult<(Vec<SiteRecord>, i64)> {
    Ok(site_store::list_sites(&state.db, limit, offset).await?)
}

pub async fn update_site(state: &AppState, id: Uuid, update: SiteUpdate) -> ApiResult<SiteRecord> {
    if let Some(name) = &update.name {
        validate_name(state, name)?;
    }
    if let Some(url) = &update.url {
        validate_url(url)?;
    }

    let affected = site_store::update_site(
        &state.db,
        id,
        SitePresentationUpdate {
            name: update.name.map(|n| n.trim().to_string()),
            site_url: update.url.map(|u| u.trim().to_string()),
            maintenance_title: update.maintenance_title,
            maintenance_logo_url: update.maintenance_logo_url,
            maintenance_text: update.maintenance_text,
        },
    )
    .await?;

    if affected == 0 {
        return Err(AppError::not_found("site not found"));
    }

    get_site(state, id).await
}

pub async fn delete_site(state: &AppState, id: Uuid) -> ApiResult<()> {
    let affected = site_store::delete_site(&state.db, id).await?;
    if affected == 0 {
        return Err(AppError::not_found("site not found"));
    }
    telemetry::record_site_mutation("deregister");
    info!(site_id = %id, "site deregistered");
    Ok(())
}

/// Push a status change to the site and, only on a confirmed acknowledgment,
/// record it in the registry. A failed or unconfirmed call leaves the record
/// at its last confirmed status and surfaces the reason to the operator.
pub async fn set_status(state: &AppState, id: Uuid, new_status: SiteStatus) -> ApiResult<SiteRecord> {
    let site = get_site(state, id).await?;

    match dispatch::push_status(&state.http, &site, new_status, state.dispatch_timeout).await {
        Ok(ack) => {
            telemetry::record_dispatch_result("success");
            site_store::update_site_status(&state.db, id, to_db_status(new_status)).await?;
            info!(site_id = %id, status = new_status.as_str(), message = %ack.message, "site status confirmed");
            get_site(state, id).await
        }
        Err(err) => {
            telemetry::record_dispatch_result(match err {
                dispatch::DispatchError::Network(_) => "network_error",
                dispatch::DispatchError::RemoteRejected { .. } => "remote_rejected",
            });
            Err(AppError::bad_gateway(format!(
                "could not update status for \"{}\": {err}",
                site.name
            )))
        }
    }
}

pub fn to_db_status(status: SiteStatus) -> crate::persistence::SiteStatus {
    match status {
        SiteStatus::Active => crate::persistence::SiteStatus::Active,
        SiteStatus::Maintenance => crate::persistence::SiteStatus::Maintenance,
    }
}

pub fn to_api_status(status: crate::persistence::SiteStatus) -> SiteStatus {
    match status {
        crate::persistence::SiteStatus::Active => SiteStatus::Active,
        crate::persistence::SiteStatus::Maintenance => SiteStatus::Maintenance,
    }
}
