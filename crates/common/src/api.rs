//! Shared API DTOs used across controller, site-agent, and CLI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

/// Fixed path suffix every site agent serves its webhook under.
pub const UPDATE_STATUS_PATH: &str = "/fleetgate/v1/update-status";

/// Operating mode of a managed site (wire format uses lowercase values).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    /// Serve normal content.
    Active,
    /// Serve the maintenance page.
    Maintenance,
}

impl SiteStatus {
    /// Returns the canonical lowercase representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteStatus::Active => "active",
            SiteStatus::Maintenance => "maintenance",
        }
    }

    /// Parses the canonical lowercase representation; anything else is rejected.
    pub fn parse(raw: &str) -> Option<SiteStatus> {
        match raw {
            "active" => Some(SiteStatus::Active),
            "maintenance" => Some(SiteStatus::Maintenance),
            _ => None,
        }
    }
}

/// Maintenance page copy pushed to a site when it enters maintenance.
///
/// Empty strings mean "unset"; the agent applies built-in defaults at render
/// time only, never in storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema)]
pub struct MaintenancePresentation {
    /// Page title (plain text).
    #[serde(default)]
    pub title: String,
    /// Logo image URL shown above the title.
    #[serde(default)]
    pub logo_url: String,
    /// Body copy (restricted rich text, rendered as paragraphs).
    #[serde(default)]
    pub text: String,
}

impl MaintenancePresentation {
    /// True when no field carries any copy.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.logo_url.is_empty() && self.text.is_empty()
    }
}

/// Webhook payload the controller posts to a site agent.
///
/// `status` stays a raw string so the receiver can reject unknown values with
/// a distinct error instead of a generic deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "key": "k9mQ3vTzR8wLpX2cJfY7hN4bS6dG1aU5eC0oI9nM2qW4rE7t",
    "status": "maintenance",
    "maintenance_title": "Scheduled Maintenance",
    "maintenance_logo_url": "https://example.com/logo.png",
    "maintenance_text": "We are back shortly."
}))]
pub struct StatusUpdateRequest {
    /// Shared site secret issued at registration. A missing key fails the
    /// secret check rather than deserialization.
    #[serde(default)]
    pub key: String,
    /// Target status ("active" or "maintenance").
    #[serde(default)]
    pub status: String,
    /// Maintenance page title; sent only when entering maintenance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_title: Option<String>,
    /// Maintenance page logo URL; sent only when entering maintenance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_logo_url: Option<String>,
    /// Maintenance page body text; sent only when entering maintenance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_text: Option<String>,
}

/// Acknowledgment returned by the site agent webhook.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdateResponse {
    /// Whether the status change was applied.
    pub success: bool,
    /// Human-readable confirmation ("Status updated to <status>").
    pub message: String,
}

/// Request body to register a new client site.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SiteCreateRequest {
    /// Display name for operators.
    #[schema(example = "Acme Storefront", min_length = 1, max_length = 255)]
    pub name: String,
    /// Base URL the webhook path is appended to.
    #[schema(example = "https://acme.example.com")]
    pub url: String,
}

/// Response returned when registering a site.
///
/// The secret is returned exactly once, at creation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SiteCreateResponse {
    /// Site identifier.
    pub site_id: Uuid,
    /// Shared authentication secret for the site's webhook.
    pub secret: String,
}

/// Request body to update site details.
///
/// `None` fields are left unchanged. The secret is immutable.
#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SiteUpdateRequest {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// New maintenance page title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_title: Option<String>,
    /// New maintenance page logo URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_logo_url: Option<String>,
    /// New maintenance page body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_text: Option<String>,
}

/// Request body to push a status change to a site.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SetStatusRequest {
    /// Target status for the site.
    pub status: SiteStatus,
}

/// Site view returned by the operator API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "site_id": "00000000-0000-0000-0000-00000000cafe",
    "name": "Acme Storefront",
    "url": "https://acme.example.com",
    "status": "active",
    "created_at": "2025-11-02T09:00:00Z",
    "updated_at": "2025-12-10T18:42:00Z"
}))]
pub struct SiteSummary {
    /// Site identifier.
    pub site_id: Uuid,
    /// Display name.
    pub name: String,
    /// Base URL of the managed site.
    pub url: String,
    /// Last confirmed status; updated only after an acknowledged push.
    pub status: SiteStatus,
    /// Maintenance copy draft held for the next maintenance push.
    #[serde(default, skip_serializing_if = "MaintenancePresentation::is_empty")]
    pub maintenance: MaintenancePresentation,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Paginated site list response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SiteSummaryPage {
    /// Requested page size.
    pub limit: u32,
    /// Requested offset.
    pub offset: u32,
    /// Total number of registered sites.
    pub total: i64,
    /// Sites on this page.
    pub items: Vec<SiteSummary>,
}

/// Structured error body returned by HTTP endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable reason.
    pub error: String,
    /// Stable machine-readable code.
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_status_round_trips_canonical_values() {
        assert_eq!(SiteStatus::parse("active"), Some(SiteStatus::Active));
        assert_eq!(
            SiteStatus::parse("maintenance"),
            Some(SiteStatus::Maintenance)
        );
        assert_eq!(SiteStatus::Maintenance.as_str(), "maintenance");
    }

    #[test]
    fn site_status_rejects_unknown_values() {
        assert_eq!(SiteStatus::parse("paused"), None);
        assert_eq!(SiteStatus::parse("Active"), None);
        assert_eq!(SiteStatus::parse(""), None);
    }

    #[test]
    fn status_update_request_omits_absent_maintenance_fields() {
        let req = StatusUpdateRequest {
            key: "k".into(),
            status: "active".into(),
            maintenance_title: None,
            maintenance_logo_url: None,
            maintenance_text: None,
        };
        let raw = serde_json::to_string(&req).expect("serialize");
        assert!(!raw.contains("maintenance_title"));
        assert!(!raw.contains("maintenance_logo_url"));
        assert!(!raw.contains("maintenance_text"));
    }

    #[test]
    fn maintenance_presentation_emptiness() {
        assert!(MaintenancePresentation::default().is_empty());
        let p = MaintenancePresentation {
            title: "Down".into(),
            ..Default::default()
        };
        assert!(!p.is_empty());
    }
}
