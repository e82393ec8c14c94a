use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::Db;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum SiteStatus {
    Active,
    Maintenance,
}

#[derive(Debug, Clone, FromRow)]
pub struct SiteRecord {
    pub id: Uuid,
    pub name: String,
    pub site_url: String,
    pub secret: String,
    pub status: SiteStatus,
    pub maintenance_title: String,
    pub maintenance_logo_url: String,
    pub maintenance_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSite {
    pub id: Uuid,
    pub name: String,
    pub site_url: String,
    pub secret: String,
}

/// Mutable site fields; `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct SitePresentationUpdate {
    pub name: Option<String>,
    pub site_url: Option<String>,
    pub maintenance_title: Option<String>,
    pub maintenance_logo_url: Option<String>,
    pub maintenance_text: Option<String>,
}

const SELECT_COLUMNS: &str = r#"
    SELECT
        id,
        name,
        site_url,
        secret,
        status,
        maintenance_title,
        maintenance_logo_url,
        maintenance_text,
        created_at,
        updated_at
    FROM sites
"#;

pub async fn create_site(pool: &Db, new_site: NewSite) -> Result<SiteRecord> {
    sqlx::query(
        r#"
        INSERT INTO sites (id, name, site_url, secret, status)
        VALUES (?1, ?2, ?3, ?4, 'active')
        "#,
    )
    .bind(new_site.id)
    .bind(&new_site.name)
    .bind(&new_site.site_url)
    .bind(&new_site.secret)
    .execute(pool)
    .await?;

    get_site(pool, new_site.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("site insert did not return row"))
}

pub async fn get_site(pool: &Db, id: Uuid) -> Result<Option<SiteRecord>> {
    let record = sqlx::query_as::<_, SiteRecord>(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(record)
}

pub async fn list_sites(pool: &Db, limit: u32, offset: u32) -> Result<(Vec<SiteRecord>, i64)> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(id) FROM sites")
        .fetch_one(pool)
        .await?;

    let records = sqlx::query_as::<_, SiteRecord>(&format!(
        "{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok((records, total))
}

pub async fn update_site(pool: &Db, id: Uuid, update: SitePresentationUpdate) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE sites
        SET name = COALESCE(?2, name),
            site_url = COALESCE(?3, site_url),
            maintenance_title = COALESCE(?4, maintenance_title),
            maintenance_logo_url = COALESCE(?5, maintenance_logo_url),
            maintenance_text = COALESCE(?6, maintenance_text),
            updated_at = datetime('now')
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .bind(update.name)
    .bind(update.site_url)
    .bind(update.maintenance_title)
    .bind(update.maintenance_logo_url)
    .bind(update.maintenance_text)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Record a confirmed status. Callers must only invoke this after the site
/// agent acknowledged the push.
pub async fn update_site_status(pool: &Db, id: Uuid, status: SiteStatus) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE sites
        SET status = ?2, updated_at = datetime('now')
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .bind(status)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete_site(pool: &Db, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sites WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
