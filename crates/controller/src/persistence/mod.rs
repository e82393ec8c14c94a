use sqlx::SqlitePool;

pub mod migrations;
pub mod sites;

pub type Db = SqlitePool;

pub use sites::{NewSite, SitePresentationUpdate, SiteRecord, SiteStatus};
