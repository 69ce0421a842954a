//! Database, driver and crawl descriptors.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::UNKNOWN;

/// What the backend says about itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseInfo {
    /// Database product name.
    pub product_name: String,
    /// Database product version.
    pub product_version: String,
    /// User the metadata was retrieved as.
    pub user_name: Option<String>,
}

impl Default for DatabaseInfo {
    fn default() -> Self {
        Self {
            product_name: UNKNOWN.to_string(),
            product_version: UNKNOWN.to_string(),
            user_name: None,
        }
    }
}

/// What the driver says about itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverInfo {
    /// Driver name.
    pub driver_name: String,
    /// Driver version.
    pub driver_version: String,
    /// Connection URL, with credentials already stripped by the adapter.
    pub connection_url: Option<String>,
}

impl Default for DriverInfo {
    fn default() -> Self {
        Self {
            driver_name: UNKNOWN.to_string(),
            driver_version: UNKNOWN.to_string(),
            connection_url: None,
        }
    }
}

/// One crawl run: when it happened, what produced it, what it looked at.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlInfo {
    /// Unique id of this run.
    pub run_id: Uuid,
    /// When the crawl started.
    pub crawled_at: DateTime<Utc>,
    /// Name of this crate.
    pub crawler_name: String,
    /// Version of this crate.
    pub crawler_version: String,
    /// Database product and version, space-joined.
    pub database_version: String,
    /// Driver name and version, space-joined.
    pub driver_version: String,
}

impl CrawlInfo {
    /// Stamp a new run against the given database and driver descriptors.
    pub fn new(database: &DatabaseInfo, driver: &DriverInfo) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            crawled_at: Utc::now(),
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            database_version: format!("{} {}", database.product_name, database.product_version),
            driver_version: format!("{} {}", driver.driver_name, driver.driver_version),
        }
    }
}

impl Default for CrawlInfo {
    fn default() -> Self {
        Self::new(&DatabaseInfo::default(), &DriverInfo::default())
    }
}
