use std::path::PathBuf;

use chrono::NaiveDate;

use crate::AggregationPolicy;

pub const DEFAULT_DB_HOST: &str = "127.0.0.1";
pub const DEFAULT_DB_PORT: u16 = 3306;
pub const DEFAULT_TABLE_PREFIX: &str = "ps_";
pub const DEFAULT_SHOP_ID: u32 = 4;
pub const DEFAULT_MIN_PRODUCTS: u32 = 0;
pub const DEFAULT_OUT_DIR: &str = "./docs";

/// Connection parameters for the shop database.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Table name prefix, validated to `[A-Za-z0-9_]*`.
    pub table_prefix: String,
}

impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[redacted]")
            .field("database", &self.database)
            .field("table_prefix", &self.table_prefix)
            .finish()
    }
}

/// Fully resolved configuration for one report invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub db: DbConfig,
    pub shop_id: u32,
    /// Inclusive start of the window.
    pub since: NaiveDate,
    /// Exclusive end of the window.
    pub until: NaiveDate,
    pub min_products: u32,
    pub policy: AggregationPolicy,
    pub out_dir: PathBuf,
}

/// The parameters bound into the aggregation query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportQuery {
    pub shop_id: u32,
    pub since: NaiveDate,
    pub until: NaiveDate,
    pub min_products: u32,
    pub policy: AggregationPolicy,
}

impl ReportConfig {
    #[must_use]
    pub fn query(&self) -> ReportQuery {
        ReportQuery {
            shop_id: self.shop_id,
            since: self.since,
            until: self.until,
            min_products: self.min_products,
            policy: self.policy,
        }
    }
}
