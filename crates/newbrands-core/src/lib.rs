pub mod config;
pub mod output;
pub mod policy;
pub mod report;
pub mod report_config;

use std::path::PathBuf;

use thiserror::Error;

pub use config::{
    build_report_config, load_env_file, load_report_config, ReportOverrides, DEFAULT_ENV_FILE,
};
pub use output::{ensure_index_page, write_csv, write_json, write_report, ReportPaths};
pub use policy::AggregationPolicy;
pub use report::{BrandReportRow, ReportItem, ReportMeta, ReportPayload};
pub use report_config::{DbConfig, ReportConfig, ReportQuery};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {} (see .env.example)", .0.join(", "))]
    MissingEnvVars(Vec<String>),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("invalid date for {flag}: \"{value}\" (expected YYYY-MM-DD)")]
    InvalidDate { flag: String, value: String },

    #[error("empty date range: since {since} is not before until {until}")]
    EmptyDateRange { since: String, until: String },

    #[error("invalid table prefix \"{0}\": only ASCII letters, digits and '_' are allowed")]
    InvalidTablePrefix(String),

    #[error("unknown aggregation policy \"{0}\" (expected \"unscoped\" or \"shop-scoped\")")]
    UnknownPolicy(String),

    #[error("failed to load env file {path}: {source}")]
    EnvFile {
        path: String,
        #[source]
        source: dotenvy::Error,
    },
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize JSON for {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
