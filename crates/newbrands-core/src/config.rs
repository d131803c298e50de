use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};

use crate::report_config::{
    DEFAULT_DB_HOST, DEFAULT_DB_PORT, DEFAULT_MIN_PRODUCTS, DEFAULT_OUT_DIR, DEFAULT_SHOP_ID,
    DEFAULT_TABLE_PREFIX,
};
use crate::{AggregationPolicy, ConfigError, DbConfig, ReportConfig};

pub const DEFAULT_ENV_FILE: &str = ".env";

/// Required connection variables, in the order they are reported when missing.
const REQUIRED_DB_VARS: [&str; 3] = ["DB_USER", "DB_PASS", "DB_NAME"];

/// Values supplied on the command line. Each one, when present, wins over the
/// corresponding environment variable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOverrides {
    pub shop_id: Option<u32>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub min_products: Option<u32>,
    pub policy: Option<AggregationPolicy>,
    pub out_dir: Option<PathBuf>,
}

/// Load variables from an env file into the process environment.
///
/// Variables already set in the process are left untouched. A missing file is
/// not an error; returns `false` in that case.
///
/// # Errors
///
/// Returns [`ConfigError::EnvFile`] if the file exists but cannot be read or parsed.
pub fn load_env_file(path: &Path) -> Result<bool, ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(source) => Err(ConfigError::EnvFile {
            path: path.display().to_string(),
            source,
        }),
    }
}

/// Resolve the report configuration from the process environment and CLI overrides.
///
/// `today` anchors the default window (Jan 1 of its year up to Jan 1 of the next).
///
/// # Errors
///
/// Returns `ConfigError` if required connection variables are missing or any
/// value is invalid.
pub fn load_report_config(
    overrides: &ReportOverrides,
    today: NaiveDate,
) -> Result<ReportConfig, ConfigError> {
    build_report_config(|key| std::env::var(key), overrides, today)
}

/// Build the report configuration using the provided env-var lookup function.
///
/// Empty values are treated the same as unset ones. All missing required
/// connection variables are reported together.
///
/// # Errors
///
/// Returns `ConfigError` if required connection variables are missing or any
/// value is invalid.
pub fn build_report_config<F>(
    lookup: F,
    overrides: &ReportOverrides,
    today: NaiveDate,
) -> Result<ReportConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let get = |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.is_empty()) };

    let or_default = |var: &str, default: &str| -> String {
        get(var).unwrap_or_else(|| default.to_string())
    };

    let missing: Vec<String> = REQUIRED_DB_VARS
        .iter()
        .filter(|var| get(**var).is_none())
        .map(|var| (*var).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::MissingEnvVars(missing));
    }

    let port = match get("DB_PORT") {
        Some(raw) => parse_number::<u16>("DB_PORT", &raw)?,
        None => DEFAULT_DB_PORT,
    };

    let table_prefix = or_default("DB_PREFIX", DEFAULT_TABLE_PREFIX);
    if !table_prefix
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ConfigError::InvalidTablePrefix(table_prefix));
    }

    let db = DbConfig {
        host: or_default("DB_HOST", DEFAULT_DB_HOST),
        port,
        user: get("DB_USER").unwrap_or_default(),
        password: get("DB_PASS").unwrap_or_default(),
        database: get("DB_NAME").unwrap_or_default(),
        table_prefix,
    };

    let shop_id = match (overrides.shop_id, get("SHOP_ID")) {
        (Some(id), _) => id,
        (None, Some(raw)) => parse_number::<u32>("SHOP_ID", &raw)?,
        (None, None) => DEFAULT_SHOP_ID,
    };

    let min_products = match (overrides.min_products, get("MIN_PRODUCTS")) {
        (Some(n), _) => n,
        (None, Some(raw)) => parse_number::<u32>("MIN_PRODUCTS", &raw)?,
        (None, None) => DEFAULT_MIN_PRODUCTS,
    };

    let policy = match (overrides.policy, get("REPORT_POLICY")) {
        (Some(policy), _) => policy,
        (None, Some(raw)) => raw.parse::<AggregationPolicy>()?,
        (None, None) => AggregationPolicy::default(),
    };

    let since = match overrides.since.as_deref() {
        Some(raw) => parse_date("--since", raw)?,
        None => january_first(today.year(), "--since")?,
    };
    let until = match overrides.until.as_deref() {
        Some(raw) => parse_date("--until", raw)?,
        None => january_first(today.year() + 1, "--until")?,
    };
    if since >= until {
        return Err(ConfigError::EmptyDateRange {
            since: since.to_string(),
            until: until.to_string(),
        });
    }

    let out_dir = overrides
        .out_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));

    Ok(ReportConfig {
        db,
        shop_id,
        since,
        until,
        min_products,
        policy,
        out_dir,
    })
}

fn parse_number<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

fn parse_date(flag: &str, raw: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ConfigError::InvalidDate {
        flag: flag.to_string(),
        value: raw.to_string(),
    })
}

fn january_first(year: i32, flag: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| ConfigError::InvalidDate {
        flag: flag.to_string(),
        value: format!("{year}-01-01"),
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
