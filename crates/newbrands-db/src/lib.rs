use std::time::Instant;

use newbrands_core::{BrandReportRow, DbConfig, ReportQuery};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection};
use thiserror::Error;

pub mod new_brands;

pub use new_brands::{fetch_new_brands, render_new_brands_sql, NewBrandRow};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to connect to {host}:{port}/{database}: {source}")]
    Connect {
        host: String,
        port: u16,
        database: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("new-brands query failed: {0}")]
    Query(#[source] sqlx::Error),
    #[error("failed to close database connection: {0}")]
    Close(#[source] sqlx::Error),
}

/// Build connect options for the shop database.
#[must_use]
pub fn connect_options(config: &DbConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.database)
        .charset("utf8mb4")
}

/// Open a single connection to the shop database.
///
/// # Errors
///
/// Returns [`DbError::Connect`] if the server is unreachable or rejects the credentials.
pub async fn connect(config: &DbConfig) -> Result<MySqlConnection, DbError> {
    connect_options(config)
        .connect()
        .await
        .map_err(|source| DbError::Connect {
            host: config.host.clone(),
            port: config.port,
            database: config.database.clone(),
            source,
        })
}

/// Connect, run the new-brands query once, and close the connection.
///
/// The connection is closed whether or not the query succeeded. A query error
/// takes precedence over a close error.
///
/// # Errors
///
/// Returns [`DbError`] if connecting, querying, or closing fails.
pub async fn run_new_brands_report(
    config: &DbConfig,
    query: &ReportQuery,
) -> Result<Vec<BrandReportRow>, DbError> {
    let mut conn = connect(config).await?;
    tracing::debug!(host = %config.host, port = config.port, database = %config.database, "connected");

    let started = Instant::now();
    let result = fetch_new_brands(&mut conn, &config.table_prefix, query).await;
    let closed = conn.close().await;

    let rows = result?;
    closed.map_err(DbError::Close)?;

    tracing::info!(
        policy = %query.policy,
        rows = rows.len(),
        elapsed = ?started.elapsed(),
        "new-brands query complete"
    );
    Ok(rows)
}
