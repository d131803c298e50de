//! The report pipeline: query, assemble, write.

use anyhow::Context;
use chrono::Utc;
use newbrands_core::{write_report, ReportConfig, ReportPaths, ReportPayload};

#[derive(Debug)]
pub(crate) struct RunSummary {
    pub(crate) brands: usize,
    pub(crate) sum_products: u64,
    pub(crate) paths: ReportPaths,
}

/// Run the query once and write the report files.
///
/// # Errors
///
/// Returns an error if the database step or any file write fails. Nothing is
/// written when the database step fails.
pub(crate) async fn run_report(config: &ReportConfig) -> anyhow::Result<RunSummary> {
    let query = config.query();
    tracing::info!(
        policy = %query.policy,
        shop_id = query.shop_id,
        since = %query.since,
        until = %query.until,
        min_products = query.min_products,
        "generating new-brands report"
    );

    let rows = newbrands_db::run_new_brands_report(&config.db, &query)
        .await
        .context("new-brands query failed")?;

    let payload = ReportPayload::build(config, rows, Utc::now());
    let paths = write_report(&config.out_dir, &payload).with_context(|| {
        format!("failed to write report to {}", config.out_dir.display())
    })?;

    tracing::info!(
        brands = payload.meta.rows,
        sum_products = payload.meta.sum_products,
        out_dir = %config.out_dir.display(),
        "report written"
    );

    Ok(RunSummary {
        brands: payload.meta.rows,
        sum_products: payload.meta.sum_products,
        paths,
    })
}

/// The two stdout lines printed after a successful run.
pub(crate) fn summary_lines(config: &ReportConfig, summary: &RunSummary) -> [String; 2] {
    [
        format!(
            "OK: {} brands ({} products) -> {} and {}",
            summary.brands,
            summary.sum_products,
            summary.paths.json.display(),
            summary.paths.csv.display()
        ),
        period_line(config),
    ]
}

pub(crate) fn dry_run_lines(config: &ReportConfig) -> Vec<String> {
    vec![
        format!(
            "dry-run: would query {}@{}:{}/{} and write to {}",
            config.db.user,
            config.db.host,
            config.db.port,
            config.db.database,
            config.out_dir.display()
        ),
        period_line(config),
        newbrands_db::render_new_brands_sql(config.policy, &config.db.table_prefix),
    ]
}

fn period_line(config: &ReportConfig) -> String {
    format!(
        "Period: {} up to (excl) {} | shop {} | min_products={} | policy={}",
        config.since, config.until, config.shop_id, config.min_products, config.policy
    )
}
