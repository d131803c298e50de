//! Report model: rows read from the shop database and the payload written to disk.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::{AggregationPolicy, ReportConfig};

/// Timestamp layout used for `first_product_live` in both JSON and CSV output.
pub const FIRST_PRODUCT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp layout used for `meta.generated_at` (UTC, second precision).
pub const GENERATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One brand as aggregated by the new-brands query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandReportRow {
    pub brand_name: String,
    pub first_product_live: NaiveDateTime,
    pub total_products: u64,
    /// Only populated under [`AggregationPolicy::Unscoped`].
    pub active_products: Option<u64>,
}

/// A serialized report line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportItem {
    pub brand: String,
    pub first_product_live: String,
    pub total_products: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_products: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportMeta {
    pub shop_id: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub min_products: u32,
    pub policy: AggregationPolicy,
    pub generated_at: String,
    pub rows: usize,
    pub sum_products: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum_active: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPayload {
    pub meta: ReportMeta,
    pub items: Vec<ReportItem>,
}

impl ReportPayload {
    /// Assemble the payload for one run.
    ///
    /// Items are ordered newest first (ties by brand name) and rows under the
    /// `min_products` threshold are dropped, so the payload upholds its
    /// invariants whatever order the rows arrive in. Active counts are kept
    /// only when the policy reports them.
    #[must_use]
    pub fn build(
        config: &ReportConfig,
        mut rows: Vec<BrandReportRow>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let with_active = config.policy.reports_active_count();
        let min_products = u64::from(config.min_products);

        rows.retain(|row| row.total_products >= min_products);
        rows.sort_by(|a, b| {
            b.first_product_live
                .cmp(&a.first_product_live)
                .then_with(|| a.brand_name.cmp(&b.brand_name))
        });

        let items: Vec<ReportItem> = rows
            .into_iter()
            .map(|row| ReportItem {
                brand: row.brand_name,
                first_product_live: row
                    .first_product_live
                    .format(FIRST_PRODUCT_FORMAT)
                    .to_string(),
                total_products: row.total_products,
                active_products: with_active.then(|| row.active_products.unwrap_or(0)),
            })
            .collect();

        let sum_products: u64 = items.iter().map(|item| item.total_products).sum();
        let sum_active = with_active.then(|| {
            items
                .iter()
                .filter_map(|item| item.active_products)
                .sum::<u64>()
        });

        Self {
            meta: ReportMeta {
                shop_id: config.shop_id,
                start_date: config.since,
                end_date: config.until,
                min_products: config.min_products,
                policy: config.policy,
                generated_at: generated_at.format(GENERATED_AT_FORMAT).to_string(),
                rows: items.len(),
                sum_products,
                sum_active,
            },
            items,
        }
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
