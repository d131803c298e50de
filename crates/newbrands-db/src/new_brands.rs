//! The new-brands aggregation query, one SQL shape per [`AggregationPolicy`].
//!
//! Both shapes select the same columns (`active_products` only for the
//! unscoped policy), filter the first-product timestamp on the half-open
//! window `[since, until)` and apply `min_products` as a `HAVING` bound.

use chrono::{NaiveDateTime, NaiveTime};
use newbrands_core::{AggregationPolicy, BrandReportRow, ReportQuery};
use sqlx::mysql::MySqlConnection;

use crate::DbError;

/// A row returned by either query shape.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NewBrandRow {
    pub brand_name: String,
    pub first_product_live: NaiveDateTime,
    /// `COUNT` comes back as `BIGINT`; the correlated subquery may report it nullable.
    pub total_products: Option<i64>,
    /// Absent from the shop-scoped query.
    #[sqlx(default)]
    pub active_products: Option<i64>,
}

impl NewBrandRow {
    fn into_report_row(self, policy: AggregationPolicy) -> BrandReportRow {
        let count = |n: Option<i64>| u64::try_from(n.unwrap_or(0)).unwrap_or(0);
        BrandReportRow {
            brand_name: self.brand_name,
            first_product_live: self.first_product_live,
            total_products: count(self.total_products),
            active_products: policy
                .reports_active_count()
                .then(|| count(self.active_products)),
        }
    }
}

/// Render the SQL for `policy` against tables named with `prefix`.
///
/// `prefix` is interpolated verbatim; callers pass the validated
/// `DbConfig::table_prefix`.
#[must_use]
pub fn render_new_brands_sql(policy: AggregationPolicy, prefix: &str) -> String {
    match policy {
        // MySQL 8+: CTEs. First product across every product of the manufacturer.
        AggregationPolicy::Unscoped => format!(
            "WITH first_product AS ( \
                 SELECT p.id_manufacturer, MIN(p.date_add) AS first_product_live \
                 FROM {prefix}product p \
                 GROUP BY p.id_manufacturer \
             ), new_brands AS ( \
                 SELECT m.id_manufacturer, m.name AS brand_name, fp.first_product_live \
                 FROM first_product fp \
                 JOIN {prefix}manufacturer m ON m.id_manufacturer = fp.id_manufacturer \
                 WHERE fp.first_product_live >= ? AND fp.first_product_live < ? \
             ) \
             SELECT nb.brand_name, nb.first_product_live, \
                    COUNT(DISTINCT p.id_product) AS total_products, \
                    COUNT(DISTINCT CASE WHEN p.active = 1 THEN p.id_product END) AS active_products \
             FROM new_brands nb \
             JOIN {prefix}product p ON p.id_manufacturer = nb.id_manufacturer \
             GROUP BY nb.id_manufacturer, nb.brand_name, nb.first_product_live \
             HAVING total_products >= ? \
             ORDER BY nb.first_product_live DESC, nb.brand_name ASC"
        ),
        // MySQL 5.7 compatible: derived table plus correlated count.
        AggregationPolicy::ShopScoped => format!(
            "SELECT m.name AS brand_name, lp.first_product_live, \
                    ( \
                      SELECT COUNT(DISTINCT p2.id_product) \
                      FROM {prefix}product p2 \
                      JOIN {prefix}product_shop s2 \
                        ON s2.id_product = p2.id_product \
                       AND s2.id_shop = ? \
                       AND s2.active = 1 \
                       AND s2.visibility <> 'none' \
                      WHERE p2.id_manufacturer = m.id_manufacturer \
                    ) AS total_products \
             FROM ( \
               SELECT p.id_manufacturer, MIN(p.date_add) AS first_product_live \
               FROM {prefix}product p \
               JOIN {prefix}product_shop s \
                 ON s.id_product = p.id_product \
                AND s.id_shop = ? \
                AND s.active = 1 \
                AND s.visibility <> 'none' \
               GROUP BY p.id_manufacturer \
             ) lp \
             JOIN {prefix}manufacturer m ON m.id_manufacturer = lp.id_manufacturer \
             WHERE lp.first_product_live >= ? \
               AND lp.first_product_live < ? \
             HAVING total_products >= ? \
             ORDER BY lp.first_product_live DESC, m.name ASC"
        ),
    }
}

/// Run the new-brands query for `query` on an open connection.
///
/// # Errors
///
/// Returns [`DbError::Query`] on any execution or decode failure.
pub async fn fetch_new_brands(
    conn: &mut MySqlConnection,
    prefix: &str,
    query: &ReportQuery,
) -> Result<Vec<BrandReportRow>, DbError> {
    let sql = render_new_brands_sql(query.policy, prefix);
    let since = query.since.and_time(NaiveTime::MIN);
    let until = query.until.and_time(NaiveTime::MIN);
    let min_products = i64::from(query.min_products);

    tracing::debug!(
        policy = %query.policy,
        shop_id = query.shop_id,
        %since,
        %until,
        min_products,
        "running new-brands query"
    );

    let statement = sqlx::query_as::<_, NewBrandRow>(&sql);
    let statement = match query.policy {
        AggregationPolicy::Unscoped => statement.bind(since).bind(until).bind(min_products),
        AggregationPolicy::ShopScoped => statement
            .bind(query.shop_id)
            .bind(query.shop_id)
            .bind(since)
            .bind(until)
            .bind(min_products),
    };

    let rows = statement.fetch_all(conn).await.map_err(DbError::Query)?;

    Ok(rows
        .into_iter()
        .map(|row| row.into_report_row(query.policy))
        .collect())
}
