use std::path::PathBuf;

use chrono::TimeZone;

use super::*;
use crate::DbConfig;

fn config(policy: AggregationPolicy, min_products: u32) -> ReportConfig {
    ReportConfig {
        db: DbConfig {
            host: "127.0.0.1".to_string(),
            port: 3306,
            user: "report".to_string(),
            password: "secret".to_string(),
            database: "shop".to_string(),
            table_prefix: "ps_".to_string(),
        },
        shop_id: 4,
        since: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        until: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        min_products,
        policy,
        out_dir: PathBuf::from("./docs"),
    }
}

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

fn row(name: &str, first: NaiveDateTime, total: u64, active: Option<u64>) -> BrandReportRow {
    BrandReportRow {
        brand_name: name.to_string(),
        first_product_live: first,
        total_products: total,
        active_products: active,
    }
}

fn generated() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 5).unwrap()
}

#[test]
fn meta_totals_match_items() {
    let rows = vec![
        row("Acme", at(2024, 2, 1), 3, Some(2)),
        row("Bolt", at(2024, 5, 1), 7, Some(7)),
        row("Crate", at(2024, 3, 1), 1, Some(0)),
    ];
    let payload = ReportPayload::build(&config(AggregationPolicy::Unscoped, 0), rows, generated());

    assert_eq!(payload.meta.rows, payload.items.len());
    assert_eq!(payload.meta.rows, 3);
    assert_eq!(payload.meta.sum_products, 11);
    assert_eq!(payload.meta.sum_active, Some(9));
}

#[test]
fn items_are_newest_first_with_name_tiebreak() {
    let rows = vec![
        row("Acme", at(2024, 2, 1), 3, None),
        row("Zeta", at(2024, 5, 1), 2, None),
        row("Bolt", at(2024, 5, 1), 2, None),
    ];
    let payload =
        ReportPayload::build(&config(AggregationPolicy::ShopScoped, 0), rows, generated());

    let brands: Vec<&str> = payload.items.iter().map(|i| i.brand.as_str()).collect();
    assert_eq!(brands, ["Bolt", "Zeta", "Acme"]);
    for pair in payload.items.windows(2) {
        assert!(pair[0].first_product_live >= pair[1].first_product_live);
    }
}

#[test]
fn rows_below_threshold_are_dropped() {
    let rows = vec![
        row("Acme", at(2024, 2, 1), 3, None),
        row("Tiny", at(2024, 4, 1), 1, None),
    ];
    let payload =
        ReportPayload::build(&config(AggregationPolicy::ShopScoped, 2), rows, generated());

    assert_eq!(payload.items.len(), 1);
    assert!(payload.items.iter().all(|i| i.total_products >= 2));
    assert_eq!(payload.meta.sum_products, 3);
}

#[test]
fn acme_scenario_with_min_two() {
    let rows = vec![row("Acme", at(2024, 2, 1), 3, None)];
    let payload =
        ReportPayload::build(&config(AggregationPolicy::ShopScoped, 2), rows, generated());

    assert_eq!(payload.items.len(), 1);
    assert_eq!(payload.items[0].brand, "Acme");
    assert_eq!(payload.items[0].total_products, 3);
    assert!(payload.items[0].first_product_live.starts_with("2024-02-01 "));
}

#[test]
fn empty_rows_give_empty_payload() {
    let payload =
        ReportPayload::build(&config(AggregationPolicy::ShopScoped, 5), Vec::new(), generated());

    assert!(payload.items.is_empty());
    assert_eq!(payload.meta.rows, 0);
    assert_eq!(payload.meta.sum_products, 0);
    assert_eq!(payload.meta.sum_active, None);
}

#[test]
fn shop_scoped_drops_active_counts() {
    let rows = vec![row("Acme", at(2024, 2, 1), 3, Some(3))];
    let payload =
        ReportPayload::build(&config(AggregationPolicy::ShopScoped, 0), rows, generated());

    assert_eq!(payload.items[0].active_products, None);
    assert_eq!(payload.meta.sum_active, None);
}

#[test]
fn unscoped_fills_missing_active_count_with_zero() {
    let rows = vec![row("Acme", at(2024, 2, 1), 3, None)];
    let payload = ReportPayload::build(&config(AggregationPolicy::Unscoped, 0), rows, generated());

    assert_eq!(payload.items[0].active_products, Some(0));
    assert_eq!(payload.meta.sum_active, Some(0));
}

#[test]
fn serializes_expected_shape() {
    let rows = vec![row("Acme", at(2024, 2, 1), 3, None)];
    let payload =
        ReportPayload::build(&config(AggregationPolicy::ShopScoped, 2), rows, generated());
    let value = serde_json::to_value(&payload).unwrap();

    assert_eq!(
        value,
        serde_json::json!({
            "meta": {
                "shop_id": 4,
                "start_date": "2024-01-01",
                "end_date": "2025-01-01",
                "min_products": 2,
                "policy": "shop-scoped",
                "generated_at": "2024-06-01T12:00:05Z",
                "rows": 1,
                "sum_products": 3
            },
            "items": [
                {
                    "brand": "Acme",
                    "first_product_live": "2024-02-01 09:30:00",
                    "total_products": 3
                }
            ]
        })
    );
}

#[test]
fn unscoped_serializes_active_fields() {
    let rows = vec![row("Acme", at(2024, 2, 1), 3, Some(1))];
    let payload = ReportPayload::build(&config(AggregationPolicy::Unscoped, 0), rows, generated());
    let value = serde_json::to_value(&payload).unwrap();

    assert_eq!(value["meta"]["policy"], "unscoped");
    assert_eq!(value["meta"]["sum_active"], 1);
    assert_eq!(value["items"][0]["active_products"], 1);
}
