use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How a brand's first product and product counts are aggregated.
///
/// The two policies select different brand sets for the same catalog, so the
/// choice is always explicit and recorded in the report metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationPolicy {
    /// First product taken over every product of the manufacturer, regardless
    /// of shop, visibility or active flag. Reports total and active counts.
    Unscoped,
    /// First product and counts restricted to products that are active,
    /// visible and assigned to the configured shop. Reports a single count.
    #[default]
    ShopScoped,
}

impl AggregationPolicy {
    /// Whether rows produced under this policy carry an `active_products` count.
    #[must_use]
    pub fn reports_active_count(self) -> bool {
        matches!(self, AggregationPolicy::Unscoped)
    }

    /// CSV header row for reports produced under this policy.
    #[must_use]
    pub fn csv_header(self) -> &'static [&'static str] {
        match self {
            AggregationPolicy::Unscoped => &[
                "brand",
                "first_product_live",
                "total_products",
                "active_products",
            ],
            AggregationPolicy::ShopScoped => &["brand", "first_product_live", "total_products"],
        }
    }
}

impl std::fmt::Display for AggregationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregationPolicy::Unscoped => write!(f, "unscoped"),
            AggregationPolicy::ShopScoped => write!(f, "shop-scoped"),
        }
    }
}

impl FromStr for AggregationPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unscoped" => Ok(AggregationPolicy::Unscoped),
            "shop-scoped" | "shop_scoped" => Ok(AggregationPolicy::ShopScoped),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}
