use crate::domain::metrics::{Category, CategoryRollup};
use serde::{Deserialize, Serialize};

/// Stock-to-sales ratio reported when a category has stock but zero sales.
pub const RATIO_NO_SALES: f64 = 999.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Critical,
    Warning,
    Caution,
    LowStock,
    Healthy,
}

impl HealthStatus {
    pub fn tag(self) -> &'static str {
        match self {
            HealthStatus::Critical => "critical",
            HealthStatus::Warning => "warning",
            HealthStatus::Caution => "caution",
            HealthStatus::LowStock => "low_stock",
            HealthStatus::Healthy => "healthy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HealthStatus::Critical => "위험",
            HealthStatus::Warning => "경고",
            HealthStatus::Caution => "주의",
            HealthStatus::LowStock => "재고부족",
            HealthStatus::Healthy => "양호",
        }
    }

    fn action(self) -> &'static str {
        match self {
            HealthStatus::Critical => "행사 제외 권고 — 악성재고 소진전 또는 사은품/묶음 전환",
            HealthStatus::Warning => "재고 과잉 — 역시즌/악성재고 행사에 집중 배치, 묶음 할인 적용",
            HealthStatus::Caution => "판매 대비 재고 높음 — 할인폭 확대 또는 서브 행사 배치",
            HealthStatus::LowStock => "재고 부족 주의 — 할인폭 축소, 리오더 검토",
            HealthStatus::Healthy => "정상 — 메인/시즌 행사 적극 활용",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDiagnosis {
    pub category: Category,
    pub total_products: usize,
    pub total_stock: i64,
    pub total_sales_qty: i64,
    pub total_sales_revenue: i64,
    /// Rounded to one decimal place.
    pub stock_to_sales_ratio: f64,
    pub status: HealthStatus,
    pub action: String,
}

/// Pure health diagnosis over the category rollups. Thresholds are checked
/// in order; the first match wins.
pub fn diagnose(rollups: &[CategoryRollup]) -> Vec<CategoryDiagnosis> {
    rollups
        .iter()
        .map(|c| {
            let ratio = if c.total_sales_qty > 0 {
                c.total_stock as f64 / c.total_sales_qty as f64
            } else {
                RATIO_NO_SALES
            };

            let status = if c.total_sales_qty == 0 && c.total_stock > 0 {
                HealthStatus::Critical
            } else if ratio > 50.0 {
                HealthStatus::Warning
            } else if ratio > 20.0 {
                HealthStatus::Caution
            } else if c.total_sales_qty > 0 && (c.total_stock as f64) < c.total_sales_qty as f64 * 0.3 {
                HealthStatus::LowStock
            } else {
                HealthStatus::Healthy
            };

            CategoryDiagnosis {
                category: c.category,
                total_products: c.total_products,
                total_stock: c.total_stock,
                total_sales_qty: c.total_sales_qty,
                total_sales_revenue: c.total_sales_revenue,
                stock_to_sales_ratio: (ratio * 10.0).round() / 10.0,
                status,
                action: status.action().to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rollup(category: Category, stock: i64, sales_qty: i64) -> CategoryRollup {
        CategoryRollup {
            category,
            total_products: 10,
            products_with_stock: 8,
            total_stock: stock,
            total_sales_qty: sales_qty,
            total_sales_revenue: sales_qty * 30_000,
        }
    }

    #[test]
    fn stocked_but_unsold_is_critical() {
        let out = diagnose(&[rollup(Category::Other, 500, 0)]);
        assert_eq!(out[0].status, HealthStatus::Critical);
        assert_eq!(out[0].stock_to_sales_ratio, RATIO_NO_SALES);
    }

    #[test]
    fn high_ratio_is_warning_then_caution() {
        let out = diagnose(&[
            rollup(Category::Sneakers, 5_100, 100),
            rollup(Category::Trekking, 2_100, 100),
        ]);
        assert_eq!(out[0].status, HealthStatus::Warning);
        assert_eq!(out[1].status, HealthStatus::Caution);
    }

    #[test]
    fn thin_stock_is_low_stock() {
        // 25 in stock vs 100 sold: below the 0.3x threshold.
        let out = diagnose(&[rollup(Category::ApparelTop, 25, 100)]);
        assert_eq!(out[0].status, HealthStatus::LowStock);
    }

    #[test]
    fn balanced_category_is_healthy() {
        let out = diagnose(&[rollup(Category::AquaSandals, 80, 100)]);
        assert_eq!(out[0].status, HealthStatus::Healthy);
        assert_eq!(out[0].stock_to_sales_ratio, 0.8);
    }

    #[test]
    fn empty_category_falls_through_to_warning() {
        let out = diagnose(&[rollup(Category::SocksEtc, 0, 0)]);
        // No stock and no sales: the critical branch requires stock > 0,
        // so the sentinel ratio lands on the warning branch.
        assert_eq!(out[0].status, HealthStatus::Warning);
    }
}
