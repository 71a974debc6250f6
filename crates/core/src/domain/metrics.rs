use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fixed product categories, derived from keyword matching on the product name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "슬리퍼/지압")]
    SlippersAcupressure,
    #[serde(rename = "아쿠아슈즈/샌들")]
    AquaSandals,
    #[serde(rename = "스니커즈/운동화")]
    Sneakers,
    #[serde(rename = "트레킹/등산")]
    Trekking,
    #[serde(rename = "의류/상의")]
    ApparelTop,
    #[serde(rename = "의류/하의")]
    ApparelBottom,
    #[serde(rename = "양말/기타잡화")]
    SocksEtc,
    #[serde(rename = "기타")]
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Sneakers,
        Category::SlippersAcupressure,
        Category::AquaSandals,
        Category::Trekking,
        Category::ApparelTop,
        Category::ApparelBottom,
        Category::SocksEtc,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::SlippersAcupressure => "슬리퍼/지압",
            Category::AquaSandals => "아쿠아슈즈/샌들",
            Category::Sneakers => "스니커즈/운동화",
            Category::Trekking => "트레킹/등산",
            Category::ApparelTop => "의류/상의",
            Category::ApparelBottom => "의류/하의",
            Category::SocksEtc => "양말/기타잡화",
            Category::Other => "기타",
        }
    }

    pub fn is_apparel(self) -> bool {
        matches!(self, Category::ApparelTop | Category::ApparelBottom)
    }
}

/// One row per catalog item, with all derived fields recomputed from the
/// normalized inventory and sales records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductMetric {
    pub code: String,
    pub name: String,
    pub category: Category,
    pub tag_price: i64,
    pub plan_type: String,
    pub cost: i64,
    pub stock: i64,
    pub sales_qty: i64,
    pub sales_revenue: i64,
    pub avg_sale_price: f64,
    /// Realized discount vs tag price, percent.
    pub discount_rate: f64,
    /// Realized margin on sold units, percent.
    pub margin_rate: f64,
    pub daily_sales_rate: f64,
    /// stock / daily_sales_rate. 99999 when stocked but unsold, 0 when out of stock.
    pub days_of_stock: f64,
    pub color_breakdown: Vec<QtyByOption>,
    pub size_breakdown: Vec<QtyByOption>,
}

/// Sentinel for `days_of_stock` when there is stock but zero sales velocity.
pub const DAYS_OF_STOCK_UNSOLD: f64 = 99_999.0;

impl ProductMetric {
    pub fn inventory_value(&self) -> i64 {
        self.stock * self.cost
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QtyByOption {
    pub name: String,
    pub qty: i64,
}

/// Read-only aggregate over the `ProductMetric` set for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRollup {
    pub category: Category,
    pub total_products: usize,
    pub products_with_stock: usize,
    /// Stock total over in-stock items only.
    pub total_stock: i64,
    pub total_sales_qty: i64,
    pub total_sales_revenue: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub qty: i64,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyTrend {
    /// "W1", "W2", ... in chunk order from the first recorded date.
    pub week: String,
    pub days: usize,
    pub qty: i64,
    pub amount: i64,
    pub avg_daily_qty: f64,
    pub avg_daily_amount: i64,
    /// Percent change of avg daily qty vs the previous week (0 for W1).
    pub qty_growth: f64,
    pub amount_growth: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesSummary {
    pub total_products: usize,
    pub products_with_stock: usize,
    pub total_stock_qty: i64,
    pub total_sales_qty: i64,
    pub total_revenue: i64,
    pub avg_daily_sales_qty: f64,
    pub avg_daily_revenue: i64,
    pub date_range: Option<DateRange>,
    pub sales_days: usize,
    /// Absolute quantity over negative-qty (return) rows.
    pub return_count: i64,
}

/// Full aggregator output: metrics, rollups, trend series and curated subsets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analytics {
    pub summary: SalesSummary,
    pub products: Vec<ProductMetric>,
    pub categories: Vec<CategoryRollup>,
    pub daily_sales: Vec<DailySales>,
    pub weekly_trends: Vec<WeeklyTrend>,
    /// "상승" or "하락".
    pub overall_trend: String,
    pub top_sellers: Vec<ProductMetric>,
    pub dead_stock: Vec<ProductMetric>,
    pub high_margin: Vec<ProductMetric>,
    pub seasonal: Vec<ProductMetric>,
    pub new_arrivals: Vec<ProductMetric>,
}
