use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One normalized inventory row. Numeric fields that were missing or
/// non-numeric in the source arrive as 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRow {
    pub code: String,
    pub name: String,
    pub tag_price: i64,
    /// "정상" (regular) or "기획" (planned/special).
    pub plan_type: String,
    pub cost: i64,
    pub stock: i64,
}

/// One normalized sales-ledger row. `code` may be empty (the row still
/// counts toward daily totals); `qty` may be negative for returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRow {
    pub date: Option<NaiveDate>,
    pub code: String,
    pub color: String,
    pub size: String,
    pub tag_price: i64,
    pub unit_cost: i64,
    pub qty: i64,
    pub amount: i64,
}
