use crate::domain::metrics::{
    Analytics, Category, CategoryRollup, DailySales, DateRange, ProductMetric, QtyByOption,
    SalesSummary, WeeklyTrend, DAYS_OF_STOCK_UNSOLD,
};
use crate::ingest::types::{SalesRow, StockRow};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Deadstock thresholds: stocked above this with zero sales or very slow
/// turnover counts as dead.
const DEAD_STOCK_MIN_STOCK: i64 = 100;
const DEAD_STOCK_MAX_DAYS: f64 = 180.0;

const HIGH_MARGIN_MIN_PCT: f64 = 50.0;
const HIGH_MARGIN_MIN_QTY: i64 = 50;
const TOP_SELLERS_CAP: usize = 30;

/// Plan-type marker for planned/special (new arrival) items.
const PLAN_TYPE_NEW: &str = "기획";

/// Name keywords marking summer items for the seasonal subset.
const SEASONAL_KEYWORDS: [&str; 10] = [
    "아쿠아", "샌들", "래쉬", "슬리퍼", "수영", "쇼츠", "스윔", "물놀이", "비치", "워터",
];

/// Ordered keyword sets for category classification; first match wins.
const CATEGORY_KEYWORDS: [(Category, &[&str]); 7] = [
    (Category::SlippersAcupressure, &["슬리퍼", "지압"]),
    (Category::AquaSandals, &["아쿠아", "샌들", "물놀이"]),
    (Category::Sneakers, &["스니커즈", "운동화", "러닝", "런 "]),
    (Category::Trekking, &["트레킹", "등산", "하이킹"]),
    (
        Category::ApparelTop,
        &[
            "티셔츠", "상의", "자켓", "후드", "플리스", "롱슬리브", "반팔", "래쉬가드", "집업",
            "코튼",
        ],
    ),
    (Category::ApparelBottom, &["팬츠", "레깅스", "쇼츠", "바지"]),
    (Category::SocksEtc, &["양말", "삭스", "인솔", "클리너"]),
];

pub fn classify_category(name: &str) -> Category {
    let n = name.to_lowercase();
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|k| n.contains(k)) {
            return category;
        }
    }
    Category::Other
}

#[derive(Debug, Default)]
struct SalesAccum {
    qty: i64,
    revenue: i64,
    total_cost: i64,
    colors: BTreeMap<String, i64>,
    sizes: BTreeMap<String, i64>,
}

/// Aggregate normalized inventory and sales rows into the full analytics
/// bundle. Pure: identical inputs always produce identical output.
pub fn analyze(stock_rows: &[StockRow], sales_rows: &[SalesRow]) -> Analytics {
    // Later duplicate codes overwrite earlier ones.
    let mut stock_map: BTreeMap<&str, &StockRow> = BTreeMap::new();
    for row in stock_rows {
        stock_map.insert(row.code.as_str(), row);
    }

    let mut by_product: BTreeMap<&str, SalesAccum> = BTreeMap::new();
    let mut daily: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
    let mut total_sales_qty: i64 = 0;
    let mut total_revenue: i64 = 0;
    let mut return_count: i64 = 0;

    for row in sales_rows {
        if row.qty < 0 {
            return_count += row.qty.abs();
        }
        total_sales_qty += row.qty;
        total_revenue += row.amount;

        if let Some(date) = row.date {
            let entry = daily.entry(date).or_default();
            entry.0 += row.qty;
            entry.1 += row.amount;
        }

        if row.code.is_empty() {
            continue;
        }
        let acc = by_product.entry(row.code.as_str()).or_default();
        acc.qty += row.qty;
        acc.revenue += row.amount;
        acc.total_cost += row.unit_cost * row.qty;
        if !row.color.is_empty() {
            *acc.colors.entry(row.color.clone()).or_default() += row.qty;
        }
        if !row.size.is_empty() {
            *acc.sizes.entry(row.size.clone()).or_default() += row.qty;
        }
    }

    let daily_sales: Vec<DailySales> = daily
        .iter()
        .map(|(&date, &(qty, amount))| DailySales { date, qty, amount })
        .collect();
    let sales_days = daily_sales.len().max(1);

    let empty = SalesAccum::default();
    let products: Vec<ProductMetric> = stock_map
        .values()
        .map(|s| {
            let acc = by_product.get(s.code.as_str()).unwrap_or(&empty);
            build_metric(s, acc, sales_days)
        })
        .collect();

    let categories = rollup_categories(&products);

    let top_sellers = {
        let mut v = products.clone();
        v.sort_by(|a, b| b.sales_qty.cmp(&a.sales_qty));
        v.truncate(TOP_SELLERS_CAP);
        v
    };
    let dead_stock: Vec<ProductMetric> = products
        .iter()
        .filter(|p| {
            p.stock > DEAD_STOCK_MIN_STOCK
                && (p.sales_qty == 0 || p.days_of_stock > DEAD_STOCK_MAX_DAYS)
        })
        .cloned()
        .collect();
    let high_margin: Vec<ProductMetric> = products
        .iter()
        .filter(|p| p.margin_rate > HIGH_MARGIN_MIN_PCT && p.sales_qty > HIGH_MARGIN_MIN_QTY)
        .cloned()
        .collect();
    let seasonal: Vec<ProductMetric> = products
        .iter()
        .filter(|p| {
            let n = p.name.to_lowercase();
            SEASONAL_KEYWORDS.iter().any(|k| n.contains(k))
        })
        .cloned()
        .collect();
    let new_arrivals: Vec<ProductMetric> = products
        .iter()
        .filter(|p| p.plan_type == PLAN_TYPE_NEW && p.stock > 0)
        .cloned()
        .collect();

    let weekly_trends = weekly_trends(&daily_sales);
    let overall_trend = overall_trend(&weekly_trends).to_string();

    let with_stock: Vec<&ProductMetric> = products.iter().filter(|p| p.stock > 0).collect();
    let summary = SalesSummary {
        total_products: products.len(),
        products_with_stock: with_stock.len(),
        total_stock_qty: with_stock.iter().map(|p| p.stock).sum(),
        total_sales_qty,
        total_revenue,
        avg_daily_sales_qty: round2(total_sales_qty as f64 / sales_days as f64),
        avg_daily_revenue: (total_revenue as f64 / sales_days as f64).round() as i64,
        date_range: match (daily_sales.first(), daily_sales.last()) {
            (Some(first), Some(last)) => Some(DateRange {
                start: first.date,
                end: last.date,
            }),
            _ => None,
        },
        sales_days,
        return_count,
    };

    Analytics {
        summary,
        products,
        categories,
        daily_sales,
        weekly_trends,
        overall_trend,
        top_sellers,
        dead_stock,
        high_margin,
        seasonal,
        new_arrivals,
    }
}

fn build_metric(s: &StockRow, acc: &SalesAccum, sales_days: usize) -> ProductMetric {
    let avg_sale_price = if acc.qty > 0 {
        acc.revenue as f64 / acc.qty as f64
    } else {
        0.0
    };
    let discount_rate = if s.tag_price > 0 && avg_sale_price > 0.0 {
        (1.0 - avg_sale_price / s.tag_price as f64) * 100.0
    } else {
        0.0
    };
    let margin_rate = if acc.revenue > 0 {
        (1.0 - acc.total_cost as f64 / acc.revenue as f64) * 100.0
    } else {
        0.0
    };
    let daily_sales_rate = acc.qty as f64 / sales_days as f64;
    let days_of_stock = if daily_sales_rate > 0.0 {
        s.stock as f64 / daily_sales_rate
    } else if s.stock > 0 {
        DAYS_OF_STOCK_UNSOLD
    } else {
        0.0
    };

    ProductMetric {
        code: s.code.clone(),
        name: s.name.clone(),
        category: classify_category(&s.name),
        tag_price: s.tag_price,
        plan_type: s.plan_type.clone(),
        cost: s.cost,
        stock: s.stock,
        sales_qty: acc.qty,
        sales_revenue: acc.revenue,
        avg_sale_price: round2(avg_sale_price),
        discount_rate: round2(discount_rate),
        margin_rate: round2(margin_rate),
        daily_sales_rate: round2(daily_sales_rate),
        days_of_stock: round2(days_of_stock),
        color_breakdown: breakdown(&acc.colors),
        size_breakdown: breakdown(&acc.sizes),
    }
}

fn breakdown(map: &BTreeMap<String, i64>) -> Vec<QtyByOption> {
    map.iter()
        .map(|(name, &qty)| QtyByOption {
            name: name.clone(),
            qty,
        })
        .collect()
}

fn rollup_categories(products: &[ProductMetric]) -> Vec<CategoryRollup> {
    Category::ALL
        .into_iter()
        .map(|category| {
            let items: Vec<&ProductMetric> =
                products.iter().filter(|p| p.category == category).collect();
            let with_stock: Vec<&&ProductMetric> =
                items.iter().filter(|p| p.stock > 0).collect();
            CategoryRollup {
                category,
                total_products: items.len(),
                products_with_stock: with_stock.len(),
                total_stock: with_stock.iter().map(|p| p.stock).sum(),
                total_sales_qty: items.iter().map(|p| p.sales_qty).sum(),
                total_sales_revenue: items.iter().map(|p| p.sales_revenue).sum(),
            }
        })
        .collect()
}

/// Non-overlapping 7-day chunking of the date-sorted daily series; the last
/// chunk may be shorter.
fn weekly_trends(daily_sales: &[DailySales]) -> Vec<WeeklyTrend> {
    let mut weeks: Vec<WeeklyTrend> = Vec::new();
    for chunk in daily_sales.chunks(7) {
        let qty: i64 = chunk.iter().map(|d| d.qty).sum();
        let amount: i64 = chunk.iter().map(|d| d.amount).sum();
        weeks.push(WeeklyTrend {
            week: format!("W{}", weeks.len() + 1),
            days: chunk.len(),
            qty,
            amount,
            avg_daily_qty: round2(qty as f64 / chunk.len() as f64),
            avg_daily_amount: (amount as f64 / chunk.len() as f64).round() as i64,
            qty_growth: 0.0,
            amount_growth: 0.0,
        });
    }

    for i in 1..weeks.len() {
        let prev = (weeks[i - 1].avg_daily_qty, weeks[i - 1].avg_daily_amount);
        let w = &mut weeks[i];
        if prev.0 != 0.0 {
            w.qty_growth = round2((w.avg_daily_qty / prev.0 - 1.0) * 100.0);
        }
        if prev.1 != 0 {
            w.amount_growth = round2((w.avg_daily_amount as f64 / prev.1 as f64 - 1.0) * 100.0);
        }
    }

    weeks
}

fn overall_trend(weeks: &[WeeklyTrend]) -> &'static str {
    match (weeks.first(), weeks.last()) {
        (Some(first), Some(last)) if weeks.len() >= 2 => {
            if last.avg_daily_amount > first.avg_daily_amount {
                "상승"
            } else {
                "하락"
            }
        }
        _ => "하락",
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stock(code: &str, name: &str, tag: i64, cost: i64, qty: i64) -> StockRow {
        StockRow {
            code: code.to_string(),
            name: name.to_string(),
            tag_price: tag,
            plan_type: "정상".to_string(),
            cost,
            stock: qty,
        }
    }

    fn sale(date: (i32, u32, u32), code: &str, qty: i64, unit_cost: i64, amount: i64) -> SalesRow {
        SalesRow {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2),
            code: code.to_string(),
            color: "BLACK".to_string(),
            size: "270".to_string(),
            tag_price: 0,
            unit_cost,
            qty,
            amount,
        }
    }

    #[test]
    fn classifies_by_first_matching_keyword_set() {
        assert_eq!(classify_category("어썸 지압 슬리퍼"), Category::SlippersAcupressure);
        assert_eq!(classify_category("아쿠아슈즈 워터 302"), Category::AquaSandals);
        assert_eq!(classify_category("데일리 스니커즈"), Category::Sneakers);
        assert_eq!(classify_category("트레킹화 프로"), Category::Trekking);
        assert_eq!(classify_category("코튼 티셔츠"), Category::ApparelTop);
        assert_eq!(classify_category("스포츠 레깅스"), Category::ApparelBottom);
        assert_eq!(classify_category("쿠션 양말 3족"), Category::SocksEtc);
        assert_eq!(classify_category("기프트 카드"), Category::Other);
    }

    #[test]
    fn derives_per_product_metrics() {
        let stocks = vec![stock("A1", "데일리 스니커즈", 50_000, 15_000, 40)];
        let sales = vec![
            sale((2026, 2, 1), "A1", 5, 15_000, 200_000),
            sale((2026, 2, 2), "A1", 5, 15_000, 200_000),
        ];
        let out = analyze(&stocks, &sales);

        let p = &out.products[0];
        assert_eq!(p.sales_qty, 10);
        assert_eq!(p.sales_revenue, 400_000);
        assert_eq!(p.avg_sale_price, 40_000.0);
        // (1 - 40000/50000) * 100
        assert_eq!(p.discount_rate, 20.0);
        // (1 - 150000/400000) * 100
        assert_eq!(p.margin_rate, 62.5);
        assert_eq!(p.daily_sales_rate, 5.0);
        assert_eq!(p.days_of_stock, 8.0);
    }

    #[test]
    fn unsold_stocked_item_gets_sentinel_days_of_stock() {
        let stocks = vec![stock("B1", "창고 티셔츠", 20_000, 5_000, 300)];
        let out = analyze(&stocks, &[]);
        assert_eq!(out.products[0].days_of_stock, DAYS_OF_STOCK_UNSOLD);
        assert_eq!(out.products[0].sales_qty, 0);
    }

    #[test]
    fn rows_without_code_count_toward_daily_totals_only() {
        let stocks = vec![stock("A1", "스니커즈", 50_000, 15_000, 10)];
        let sales = vec![sale((2026, 2, 1), "", 3, 0, 90_000)];
        let out = analyze(&stocks, &sales);
        assert_eq!(out.summary.total_sales_qty, 3);
        assert_eq!(out.summary.total_revenue, 90_000);
        assert_eq!(out.products[0].sales_qty, 0);
        assert_eq!(out.daily_sales.len(), 1);
    }

    #[test]
    fn returns_accumulate_into_return_count() {
        let stocks = vec![stock("A1", "스니커즈", 50_000, 15_000, 10)];
        let sales = vec![
            sale((2026, 2, 1), "A1", 4, 15_000, 160_000),
            sale((2026, 2, 1), "A1", -1, 15_000, -40_000),
        ];
        let out = analyze(&stocks, &sales);
        assert_eq!(out.summary.return_count, 1);
        assert_eq!(out.summary.total_sales_qty, 3);
    }

    #[test]
    fn weekly_chunks_and_growth() {
        let stocks = vec![stock("A1", "스니커즈", 50_000, 15_000, 500)];
        let mut sales = Vec::new();
        // W1: 10/day, W2: 20/day, 3 leftover days at 20/day.
        for d in 1..=17u32 {
            let qty = if d <= 7 { 10 } else { 20 };
            sales.push(sale((2026, 2, d), "A1", qty, 10_000, qty * 30_000));
        }
        let out = analyze(&stocks, &sales);

        assert_eq!(out.weekly_trends.len(), 3);
        assert_eq!(out.weekly_trends[0].days, 7);
        assert_eq!(out.weekly_trends[2].days, 3);
        assert_eq!(out.weekly_trends[0].qty_growth, 0.0);
        assert_eq!(out.weekly_trends[1].qty_growth, 100.0);
        assert_eq!(out.weekly_trends[2].qty_growth, 0.0);
        assert_eq!(out.overall_trend, "상승");
    }

    #[test]
    fn single_week_trend_is_down() {
        let stocks = vec![stock("A1", "스니커즈", 50_000, 15_000, 500)];
        let sales = vec![sale((2026, 2, 1), "A1", 10, 10_000, 300_000)];
        let out = analyze(&stocks, &sales);
        assert_eq!(out.overall_trend, "하락");
    }

    #[test]
    fn curated_subsets_apply_fixed_thresholds() {
        let stocks = vec![
            // Dead: stocked, zero sales.
            stock("D1", "창고 후드", 30_000, 8_000, 400),
            // High margin requires qty > 50 and margin > 50.
            stock("H1", "지압 슬리퍼", 30_000, 5_000, 80),
            // Seasonal by keyword.
            stock("S1", "비치 타올", 15_000, 4_000, 60),
            // New arrival: plan type 기획 with stock.
            StockRow {
                plan_type: "기획".to_string(),
                ..stock("N1", "신형 러닝화", 90_000, 30_000, 120)
            },
        ];
        let mut sales = Vec::new();
        for d in 1..=10u32 {
            sales.push(sale((2026, 2, d), "H1", 6, 5_000, 6 * 25_000));
        }
        let out = analyze(&stocks, &sales);

        assert!(out.dead_stock.iter().any(|p| p.code == "D1"));
        assert!(out.high_margin.iter().any(|p| p.code == "H1"));
        assert!(out.seasonal.iter().any(|p| p.code == "S1"));
        assert!(out.new_arrivals.iter().any(|p| p.code == "N1"));
        assert!(!out.dead_stock.iter().any(|p| p.code == "H1"));
    }

    #[test]
    fn aggregation_is_idempotent() {
        let stocks = vec![
            stock("A1", "데일리 스니커즈", 50_000, 15_000, 40),
            stock("B1", "창고 티셔츠", 20_000, 5_000, 300),
        ];
        let sales = vec![
            sale((2026, 2, 1), "A1", 5, 15_000, 200_000),
            sale((2026, 2, 3), "A1", 2, 15_000, 80_000),
        ];

        let a = serde_json::to_string(&analyze(&stocks, &sales)).unwrap();
        let b = serde_json::to_string(&analyze(&stocks, &sales)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn later_duplicate_codes_overwrite() {
        let stocks = vec![
            stock("A1", "구형 스니커즈", 50_000, 15_000, 40),
            stock("A1", "신형 스니커즈", 60_000, 18_000, 70),
        ];
        let out = analyze(&stocks, &[]);
        assert_eq!(out.products.len(), 1);
        assert_eq!(out.products[0].name, "신형 스니커즈");
        assert_eq!(out.products[0].stock, 70);
    }
}
