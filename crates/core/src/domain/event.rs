use crate::domain::diagnosis::CategoryDiagnosis;
use crate::domain::metrics::Category;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Campaign types. Each is a mutually exclusive product allocation bucket
/// with its own pricing, budget and KPI policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "main")]
    Main,
    #[serde(rename = "sub")]
    Sub,
    #[serde(rename = "season")]
    Season,
    #[serde(rename = "offSeason")]
    OffSeason,
    #[serde(rename = "newProduct")]
    NewProduct,
    #[serde(rename = "guerrilla")]
    Guerrilla,
    #[serde(rename = "deadStock")]
    DeadStock,
}

impl EventType {
    pub const ALL: [EventType; 7] = [
        EventType::Main,
        EventType::Sub,
        EventType::Season,
        EventType::OffSeason,
        EventType::NewProduct,
        EventType::Guerrilla,
        EventType::DeadStock,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            EventType::Main => "main",
            EventType::Sub => "sub",
            EventType::Season => "season",
            EventType::OffSeason => "offSeason",
            EventType::NewProduct => "newProduct",
            EventType::Guerrilla => "guerrilla",
            EventType::DeadStock => "deadStock",
        }
    }

    pub fn parse_tag(s: &str) -> Option<EventType> {
        EventType::ALL.into_iter().find(|t| t.tag() == s.trim())
    }

    pub fn label(self) -> &'static str {
        match self {
            EventType::Main => "메인 행사",
            EventType::Sub => "서브 행사",
            EventType::Season => "시즌 행사",
            EventType::OffSeason => "역시즌 행사",
            EventType::NewProduct => "신상품 런칭",
            EventType::Guerrilla => "게릴라 원데이 딜",
            EventType::DeadStock => "악성재고 소진전",
        }
    }

    /// One-line description used in enrichment prompts.
    pub fn describe(self) -> &'static str {
        match self {
            EventType::Main => "메인 행사 (봄맞이 빅 세일) - 베스트셀러 중심 최대 60% 할인",
            EventType::Sub => "서브 행사 (숨은 인기 아이템) - 중위권 상품 30~45% 할인",
            EventType::Season => "시즌 행사 (S/S 프리뷰) - 봄/여름 신시즌 상품 20~35% 할인",
            EventType::OffSeason => "역시즌 행사 - 여름 아이템을 겨울에 50~70% 파격 할인",
            EventType::NewProduct => "신상품 출시 런칭 - 기획 상품 10~20% 런칭 특가",
            EventType::Guerrilla => "게릴라 원데이 딜 - 24시간 한정 60~80% 초특가",
            EventType::DeadStock => "악성재고 소진전 - 장기 재고 70~90% 대폭 할인",
        }
    }
}

/// A `ProductMetric` bound to exactly one campaign with a computed
/// promotional price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPromotion {
    pub code: String,
    pub name: String,
    pub category: Category,
    /// Effective tag price (reconstructed when the listed one is missing).
    pub tag_price: i64,
    /// Final promotional price. Always a multiple of 100 and >= 100.
    pub event_price: i64,
    /// Discount actually applied vs tag, percent. May differ from the
    /// nominal band after rounding and the margin floor.
    pub discount_rate: f64,
    pub cost: i64,
    pub stock: i64,
    pub sales_qty: i64,
    pub expected_margin: f64,
    /// event_price / cost.
    pub markup: f64,
    pub daily_sales_rate: f64,
    /// Priced below cost (only possible in loss-allowed campaigns).
    pub below_bep: bool,
    pub profit_per_unit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_per_person: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_of_stock: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Duration {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountTier {
    pub condition: String,
    pub discount: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyDiscount {
    pub week: u32,
    pub discount: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleDeal {
    #[serde(rename = "type")]
    pub kind: String,
    pub condition: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountStructure {
    #[serde(rename = "type")]
    pub kind: String,
    pub range: String,
    pub basis: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiers: Vec<DiscountTier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weekly_escalation: Vec<WeeklyDiscount>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bundle_types: Vec<BundleDeal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueStrategy {
    pub description: String,
    pub tactics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionStep {
    pub step: u32,
    pub name: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionProcess {
    pub steps: Vec<ConversionStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiftTier {
    pub condition: String,
    pub gift: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GiftPlan {
    pub tiers: Vec<GiftTier>,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rewards {
    pub rate: String,
    pub condition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalMarketing {
    pub channel: String,
    pub plan: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roas_target: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetCustomer {
    pub primary: String,
    pub behavior: String,
    pub new_vs_return: String,
    pub key_channel: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetChannel {
    pub channel: String,
    pub share: String,
    pub amount: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketingBudget {
    pub amount: String,
    pub share: String,
    pub channels: Vec<BudgetChannel>,
    pub roas_target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiTargets {
    pub expected_revenue: String,
    pub expected_orders: i64,
    pub conversion_rate: String,
    pub avg_order_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation_basis: Option<String>,
}

/// One generated campaign (or one guerrilla sub-deal).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_type: EventType,
    /// Disambiguates multiple allocations of the same type (guerrilla deals).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_number: Option<u32>,
    pub title: String,
    pub subtitle: String,
    pub copy: Vec<String>,
    pub slogan: String,
    pub marketing_ideas: Vec<String>,
    pub issue_strategy: IssueStrategy,
    pub conversion_process: ConversionProcess,
    pub discount_structure: DiscountStructure,
    pub sections: Vec<Section>,
    pub duration: Duration,
    pub products: Vec<ProductPromotion>,
    pub gifts: GiftPlan,
    pub rewards: Rewards,
    pub external_marketing: Vec<ExternalMarketing>,
    pub target_customer: TargetCustomer,
    pub marketing_budget: MarketingBudget,
    pub kpi_targets: KpiTargets,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_inventory_value: Option<i64>,
}

/// Low-cost, high-stock unsold items used as bundled incentives. Shared
/// informationally across campaigns; not deducted from any allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiftCandidate {
    pub code: String,
    pub name: String,
    pub cost: i64,
    pub stock: i64,
    pub category: Category,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupSummary {
    pub total_assigned: usize,
    pub note: String,
}

/// Echo of the aggregated summary carried inside the bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSummaryEcho {
    pub total_products: usize,
    pub products_with_stock: usize,
    pub total_stock_qty: i64,
    pub total_sales_qty: i64,
    pub total_revenue: i64,
    pub avg_daily_revenue: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyPhase {
    pub period: String,
    pub phase: String,
    pub events: Vec<String>,
    pub focus: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoughPhase {
    pub period: String,
    pub name: String,
    pub ideas: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRoughPlan {
    pub title: String,
    pub phases: Vec<RoughPhase>,
    pub budget_note: String,
    pub key_metrics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetAllocation {
    pub total: String,
    pub breakdown: Vec<BudgetChannel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallStrategy {
    pub key_message: String,
    pub timeline: Vec<StrategyPhase>,
    pub april_plan: MonthlyRoughPlan,
    pub budget_allocation: BudgetAllocation,
}

/// Full allocator output for one generation run. Pure data, no formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioBundle {
    pub generated_at: DateTime<Utc>,
    pub brand: String,
    pub report_period: String,
    pub event_period: String,
    pub data_summary: DataSummaryEcho,
    pub category_diagnosis: Vec<CategoryDiagnosis>,
    pub gift_candidates: Vec<GiftCandidate>,
    pub deduplication: DedupSummary,
    pub events: Vec<Event>,
    pub overall_strategy: OverallStrategy,
}
