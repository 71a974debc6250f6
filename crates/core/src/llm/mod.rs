pub mod error;
pub mod gemini;
pub mod json;

use crate::domain::event::{
    ConversionProcess, EventType, ExternalMarketing, GiftPlan, IssueStrategy, KpiTargets, Rewards,
};
use crate::domain::metrics::SalesSummary;
use serde::Deserialize;

/// Context for enriching one campaign's editorial content.
#[derive(Debug, Clone)]
pub struct EventPromptInput {
    pub event_type: EventType,
    pub product_names: Vec<String>,
    pub discount_range: String,
    pub summary: SalesSummary,
    pub trend: String,
}

/// Context for enriching one guerrilla deal.
#[derive(Debug, Clone)]
pub struct DealPromptInput {
    pub theme: String,
    pub product_names: Vec<String>,
}

/// Partial editorial content returned by the model. Every field is optional;
/// whatever is missing falls back to the static deck per field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContent {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub copy: Option<Vec<String>>,
    pub slogan: Option<String>,
    pub marketing_ideas: Option<Vec<String>>,
    pub issue_strategy: Option<IssueStrategy>,
    pub conversion_process: Option<ConversionProcess>,
    pub gifts: Option<GiftPlan>,
    pub rewards: Option<Rewards>,
    pub external_marketing: Option<Vec<ExternalMarketing>>,
    pub kpi_targets: Option<WireKpiTargets>,
}

/// KPI block as the model emits it. Converted into the domain shape; the
/// calculation basis is always computed locally.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireKpiTargets {
    pub expected_revenue: String,
    pub expected_orders: i64,
    pub conversion_rate: String,
    pub avg_order_value: String,
}

impl From<WireKpiTargets> for KpiTargets {
    fn from(w: WireKpiTargets) -> Self {
        KpiTargets {
            expected_revenue: w.expected_revenue,
            expected_orders: w.expected_orders,
            conversion_rate: w.conversion_rate,
            avg_order_value: w.avg_order_value,
            calculation_basis: None,
        }
    }
}

#[async_trait::async_trait]
pub trait EnrichmentClient: Send + Sync {
    async fn event_content(&self, input: EventPromptInput) -> anyhow::Result<EventContent>;

    async fn deal_content(&self, input: DealPromptInput) -> anyhow::Result<EventContent>;
}
