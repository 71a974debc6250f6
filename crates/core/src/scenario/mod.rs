//! Rule-based promotional allocator. Partitions the analyzed catalog across
//! the selected campaign types, prices every pick, and attaches budget, KPI
//! and editorial content to each campaign.

pub mod content;
pub mod pricing;
pub mod tables;

use crate::domain::diagnosis;
use crate::domain::event::{
    BudgetAllocation, BudgetChannel, ConversionProcess, DataSummaryEcho, DedupSummary, Duration,
    Event, EventType, ExternalMarketing, GiftCandidate, GiftPlan, GiftTier, IssueStrategy,
    MonthlyRoughPlan, OverallStrategy, ProductPromotion, Rewards, RoughPhase, ScenarioBundle,
    StrategyPhase,
};
use crate::domain::metrics::{Analytics, Category, ProductMetric};
use crate::domain::money::comma;
use crate::llm::{DealPromptInput, EnrichmentClient, EventContent, EventPromptInput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

pub const BRAND: &str = "밸롭 (BALLOP)";
pub const EVENT_PERIOD: &str = "2026년 3월 행사 기획";

const WINTER_KEYWORDS: [&str; 4] = ["플리스", "패딩", "윈터", "기모"];
const SUMMER_KEYWORDS: [&str; 7] = [
    "래쉬가드", "수영", "스윔", "비치타올", "워터팬츠", "워터레깅스", "드라이백",
];

const DEDUP_NOTE: &str = "각 상품은 하나의 행사에만 배정되어 가격 충돌이 없습니다. \
행사 기간이 겹치더라도 동일 상품이 다른 가격으로 노출되지 않습니다.";

/// Share of the total budget each guerrilla deal channel gets.
const GUERRILLA_CHANNEL_SHARE: f64 = 0.024;

pub struct GenerateOptions<'a> {
    pub enrichment: Option<&'a dyn EnrichmentClient>,
    pub total_marketing_budget: i64,
    /// Fixed seed for reproducible discount jitter.
    pub seed: Option<u64>,
}

impl Default for GenerateOptions<'_> {
    fn default() -> Self {
        GenerateOptions {
            enrichment: None,
            total_marketing_budget: crate::config::DEFAULT_TOTAL_MARKETING_BUDGET,
            seed: None,
        }
    }
}

/// Run the allocator over the analyzed catalog. Campaigns are generated in
/// selection order; each product lands in at most one campaign.
pub async fn generate(
    analytics: &Analytics,
    selection: &[EventType],
    opts: GenerateOptions<'_>,
) -> ScenarioBundle {
    let mut rng: StdRng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Duplicate selections collapse to the first occurrence.
    let mut seen: BTreeSet<&'static str> = BTreeSet::new();
    let selection: Vec<EventType> = selection
        .iter()
        .copied()
        .filter(|t| seen.insert(t.tag()))
        .collect();

    let mut assigned: BTreeSet<String> = BTreeSet::new();
    let gift_candidates = gift_candidates(&analytics.dead_stock);
    let category_diagnosis = diagnosis::diagnose(&analytics.categories);

    let mut events: Vec<Event> = Vec::new();
    for &event_type in &selection {
        if event_type == EventType::Guerrilla {
            let deals = guerrilla_deals(analytics, &mut assigned, &opts, &mut rng).await;
            events.extend(deals);
            continue;
        }

        let (products, total_inventory_value) =
            select_products(event_type, analytics, &assigned, &mut rng);
        for p in &products {
            assigned.insert(p.code.clone());
        }
        let event = assemble_event(
            event_type,
            products,
            total_inventory_value,
            analytics,
            &gift_candidates,
            &opts,
        )
        .await;
        events.push(event);
    }

    let summary = &analytics.summary;
    ScenarioBundle {
        generated_at: chrono::Utc::now(),
        brand: BRAND.to_string(),
        report_period: match &summary.date_range {
            Some(r) => format!(
                "{} ~ {} ({}일간 판매 데이터)",
                r.start, r.end, summary.sales_days
            ),
            None => format!("기간 정보 없음 ({}일간 판매 데이터)", summary.sales_days),
        },
        event_period: EVENT_PERIOD.to_string(),
        data_summary: DataSummaryEcho {
            total_products: summary.total_products,
            products_with_stock: summary.products_with_stock,
            total_stock_qty: summary.total_stock_qty,
            total_sales_qty: summary.total_sales_qty,
            total_revenue: summary.total_revenue,
            avg_daily_revenue: summary.avg_daily_revenue,
        },
        category_diagnosis,
        gift_candidates,
        deduplication: DedupSummary {
            total_assigned: assigned.len(),
            note: DEDUP_NOTE.to_string(),
        },
        events,
        overall_strategy: overall_strategy(&selection),
    }
}

fn is_summer_item(p: &ProductMetric) -> bool {
    p.category == Category::AquaSandals || SUMMER_KEYWORDS.iter().any(|k| p.name.contains(k))
}

/// Candidate selection and pricing for every non-guerrilla campaign type.
/// Returns the priced picks plus, for the dead-stock campaign, the total
/// inventory value tied up in them.
fn select_products(
    event_type: EventType,
    analytics: &Analytics,
    assigned: &BTreeSet<String>,
    rng: &mut StdRng,
) -> (Vec<ProductPromotion>, Option<i64>) {
    let allow_loss = tables::allows_loss(event_type);
    let price = |p: &ProductMetric, rng: &mut StdRng| {
        let (lo, hi) = tables::discount_band(event_type).unwrap_or((0.0, 0.0));
        pricing::build_product(p, pricing::vary_rate(lo, hi, p.margin_rate, rng), allow_loss)
    };

    let (prods, total_inventory_value) = match event_type {
        EventType::Main => {
            let top10 = analytics.top_sellers.iter().take(10);
            let extra_high = analytics
                .top_sellers
                .iter()
                .skip(10)
                .filter(|p| p.margin_rate > 55.0)
                .take(5);
            let prods: Vec<ProductPromotion> = top10
                .chain(extra_high)
                .filter(|p| !assigned.contains(&p.code))
                .map(|p| price(p, rng))
                .filter(|p| p.stock > 0 || p.sales_qty > 100)
                .collect();
            (prods, None)
        }
        EventType::Sub => {
            let prods: Vec<ProductPromotion> = analytics
                .top_sellers
                .iter()
                .skip(10)
                .take(20)
                .filter(|p| !assigned.contains(&p.code))
                .map(|p| price(p, rng))
                .filter(|p| p.stock > 0)
                .collect();
            (prods, None)
        }
        EventType::Season => {
            let mut spring: Vec<&ProductMetric> = analytics
                .products
                .iter()
                .filter(|p| p.stock > 0 && !assigned.contains(&p.code))
                .filter(|p| !WINTER_KEYWORDS.iter().any(|k| p.name.contains(k)))
                .filter(|p| {
                    p.category == Category::Sneakers
                        || p.category == Category::Trekking
                        || (p.category.is_apparel() && !is_summer_item(p))
                })
                .collect();
            spring.sort_by(|a, b| b.sales_qty.cmp(&a.sales_qty));
            spring.truncate(20);
            (spring.into_iter().map(|p| price(p, rng)).collect(), None)
        }
        EventType::OffSeason => {
            let mut summer: Vec<&ProductMetric> = analytics
                .products
                .iter()
                .filter(|p| p.stock > 0 && !assigned.contains(&p.code) && is_summer_item(p))
                .collect();
            summer.sort_by(|a, b| b.stock.cmp(&a.stock));
            summer.truncate(25);
            (summer.into_iter().map(|p| price(p, rng)).collect(), None)
        }
        EventType::NewProduct => {
            let mut candidates: Vec<&ProductMetric> = analytics
                .new_arrivals
                .iter()
                .filter(|p| p.stock > 50 && !assigned.contains(&p.code))
                .collect();
            candidates.sort_by(|a, b| b.stock.cmp(&a.stock));
            candidates.truncate(15);
            (
                candidates.into_iter().map(|p| price(p, rng)).collect(),
                None,
            )
        }
        EventType::DeadStock => {
            let mut dead: Vec<&ProductMetric> = analytics
                .dead_stock
                .iter()
                .filter(|p| p.stock > 50 && !assigned.contains(&p.code))
                .collect();
            dead.sort_by(|a, b| (b.stock * b.cost).cmp(&(a.stock * a.cost)));
            dead.truncate(30);
            let prods: Vec<ProductPromotion> = dead
                .into_iter()
                .map(|p| {
                    // Slower movers get steeper base discounts.
                    let base = if p.daily_sales_rate == 0.0 {
                        0.85
                    } else if p.daily_sales_rate < 0.5 {
                        0.80
                    } else {
                        0.70
                    };
                    let mut prod =
                        pricing::build_product(p, base + rng.gen::<f64>() * 0.05, allow_loss);
                    prod.inventory_value = Some(p.stock * p.cost);
                    prod.days_of_stock = Some(p.days_of_stock);
                    prod
                })
                .collect();
            let total: i64 = prods.iter().filter_map(|p| p.inventory_value).sum();
            (prods, Some(total))
        }
        // Handled by `guerrilla_deals`.
        EventType::Guerrilla => (Vec::new(), None),
    };

    let prods = match tables::margin_minimum(event_type) {
        Some(min) => pricing::margin_safe_filter(prods, min),
        None => prods,
    };
    (prods, total_inventory_value)
}

async fn assemble_event(
    event_type: EventType,
    products: Vec<ProductPromotion>,
    total_inventory_value: Option<i64>,
    analytics: &Analytics,
    gift_candidates: &[GiftCandidate],
    opts: &GenerateOptions<'_>,
) -> Event {
    let structure = tables::discount_structure(event_type);
    let duration = tables::duration(event_type);

    let mut enrichment = match opts.enrichment {
        Some(client) => {
            let input = EventPromptInput {
                event_type,
                product_names: products.iter().take(5).map(|p| p.name.clone()).collect(),
                discount_range: structure.range.clone(),
                summary: analytics.summary.clone(),
                trend: analytics.overall_trend.clone(),
            };
            match client.event_content(input).await {
                Ok(c) => c,
                Err(err) => {
                    tracing::warn!(
                        event = event_type.tag(),
                        error = %err,
                        "content enrichment failed; using static templates"
                    );
                    EventContent::default()
                }
            }
        }
        None => EventContent::default(),
    };

    let gifts = enrichment
        .gifts
        .take()
        .filter(|g| !g.tiers.is_empty())
        .unwrap_or_else(|| build_gifts(event_type, gift_candidates));
    let rewards = enrichment.rewards.take().unwrap_or_else(default_rewards);
    let marketing_budget = tables::calc_event_budget(event_type, opts.total_marketing_budget);
    let external_marketing = enrichment
        .external_marketing
        .take()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| {
            marketing_budget
                .channels
                .iter()
                .map(|c| ExternalMarketing {
                    channel: c.channel.clone(),
                    plan: "광고 집행".to_string(),
                    budget: Some(c.amount.clone()),
                    roas_target: Some(marketing_budget.roas_target.clone()),
                })
                .collect()
        });
    let kpi_targets = enrichment
        .kpi_targets
        .take()
        .map(Into::into)
        .unwrap_or_else(|| {
            tables::calc_kpi(&analytics.summary, &products, duration.days, event_type)
        });

    let mut event = Event {
        event_type,
        deal_number: None,
        title: String::new(),
        subtitle: String::new(),
        copy: Vec::new(),
        slogan: String::new(),
        marketing_ideas: Vec::new(),
        issue_strategy: IssueStrategy {
            description: String::new(),
            tactics: Vec::new(),
        },
        conversion_process: ConversionProcess::default(),
        discount_structure: structure,
        sections: tables::sections(event_type),
        duration,
        products,
        gifts,
        rewards,
        external_marketing,
        target_customer: tables::target_customer(event_type),
        marketing_budget,
        kpi_targets,
        total_inventory_value,
    };
    content::apply_content(&mut event, Some(enrichment));
    event
}

/// Five themed one-day flash deals drawn from the high-margin pool. Each
/// deal prefers products matching its theme keywords, falling back to the
/// top of the pool when nothing matches.
async fn guerrilla_deals(
    analytics: &Analytics,
    assigned: &mut BTreeSet<String>,
    opts: &GenerateOptions<'_>,
    rng: &mut StdRng,
) -> Vec<Event> {
    let mut pool: Vec<&ProductMetric> = analytics
        .high_margin
        .iter()
        .filter(|p| p.stock > 30 && p.tag_price > 0 && !assigned.contains(&p.code))
        .collect();
    pool.sort_by(|a, b| {
        b.margin_rate
            .partial_cmp(&a.margin_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut deals = Vec::new();
    for (i, theme) in content::GUERRILLA_THEMES.iter().enumerate() {
        let keywords = content::GUERRILLA_THEME_KEYWORDS[i];
        let mut items: Vec<&ProductMetric> = pool
            .iter()
            .copied()
            .filter(|p| {
                !assigned.contains(&p.code) && keywords.iter().any(|k| p.name.contains(k))
            })
            .collect();
        if items.is_empty() {
            items = pool
                .iter()
                .copied()
                .filter(|p| !assigned.contains(&p.code))
                .take(3)
                .collect();
        }
        items.truncate(3);

        let prods: Vec<ProductPromotion> = items
            .into_iter()
            .map(|p| {
                let rate = if p.margin_rate > 60.0 {
                    0.65 + rng.gen::<f64>() * 0.15
                } else if p.margin_rate > 45.0 {
                    0.55 + rng.gen::<f64>() * 0.10
                } else {
                    0.45 + rng.gen::<f64>() * 0.10
                };
                let mut prod = pricing::build_product(p, rate, false);
                prod.limit_per_person = Some(2);
                prod.deal_stock = Some(prod.stock.min(100));
                prod
            })
            .collect();
        let prods = pricing::margin_safe_filter(prods, 3.0);
        for p in &prods {
            assigned.insert(p.code.clone());
        }

        let deal_date = tables::march(tables::GUERRILLA_DEAL_DAYS[i]);
        let duration = Duration {
            start: deal_date,
            end: deal_date,
            days: 1,
        };

        let enrichment = match opts.enrichment {
            Some(client) => {
                let input = DealPromptInput {
                    theme: theme.to_string(),
                    product_names: prods.iter().map(|p| p.name.clone()).collect(),
                };
                match client.deal_content(input).await {
                    Ok(c) => Some(c),
                    Err(err) => {
                        tracing::warn!(
                            deal = i + 1,
                            error = %err,
                            "deal enrichment failed; using themed templates"
                        );
                        None
                    }
                }
            }
            None => None,
        };

        let mut structure = tables::discount_structure(EventType::Guerrilla);
        if !prods.is_empty() {
            let min = prods
                .iter()
                .map(|p| p.discount_rate)
                .fold(f64::INFINITY, f64::min);
            let max = prods
                .iter()
                .map(|p| p.discount_rate)
                .fold(f64::NEG_INFINITY, f64::max);
            structure.range = format!("{min:.0}~{max:.0}%");
        }

        let deal_budget = format!(
            "{}만원",
            comma(
                (opts.total_marketing_budget as f64 * GUERRILLA_CHANNEL_SHARE / 10_000.0).round()
                    as i64
            )
        );
        let kpi_targets = tables::calc_kpi(&analytics.summary, &prods, 1, EventType::Guerrilla);
        let total_deal_stock: i64 = prods.iter().filter_map(|p| p.deal_stock).sum();

        let mut event = Event {
            event_type: EventType::Guerrilla,
            deal_number: Some(i as u32 + 1),
            title: String::new(),
            subtitle: String::new(),
            copy: Vec::new(),
            slogan: String::new(),
            marketing_ideas: Vec::new(),
            issue_strategy: IssueStrategy {
                description: String::new(),
                tactics: Vec::new(),
            },
            conversion_process: ConversionProcess::default(),
            discount_structure: structure,
            sections: tables::sections(EventType::Guerrilla),
            duration,
            products: prods,
            gifts: GiftPlan {
                tiers: vec![GiftTier {
                    condition: "구매".to_string(),
                    gift: "밸롭 스티커".to_string(),
                }],
                note: String::new(),
            },
            rewards: Rewards {
                rate: "2%".to_string(),
                condition: "구매 고객".to_string(),
                bonus: None,
            },
            external_marketing: vec![
                ExternalMarketing {
                    channel: "카카오톡".to_string(),
                    plan: "긴급 딜 알림톡 (D-1, 당일 오전 10시)".to_string(),
                    budget: Some(deal_budget.clone()),
                    roas_target: None,
                },
                ExternalMarketing {
                    channel: "Instagram".to_string(),
                    plan: "스토리 카운트다운 + 릴스 예고".to_string(),
                    budget: Some(deal_budget),
                    roas_target: None,
                },
            ],
            target_customer: tables::target_customer(EventType::Guerrilla),
            marketing_budget: tables::calc_event_budget(
                EventType::Guerrilla,
                opts.total_marketing_budget,
            ),
            kpi_targets,
            total_inventory_value: None,
        };
        content::apply_guerrilla_content(&mut event, enrichment, i, total_deal_stock);
        deals.push(event);
    }
    deals
}

/// Low-cost overstocked unsold items offered as purchase incentives.
fn gift_candidates(dead_stock: &[ProductMetric]) -> Vec<GiftCandidate> {
    let mut pool: Vec<&ProductMetric> = dead_stock
        .iter()
        .filter(|p| p.stock > 200 && p.cost > 0 && p.cost < 5_000)
        .collect();
    pool.sort_by(|a, b| a.cost.cmp(&b.cost));
    pool.truncate(10);
    pool.into_iter()
        .map(|p| GiftCandidate {
            code: p.code.clone(),
            name: p.name.clone(),
            cost: p.cost,
            stock: p.stock,
            category: p.category,
        })
        .collect()
}

fn build_gifts(event_type: EventType, candidates: &[GiftCandidate]) -> GiftPlan {
    let mut tiers = Vec::new();
    if let Some(low) = candidates.iter().find(|g| g.cost < 3_000) {
        tiers.push(GiftTier {
            condition: "3만원 이상 구매".to_string(),
            gift: format!("{} 증정 (부진재고 소진 연계)", low.name),
        });
    }
    if let Some(mid) = candidates.iter().find(|g| g.cost >= 3_000) {
        tiers.push(GiftTier {
            condition: "7만원 이상 구매".to_string(),
            gift: format!("{} 증정 (부진재고 소진 연계)", mid.name),
        });
    }
    if event_type == EventType::Main {
        tiers.push(GiftTier {
            condition: "10만원 이상 구매".to_string(),
            gift: "밸롭 클리너 세트 + 양말 2족".to_string(),
        });
    }
    if tiers.is_empty() {
        tiers.push(GiftTier {
            condition: "5만원 이상".to_string(),
            gift: "밸롭 인솔 증정".to_string(),
        });
    }
    GiftPlan {
        tiers,
        note: if candidates.is_empty() {
            String::new()
        } else {
            format!(
                "※ 사은품은 부진재고({}종) 소진 연계 상품으로 구성",
                candidates.len()
            )
        },
    }
}

fn default_rewards() -> Rewards {
    Rewards {
        rate: "5%".to_string(),
        condition: "구매 고객".to_string(),
        bonus: Some("첫 구매 고객 추가 3% 적립".to_string()),
    }
}

fn overall_strategy(selection: &[EventType]) -> OverallStrategy {
    let titles = |wanted: &[EventType]| -> Vec<String> {
        selection
            .iter()
            .filter(|t| wanted.contains(t))
            .map(|t| content::fallback(*t).title.to_string())
            .collect()
    };

    let mut always_on = Vec::new();
    if selection.contains(&EventType::DeadStock) {
        always_on.push("악성재고 소진전 (주차별 할인율 상승)".to_string());
    }
    if selection.contains(&EventType::Guerrilla) {
        always_on.push("게릴라 원데이 딜 (3/5, 3/12, 3/19, 3/26, 3/30)".to_string());
    }

    let mut timeline = vec![
        StrategyPhase {
            period: "3/1~3/10".to_string(),
            phase: "Phase 1: 오프닝 빅세일".to_string(),
            events: titles(&[EventType::Main, EventType::Sub]),
            focus: "베스트셀러 중심 트래픽 유입, 봄 시즌 첫 인상 구축".to_string(),
        },
        StrategyPhase {
            period: "3/10~3/22".to_string(),
            phase: "Phase 2: 시즌 전환기".to_string(),
            events: titles(&[EventType::Season, EventType::OffSeason]),
            focus: "S/S 신시즌 프리뷰 + 역시즌 재고 소진 병행".to_string(),
        },
        StrategyPhase {
            period: "3/20~3/31".to_string(),
            phase: "Phase 3: 신상품 & 월말 마감".to_string(),
            events: titles(&[EventType::NewProduct]),
            focus: "신상품 런칭으로 브랜드 신선함 유지, 월말 마감 프로모션".to_string(),
        },
        StrategyPhase {
            period: "3/1~3/31".to_string(),
            phase: "상시 운영".to_string(),
            events: always_on,
            focus: "악성재고 점진적 소진 + 매주 이벤트로 재방문 유도".to_string(),
        },
    ];
    timeline.retain(|p| !p.events.is_empty());

    OverallStrategy {
        key_message: "밸롭 2026년 S/S 시즌 종합 프로모션 전략 — 3월 풀 플랜 + 4월 러프 플랜"
            .to_string(),
        timeline,
        april_plan: april_plan(),
        budget_allocation: BudgetAllocation {
            total: "700만원 (3월) / 800만원 (4월 예정)".to_string(),
            breakdown: vec![
                budget_line("Instagram/Facebook", "300만원", "43%"),
                budget_line("YouTube", "150만원", "21%"),
                budget_line("카카오톡", "100만원", "14%"),
                budget_line("네이버", "100만원", "14%"),
                budget_line("기타", "50만원", "7%"),
            ],
        },
    }
}

fn budget_line(channel: &str, amount: &str, share: &str) -> BudgetChannel {
    BudgetChannel {
        channel: channel.to_string(),
        share: share.to_string(),
        amount: amount.to_string(),
    }
}

fn april_plan() -> MonthlyRoughPlan {
    let phase = |period: &str, name: &str, ideas: &[&str]| RoughPhase {
        period: period.to_string(),
        name: name.to_string(),
        ideas: ideas.iter().map(|s| s.to_string()).collect(),
    };
    MonthlyRoughPlan {
        title: "4월 러프 플랜 — 밸롭 2026 S/S 본격 시즌".to_string(),
        phases: vec![
            phase(
                "4/1~4/10",
                "S/S 본격 오픈",
                &[
                    "봄 신상품 풀 라인업 공개 + 룩북 캠페인",
                    "아웃도어/트레킹 카테고리 강화 (등산 시즌 시작)",
                    "3월 베스트셀러 리오더 + 컬러 추가 출시",
                    "봄맞이 러닝/워킹 챌린지 SNS 캠페인",
                ],
            ),
            phase(
                "4/11~4/20",
                "멤버십 위크 / 고객 감사",
                &[
                    "자사몰 회원 등급별 전용 할인 (VIP 추가 10%)",
                    "리뷰 적립금 2배 이벤트",
                    "친구 초대 프로모션 (초대 1건당 3,000원 적립)",
                    "장바구니 쿠폰 리마인드 캠페인",
                ],
            ),
            phase(
                "4/21~4/30",
                "어린이날/가정의달 프리 시즌",
                &[
                    "가족 세트 구성 할인 (키즈+성인 묶음)",
                    "어린이날 선물 기획전 (키즈 라인 집중)",
                    "아쿠아슈즈/샌들 얼리 시즌 티저 (5월 대비)",
                    "3월 악성재고 잔여분 파이널 클리어런스",
                ],
            ),
        ],
        budget_note: "3월 성과 기반 채널별 ROAS 분석 후 4월 예산 재배분 예정".to_string(),
        key_metrics: vec![
            "3월 대비 매출 +20% 성장 목표".to_string(),
            "신규 고객 비율 30% 이상 유지".to_string(),
            "재구매율 15% → 20% 개선".to_string(),
            "아쿠아/샌들 카테고리 5월 시즌 대비 사전 수요 확보".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::analyze;
    use crate::ingest::types::{SalesRow, StockRow};
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

    fn sale(day: u32, code: &str, qty: i64, unit_cost: i64, amount: i64) -> SalesRow {
        SalesRow {
            date: NaiveDate::from_ymd_opt(2026, 2, day),
            code: code.to_string(),
            color: "BLACK".to_string(),
            size: "270".to_string(),
            tag_price: 0,
            unit_cost,
            qty,
            amount,
        }
    }

    /// Catalog with best sellers, dead stock, a summer item and a planned
    /// new arrival, sold over a 10-day window.
    fn fixture() -> Analytics {
        let mut stocks = Vec::new();
        let mut sales = Vec::new();

        // 12 best-selling sneakers; unit sale price 9,000 over cost 4,000
        // puts their margin just over 55%.
        for i in 0..12i64 {
            let code = format!("S{:02}", i + 1);
            stocks.push(stock(&code, &format!("데일리 스니커즈 {:02}", i + 1), 10_000, 4_000, 500));
            for day in 1..=10u32 {
                let qty = 20 - i;
                sales.push(sale(day, &code, qty, 4_000, qty * 9_000));
            }
        }

        // Dead stock: gift-candidate socks and a bulky winter jacket.
        stocks.push(stock("D01", "쿠션 양말 세트", 3_000, 1_000, 300));
        stocks.push(stock("D02", "창고 패딩 자켓", 60_000, 20_000, 400));

        // Summer item with light sales.
        stocks.push(stock("A01", "아쿠아슈즈 워터", 15_000, 5_000, 150));
        for day in 1..=10u32 {
            sales.push(sale(day, "A01", 2, 5_000, 2 * 10_000));
        }

        // Planned new arrival, kept under the dead-stock threshold.
        stocks.push(StockRow {
            plan_type: "기획".to_string(),
            ..stock("N01", "신형 러닝화 카본", 90_000, 30_000, 80)
        });

        analyze(&stocks, &sales)
    }

    fn opts(seed: u64) -> GenerateOptions<'static> {
        GenerateOptions {
            seed: Some(seed),
            ..GenerateOptions::default()
        }
    }

    #[tokio::test]
    async fn allocation_is_disjoint_across_events() {
        let analytics = fixture();
        let bundle = generate(&analytics, &EventType::ALL, opts(1)).await;

        let mut seen = BTreeSet::new();
        let mut total = 0usize;
        for event in &bundle.events {
            for p in &event.products {
                assert!(seen.insert(p.code.clone()), "{} allocated twice", p.code);
                total += 1;
            }
        }
        assert_eq!(bundle.deduplication.total_assigned, total);
        assert!(total > 0);
    }

    #[tokio::test]
    async fn main_prices_stay_in_band_on_100_won_grid() {
        let analytics = fixture();
        let bundle = generate(&analytics, &[EventType::Main], opts(2)).await;

        let main = &bundle.events[0];
        assert_eq!(main.event_type, EventType::Main);
        assert!(!main.products.is_empty());
        for p in &main.products {
            assert_eq!(p.event_price % 100, 0);
            // 40~60% off tag 10,000, margin floor at cost 4,000 x 1.1.
            assert!(p.event_price >= 4_000 && p.event_price <= 6_000, "{}", p.event_price);
            assert!(p.expected_margin >= 5.0);
            assert!(!p.below_bep);
        }
    }

    #[tokio::test]
    async fn duplicate_selection_entries_collapse() {
        let analytics = fixture();
        let bundle = generate(&analytics, &[EventType::Main, EventType::Main], opts(3)).await;
        assert_eq!(bundle.events.len(), 1);
    }

    #[tokio::test]
    async fn static_templates_apply_without_enrichment() {
        let analytics = fixture();
        let bundle = generate(&analytics, &[EventType::Main], opts(4)).await;

        let main = &bundle.events[0];
        let fb = content::fallback(EventType::Main);
        assert_eq!(main.title, fb.title);
        assert_eq!(main.subtitle, fb.subtitle);
        assert_eq!(main.slogan, fb.slogan);
        assert_eq!(main.copy, fb.copy);
        assert_eq!(main.marketing_ideas, fb.marketing_ideas);
        assert_eq!(main.issue_strategy.description, fb.issue_description);
        assert_eq!(main.issue_strategy.tactics, fb.issue_tactics);
        assert_eq!(main.rewards.rate, "5%");
        assert!(main.kpi_targets.calculation_basis.is_some());
        assert!(!main.conversion_process.steps.is_empty());
        assert_eq!(main.external_marketing.len(), 4);
    }

    #[tokio::test]
    async fn seeded_runs_are_reproducible() {
        let analytics = fixture();
        let a = generate(&analytics, &EventType::ALL, opts(7)).await;
        let b = generate(&analytics, &EventType::ALL, opts(7)).await;
        assert_eq!(
            serde_json::to_value(&a.events).unwrap(),
            serde_json::to_value(&b.events).unwrap()
        );
    }

    #[tokio::test]
    async fn guerrilla_emits_numbered_one_day_deals() {
        let analytics = fixture();
        let bundle = generate(&analytics, &[EventType::Guerrilla], opts(5)).await;

        assert_eq!(bundle.events.len(), 5);
        for (i, deal) in bundle.events.iter().enumerate() {
            assert_eq!(deal.event_type, EventType::Guerrilla);
            assert_eq!(deal.deal_number, Some(i as u32 + 1));
            assert_eq!(deal.duration.days, 1);
            assert!(deal.products.len() <= 3);
            for p in &deal.products {
                assert_eq!(p.limit_per_person, Some(2));
                assert_eq!(p.deal_stock, Some(p.stock.min(100)));
            }
        }
        assert_eq!(
            bundle.events[0].duration.start,
            NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()
        );
    }

    #[tokio::test]
    async fn dead_stock_allows_below_cost_and_reports_inventory_value() {
        let analytics = fixture();
        let bundle = generate(&analytics, &[EventType::DeadStock], opts(6)).await;

        let event = &bundle.events[0];
        assert_eq!(
            event.total_inventory_value,
            Some(300 * 1_000 + 400 * 20_000)
        );
        assert!(event.products.iter().all(|p| p.inventory_value.is_some()));
        // 85~90% off a 3,000-won tag lands under the 1,000-won cost.
        let socks = event
            .products
            .iter()
            .find(|p| p.code == "D01")
            .expect("socks allocated");
        assert!(socks.below_bep);
    }

    #[tokio::test]
    async fn gift_tiers_pull_from_dead_stock_candidates() {
        let analytics = fixture();
        let bundle = generate(&analytics, &[EventType::Main], opts(8)).await;

        assert_eq!(bundle.gift_candidates.len(), 1);
        assert_eq!(bundle.gift_candidates[0].code, "D01");

        let gifts = &bundle.events[0].gifts;
        assert!(gifts.tiers[0].gift.contains("쿠션 양말 세트"));
        assert_eq!(gifts.tiers[0].condition, "3만원 이상 구매");
        assert!(gifts
            .tiers
            .iter()
            .any(|t| t.condition == "10만원 이상 구매"));
        assert!(gifts.note.contains("1종"));
    }

    #[tokio::test]
    async fn timeline_phases_follow_selection() {
        let analytics = fixture();
        let bundle = generate(
            &analytics,
            &[EventType::Main, EventType::DeadStock],
            opts(9),
        )
        .await;

        let timeline = &bundle.overall_strategy.timeline;
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].events, vec!["밸롭 봄맞이 빅 세일"]);
        assert_eq!(timeline[1].phase, "상시 운영");
    }
}
