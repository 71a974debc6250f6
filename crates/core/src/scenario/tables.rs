use crate::domain::event::{
    BudgetChannel, BundleDeal, DiscountStructure, DiscountTier, Duration, EventType, KpiTargets,
    MarketingBudget, ProductPromotion, Section, TargetCustomer, WeeklyDiscount,
};
use crate::domain::metrics::SalesSummary;
use crate::domain::money::{comma, manwon, won};
use chrono::NaiveDate;

/// Traffic boost multiplier applied to the historical daily revenue
/// (e-commerce benchmark figures per campaign type).
pub fn boost_multiplier(event_type: EventType) -> f64 {
    match event_type {
        EventType::Main => 2.5,
        EventType::Sub => 1.4,
        EventType::Season => 1.8,
        EventType::OffSeason => 1.3,
        EventType::NewProduct => 1.5,
        EventType::Guerrilla => 3.0,
        EventType::DeadStock => 1.2,
    }
}

/// Conversion-rate benchmark per campaign type, percent.
pub fn cvr_benchmark(event_type: EventType) -> f64 {
    match event_type {
        EventType::Main => 3.5,
        EventType::Sub => 2.8,
        EventType::Season => 3.0,
        EventType::OffSeason => 2.5,
        EventType::NewProduct => 2.2,
        EventType::Guerrilla => 6.0,
        EventType::DeadStock => 4.0,
    }
}

/// Share of the total marketing budget. Sums to 1.0 across all types.
pub fn budget_share(event_type: EventType) -> f64 {
    match event_type {
        EventType::Main => 0.30,
        EventType::Sub => 0.08,
        EventType::Season => 0.18,
        EventType::OffSeason => 0.10,
        EventType::NewProduct => 0.15,
        EventType::Guerrilla => 0.12,
        EventType::DeadStock => 0.07,
    }
}

pub fn roas_target(event_type: EventType) -> &'static str {
    match event_type {
        EventType::Guerrilla => "ROAS 800%+",
        EventType::DeadStock => "ROAS 300%+ (재고 소진 우선)",
        EventType::Main => "ROAS 500%+",
        _ => "ROAS 400%+",
    }
}

/// Nominal [min, max] discount band. Guerrilla and dead stock use their own
/// tiered / velocity-escalated schemes instead.
pub fn discount_band(event_type: EventType) -> Option<(f64, f64)> {
    match event_type {
        EventType::Main => Some((0.40, 0.60)),
        EventType::Sub => Some((0.30, 0.45)),
        EventType::Season => Some((0.20, 0.35)),
        EventType::OffSeason => Some((0.50, 0.70)),
        EventType::NewProduct => Some((0.10, 0.20)),
        EventType::Guerrilla | EventType::DeadStock => None,
    }
}

/// Minimum acceptable expected margin, percent. Dead stock skips the filter
/// entirely because it allows below-cost pricing.
pub fn margin_minimum(event_type: EventType) -> Option<f64> {
    match event_type {
        EventType::Main => Some(5.0),
        EventType::Sub => Some(8.0),
        EventType::Season => Some(10.0),
        EventType::OffSeason => Some(3.0),
        EventType::NewProduct => Some(10.0),
        EventType::Guerrilla => Some(3.0),
        EventType::DeadStock => None,
    }
}

pub fn allows_loss(event_type: EventType) -> bool {
    matches!(event_type, EventType::DeadStock)
}

/// Day-of-month slots for the five guerrilla one-day deals (March 2026).
pub const GUERRILLA_DEAL_DAYS: [u32; 5] = [5, 12, 19, 26, 30];

pub const EVENT_MONTH_YEAR: i32 = 2026;
pub const EVENT_MONTH: u32 = 3;

/// Calendar of the campaign month, indexed by day minus one. Built at
/// compile time, so every lookup below always has a valid date.
static MARCH_2026: [NaiveDate; 31] = {
    let mut dates = [NaiveDate::MIN; 31];
    let mut i = 0;
    while i < dates.len() {
        dates[i] = match NaiveDate::from_ymd_opt(EVENT_MONTH_YEAR, EVENT_MONTH, i as u32 + 1) {
            Some(d) => d,
            None => panic!("campaign month has 31 days"),
        };
        i += 1;
    }
    dates
};

pub fn march(day: u32) -> NaiveDate {
    MARCH_2026[(day as usize).clamp(1, MARCH_2026.len()) - 1]
}

pub fn duration(event_type: EventType) -> Duration {
    let (start, end, days) = match event_type {
        EventType::Main => (1, 10, 10),
        EventType::Sub => (1, 15, 15),
        EventType::Season => (10, 22, 13),
        EventType::OffSeason => (12, 25, 14),
        EventType::NewProduct => (20, 31, 12),
        // Individual guerrilla deals override this with their 1-day window.
        EventType::Guerrilla => (GUERRILLA_DEAL_DAYS[0], GUERRILLA_DEAL_DAYS[0], 1),
        EventType::DeadStock => (1, 31, 31),
    };
    Duration {
        start: march(start),
        end: march(end),
        days,
    }
}

fn tier(condition: &str, discount: &str) -> DiscountTier {
    DiscountTier {
        condition: condition.to_string(),
        discount: discount.to_string(),
    }
}

pub fn discount_structure(event_type: EventType) -> DiscountStructure {
    let mut s = DiscountStructure {
        kind: String::new(),
        range: String::new(),
        basis: "TAG가 기준".to_string(),
        tiers: Vec::new(),
        weekly_escalation: Vec::new(),
        bundle_types: Vec::new(),
        note: None,
        quantity_limit: None,
    };

    match event_type {
        EventType::Main => {
            s.kind = "정률 할인".to_string();
            s.range = "40~60%".to_string();
            s.tiers = vec![
                tier("마진율 60% 이상", "55~60%"),
                tier("마진율 45~60%", "45~55%"),
                tier("마진율 45% 미만", "40~45%"),
                tier("2개 이상 구매", "추가 5%"),
                tier("5만원 이상 구매", "무료배송+사은품"),
            ];
        }
        EventType::Sub => {
            s.kind = "정률 할인".to_string();
            s.range = "30~45%".to_string();
            s.tiers = vec![
                tier("마진율 60% 이상", "40~45%"),
                tier("마진율 45~60%", "35~40%"),
                tier("마진율 45% 미만", "30~35%"),
                tier("3개 이상 구매", "사은품 증정"),
            ];
        }
        EventType::Season => {
            s.kind = "시즌 프리뷰 특별가".to_string();
            s.range = "20~35%".to_string();
            s.tiers = vec![
                tier("마진율 55% 이상", "30~35%"),
                tier("마진율 40~55%", "25~30%"),
                tier("마진율 40% 미만", "20~25%"),
            ];
        }
        EventType::OffSeason => {
            s.kind = "역시즌 특별 할인".to_string();
            s.range = "50~70%".to_string();
            s.tiers = vec![
                tier("마진율 60% 이상", "60~70%"),
                tier("마진율 45~60%", "55~65%"),
                tier("마진율 45% 미만", "50~55%"),
            ];
            s.note = Some("여름 시즌 대비 선구매 최저가 보장".to_string());
        }
        EventType::NewProduct => {
            s.kind = "런칭 프로모션".to_string();
            s.range = "10~20%".to_string();
            s.tiers = vec![
                tier("마진율 55% 이상", "18~20%"),
                tier("마진율 40~55%", "15~18%"),
                tier("마진율 40% 미만", "10~15%"),
            ];
        }
        EventType::Guerrilla => {
            s.kind = "플래시 세일".to_string();
            s.range = "60~80%".to_string();
            s.quantity_limit = Some(2);
        }
        EventType::DeadStock => {
            s.kind = "재고 소진 초대폭 할인 (원가 이하 허용)".to_string();
            s.range = "70~90%".to_string();
            s.weekly_escalation = vec![
                WeeklyDiscount { week: 1, discount: "70~80%".to_string() },
                WeeklyDiscount { week: 2, discount: "80~85%".to_string() },
                WeeklyDiscount { week: 3, discount: "85~90%".to_string() },
                WeeklyDiscount { week: 4, discount: "85~90% + 1+1".to_string() },
            ];
            s.bundle_types = vec![
                BundleDeal {
                    kind: "1+1".to_string(),
                    condition: "동일 상품 2개 구매 시 1개 가격".to_string(),
                },
                BundleDeal {
                    kind: "3개 묶음".to_string(),
                    condition: "3개 묶음 구매 시 추가 10% 할인".to_string(),
                },
            ];
            s.note = Some("원가 이하 판매 허용".to_string());
        }
    }
    s
}

fn section(kind: &str, title: &str, description: &str) -> Section {
    Section {
        kind: kind.to_string(),
        title: title.to_string(),
        description: description.to_string(),
    }
}

pub fn sections(event_type: EventType) -> Vec<Section> {
    match event_type {
        EventType::Main => vec![
            section("hero", "히어로 배너", "풀스크린 메인 비주얼 + 카운트다운"),
            section("bestSeller", "BEST TOP 10", "베스트셀러 대형 카드 그리드"),
            section("reviews", "고객 리뷰", "포토 리뷰 캐러셀"),
            section("benefits", "혜택 안내", "사은품/적립금 인포그래픽"),
            section("timeDeal", "타임딜", "시간 한정 특가 (매일 교체)"),
        ],
        EventType::Sub => vec![
            section("recommendation", "추천 상품", "카테고리별 추천 그리드"),
            section("styling", "스타일링 팁", "착용 이미지 코디 제안"),
            section("bundle", "묶음 혜택", "3개 구매 시 사은품 안내"),
        ],
        EventType::Season => vec![
            section("lookbook", "S/S LOOKBOOK", "시즌 화보 비주얼"),
            section("sneakers", "봄 스니커즈", "스니커즈/운동화 그리드"),
            section("apparel", "경량 의류", "봄 의류 추천"),
        ],
        EventType::OffSeason => vec![
            section("hero", "역시즌 히어로", "여름 무드 + 가격 비교 배너"),
            section("priceDiff", "가격 비교", "정시즌 vs 역시즌 비교표"),
            section("categories", "카테고리별", "아쿠아/샌들/슬리퍼 탭"),
        ],
        EventType::NewProduct => vec![
            section("hero", "NEW ARRIVAL", "신상품 비주얼 + 카운트다운"),
            section("showcase", "라인업", "각 제품 상세 카드"),
            section("earlyBird", "얼리버드 혜택", "첫 구매 전용 혜택"),
        ],
        EventType::Guerrilla => vec![section("flashDeal", "오늘의 딜", "카운트다운 + 즉시 구매")],
        EventType::DeadStock => vec![
            section("hero", "라스트 찬스!", "최종 세일 비주얼"),
            section("clearance", "초특가", "가격순 + 재고 게이지"),
            section("bundle", "묶음 특가", "1+1 / 3개 묶음"),
        ],
    }
}

pub fn target_customer(event_type: EventType) -> TargetCustomer {
    let (primary, behavior, new_vs_return, key_channel) = match event_type {
        EventType::Main => (
            "25~44세 남녀, 자사몰 기존 구매 고객 + 가격 민감형 신규",
            "할인 알림 반응률 높은 기존 고객 재구매 유도",
            "기존 60% / 신규 40%",
            "카카오톡 플친 + Instagram 리타게팅",
        ),
        EventType::Sub => (
            "30~49세, 메인 행사 유입 후 추가 탐색 고객",
            "메인 행사 페이지 이탈 고객 중 장바구니 미완료자",
            "기존 70% / 신규 30%",
            "장바구니 이탈 리타게팅 + 카테고리 추천 메일",
        ),
        EventType::Season => (
            "20~35세 트렌드 민감층, 봄 아웃도어 활동 관심층",
            "시즌 초 신상 탐색 및 얼리어답터 성향",
            "기존 40% / 신규 60%",
            "Instagram 룩북 광고 + 네이버 봄 시즌 검색 광고",
        ),
        EventType::OffSeason => (
            "30~50대 가격 합리적 소비층, 대가족",
            "역시즌 할인에 반응하는 계획적 구매자",
            "기존 50% / 신규 50%",
            "네이버 카페/블로그 리뷰 + 카카오톡 알림",
        ),
        EventType::NewProduct => (
            "20~30대, 밸롭 팬층 + 스포츠 관심 신규",
            "신상 런칭에 반응, SNS 공유 활발",
            "기존 35% / 신규 65%",
            "Instagram/TikTok 인플루언서 + YouTube 쇼츠",
        ),
        EventType::Guerrilla => (
            "전연령, 자사몰 앱/알림 수신 동의 고객",
            "즉각적 구매 결정, FOMO 반응형",
            "기존 80% / 신규 20%",
            "앱 푸시 + 카카오 알림톡 + SMS",
        ),
        EventType::DeadStock => (
            "가격 최우선 고객, 중고 거래 플랫폼 이용자",
            "극저가에 반응, 대량 구매 성향",
            "기존 30% / 신규 70%",
            "당근마켓 광고 + 네이버 최저가 검색",
        ),
    };
    TargetCustomer {
        primary: primary.to_string(),
        behavior: behavior.to_string(),
        new_vs_return: new_vs_return.to_string(),
        key_channel: key_channel.to_string(),
    }
}

/// Data-driven KPI projection with a human-readable calculation basis.
pub fn calc_kpi(
    summary: &SalesSummary,
    products: &[ProductPromotion],
    event_days: i64,
    event_type: EventType,
) -> KpiTargets {
    let avg_daily_rev = summary.avg_daily_revenue.max(0);
    let avg_order_value = summary.total_revenue / summary.total_sales_qty.max(1);

    let boost = boost_multiplier(event_type);
    let cvr = cvr_benchmark(event_type);

    let expected_daily_rev = (avg_daily_rev as f64 * boost).round() as i64;
    let expected_revenue = expected_daily_rev * event_days;
    let event_avg_price = if products.is_empty() {
        avg_order_value
    } else {
        (products.iter().map(|p| p.event_price).sum::<i64>() as f64 / products.len() as f64)
            .round() as i64
    };
    let expected_orders =
        (expected_revenue as f64 / event_avg_price.max(1) as f64).round() as i64;

    let basis = format!(
        "일평균 매출 {}만원 × 부스트 {}배 × {}일 = {}만원 (CVR {}% 기준, 평균 객단가 {})",
        comma((avg_daily_rev as f64 / 10_000.0).round() as i64),
        fmt_rate(boost),
        event_days,
        comma((expected_revenue as f64 / 10_000.0).round() as i64),
        fmt_rate(cvr),
        won(event_avg_price),
    );

    KpiTargets {
        expected_revenue: manwon(expected_revenue),
        expected_orders,
        conversion_rate: format!("{}%", fmt_rate(cvr)),
        avg_order_value: won(event_avg_price),
        calculation_basis: Some(basis),
    }
}

/// Budget for one campaign: its fixed share of the total, split 45/25/20/10
/// across the four fixed channels.
pub fn calc_event_budget(event_type: EventType, total_budget: i64) -> MarketingBudget {
    let share = budget_share(event_type);
    // Amount in 만원 units.
    let amount = (total_budget as f64 * share / 10_000.0).round() as i64;

    let channel = |name: &str, pct: u32| BudgetChannel {
        channel: name.to_string(),
        share: format!("{pct}%"),
        amount: format!("{}만원", comma((amount as f64 * pct as f64 / 100.0).round() as i64)),
    };

    MarketingBudget {
        amount: format!("{}만원", comma(amount)),
        share: format!("{}%", (share * 100.0).round() as i64),
        channels: vec![
            channel("Instagram/Facebook", 45),
            channel("카카오톡", 25),
            channel("네이버", 20),
            channel("기타(YouTube/TikTok)", 10),
        ],
        roas_target: roas_target(event_type).to_string(),
    }
}

/// "2.5" for fractional rates, "3" for whole ones.
fn fmt_rate(x: f64) -> String {
    if x.fract() == 0.0 {
        format!("{}", x as i64)
    } else {
        format!("{x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(avg_daily_revenue: i64) -> SalesSummary {
        SalesSummary {
            total_products: 100,
            products_with_stock: 80,
            total_stock_qty: 5_000,
            total_sales_qty: 1_000,
            total_revenue: 30_000_000,
            avg_daily_sales_qty: 50.0,
            avg_daily_revenue,
            date_range: None,
            sales_days: 20,
            return_count: 12,
        }
    }

    #[test]
    fn march_days_map_onto_the_campaign_calendar() {
        assert_eq!(march(1), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(march(31), NaiveDate::from_ymd_opt(2026, 3, 31).unwrap());
        // Out-of-range days clamp to the month boundaries.
        assert_eq!(march(0), march(1));
        assert_eq!(march(40), march(31));
    }

    #[test]
    fn budget_shares_cover_the_whole_budget() {
        let total: f64 = EventType::ALL.into_iter().map(budget_share).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn budget_splits_across_fixed_channels() {
        let b = calc_event_budget(EventType::Main, 7_000_000);
        assert_eq!(b.amount, "210만원");
        assert_eq!(b.share, "30%");
        assert_eq!(b.channels.len(), 4);
        assert_eq!(b.channels[0].amount, "95만원");
        assert_eq!(b.channels[1].amount, "53만원");
        assert_eq!(b.roas_target, "ROAS 500%+");
    }

    #[test]
    fn kpi_multiplication_chain() {
        // 1,000,000/day x 2.5 boost x 10 days = 25,000,000.
        let s = summary(1_000_000);
        let kpi = calc_kpi(&s, &[], 10, EventType::Main);
        assert_eq!(kpi.expected_revenue, "2,500만원");
        // No products: falls back to the historical order value (30,000).
        assert_eq!(kpi.avg_order_value, "30,000원");
        assert_eq!(kpi.expected_orders, 833);
        assert_eq!(kpi.conversion_rate, "3.5%");
        let basis = kpi.calculation_basis.unwrap();
        assert!(basis.contains("부스트 2.5배"));
        assert!(basis.contains("2,500만원"));
    }

    #[test]
    fn guerrilla_has_the_highest_boost_and_cvr() {
        for t in EventType::ALL {
            assert!(boost_multiplier(EventType::Guerrilla) >= boost_multiplier(t));
            assert!(cvr_benchmark(EventType::Guerrilla) >= cvr_benchmark(t));
        }
    }

    #[test]
    fn only_dead_stock_allows_loss() {
        for t in EventType::ALL {
            assert_eq!(allows_loss(t), t == EventType::DeadStock);
            assert_eq!(margin_minimum(t).is_none(), t == EventType::DeadStock);
        }
    }

    #[test]
    fn durations_are_day_counted() {
        let d = duration(EventType::Main);
        assert_eq!(d.days, 10);
        assert_eq!((d.end - d.start).num_days() + 1, d.days);
    }
}
