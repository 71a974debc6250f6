//! Self-contained HTML report renderer. Everything is rendered server-side
//! from the analytics bundle and the allocator output; the document carries
//! no external assets and all dynamic text is escaped.

use crate::domain::diagnosis::CategoryDiagnosis;
use crate::domain::event::{Event, EventType, ScenarioBundle};
use crate::domain::metrics::{Analytics, ProductMetric};
use crate::domain::money::{comma, manwon, won};

const STYLE: &str = r#"
:root{--bg:#101014;--panel:#1a1a20;--border:#2a2a32;--text:#e4e4e7;--muted:#a1a1aa;--primary:#FF6B35}
*{box-sizing:border-box;margin:0;padding:0}
body{background:var(--bg);color:var(--text);font-family:'Pretendard','Apple SD Gothic Neo',sans-serif;line-height:1.6;padding:32px}
.wrap{max-width:1100px;margin:0 auto}
h1{font-size:26px;margin-bottom:4px}
h2{font-size:19px;margin:36px 0 14px;border-left:3px solid var(--primary);padding-left:10px}
h3{font-size:16px;margin:18px 0 8px}
h4{font-size:13px;color:var(--muted);margin-bottom:6px}
.sub{color:var(--muted);font-size:13px}
.kpi-grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(160px,1fr));gap:12px;margin-top:14px}
.kpi-card{background:var(--panel);border:1px solid var(--border);border-radius:10px;padding:14px}
.kpi-card .label{font-size:12px;color:var(--muted)}
.kpi-card .value{font-size:20px;font-weight:700;margin-top:4px}
table{width:100%;border-collapse:collapse;font-size:13px;margin-top:10px}
th,td{padding:7px 9px;border-bottom:1px solid var(--border);text-align:left}
th{color:var(--muted);font-weight:600;font-size:12px}
.text-right{text-align:right}
.tag{display:inline-block;font-size:11px;padding:2px 8px;border-radius:999px;border:1px solid}
.event{background:var(--panel);border:1px solid var(--border);border-radius:12px;padding:20px;margin:18px 0}
.event-head{display:flex;align-items:baseline;gap:10px;flex-wrap:wrap}
.copy{color:var(--muted);font-size:13px;margin:10px 0;padding-left:14px;border-left:2px solid var(--border)}
.slogan{font-style:italic;color:var(--primary);margin:8px 0}
.info-grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(240px,1fr));gap:12px;margin-top:12px}
.info-card{background:var(--bg);border:1px solid var(--border);border-radius:8px;padding:12px;font-size:13px}
.info-card ul{padding-left:16px}
.phase{background:var(--panel);border:1px solid var(--border);border-radius:10px;padding:14px;margin:10px 0}
.status-critical{color:#ef4444}.status-warning{color:#f59e0b}.status-caution{color:#eab308}
.status-low_stock{color:#06b6d4}.status-healthy{color:#22c55e}
"#;

fn event_color(t: EventType) -> &'static str {
    match t {
        EventType::Main => "#FF6B35",
        EventType::Sub => "#8B5CF6",
        EventType::Season => "#06B6D4",
        EventType::OffSeason => "#F59E0B",
        EventType::NewProduct => "#EC4899",
        EventType::Guerrilla => "#EF4444",
        EventType::DeadStock => "#6B7280",
    }
}

pub fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn pct(x: f64) -> String {
    format!("{x:.1}%")
}

/// Render the full report document.
pub fn render(analytics: &Analytics, bundle: &ScenarioBundle) -> String {
    let mut h = String::with_capacity(64 * 1024);
    h.push_str("<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n<meta charset=\"utf-8\">\n");
    h.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    h.push_str(&format!(
        "<title>{} 행사 기획 리포트</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<div class=\"wrap\">\n",
        esc(&bundle.brand)
    ));

    h.push_str(&format!(
        "<h1>{} — {}</h1>\n<p class=\"sub\">{} · 생성 {}</p>\n",
        esc(&bundle.brand),
        esc(&bundle.event_period),
        esc(&bundle.report_period),
        bundle.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    summary_cards(&mut h, analytics);
    weekly_table(&mut h, analytics);
    category_diagnosis_table(&mut h, &bundle.category_diagnosis);
    top_sellers_table(&mut h, analytics);

    h.push_str("<h2>행사 기획</h2>\n");
    h.push_str(&format!(
        "<p class=\"sub\">{} · 배정 상품 {}개</p>\n",
        esc(&bundle.deduplication.note),
        comma(bundle.deduplication.total_assigned as i64)
    ));
    for event in &bundle.events {
        event_section(&mut h, event);
    }

    gift_candidates_table(&mut h, bundle);
    strategy_section(&mut h, bundle);

    h.push_str("</div>\n</body>\n</html>\n");
    h
}

fn summary_cards(h: &mut String, analytics: &Analytics) {
    let s = &analytics.summary;
    h.push_str("<h2>판매 데이터 요약</h2>\n<div class=\"kpi-grid\">\n");
    let card = |label: &str, value: String, sub: &str| {
        format!(
            "<div class=\"kpi-card\"><div class=\"label\">{}</div><div class=\"value\">{}</div><div class=\"sub\">{}</div></div>\n",
            esc(label),
            esc(&value),
            esc(sub)
        )
    };
    h.push_str(&card("총 매출", manwon(s.total_revenue), "분석 기간 전체"));
    h.push_str(&card(
        "총 판매 수량",
        format!("{}개", comma(s.total_sales_qty)),
        &format!("반품 {}건 반영", comma(s.return_count)),
    ));
    h.push_str(&card(
        "일평균 매출",
        manwon(s.avg_daily_revenue),
        &format!("{}일간 판매 데이터", s.sales_days),
    ));
    h.push_str(&card(
        "등록 상품",
        format!("{}종", comma(s.total_products as i64)),
        &format!("재고 보유 {}종", comma(s.products_with_stock as i64)),
    ));
    h.push_str(&card(
        "총 재고 수량",
        format!("{}개", comma(s.total_stock_qty)),
        &format!("매출 트렌드 {}", analytics.overall_trend),
    ));
    h.push_str("</div>\n");
}

fn weekly_table(h: &mut String, analytics: &Analytics) {
    if analytics.weekly_trends.is_empty() {
        return;
    }
    h.push_str("<h2>주차별 매출 추이</h2>\n<table>\n<tr><th>주차</th><th class=\"text-right\">일수</th><th class=\"text-right\">수량</th><th class=\"text-right\">매출</th><th class=\"text-right\">일평균 매출</th><th class=\"text-right\">전주 대비</th></tr>\n");
    for w in &analytics.weekly_trends {
        h.push_str(&format!(
            "<tr><td>{}</td><td class=\"text-right\">{}</td><td class=\"text-right\">{}</td><td class=\"text-right\">{}</td><td class=\"text-right\">{}</td><td class=\"text-right\">{}</td></tr>\n",
            esc(&w.week),
            w.days,
            comma(w.qty),
            manwon(w.amount),
            manwon(w.avg_daily_amount),
            pct(w.amount_growth)
        ));
    }
    h.push_str("</table>\n");
}

fn category_diagnosis_table(h: &mut String, diagnosis: &[CategoryDiagnosis]) {
    h.push_str("<h2>카테고리 건강도 진단</h2>\n<table>\n<tr><th>카테고리</th><th class=\"text-right\">상품수</th><th class=\"text-right\">재고</th><th class=\"text-right\">판매</th><th class=\"text-right\">재고/판매비</th><th>상태</th><th>권고 조치</th></tr>\n");
    for d in diagnosis {
        h.push_str(&format!(
            "<tr><td>{}</td><td class=\"text-right\">{}</td><td class=\"text-right\">{}</td><td class=\"text-right\">{}</td><td class=\"text-right\">{}</td><td class=\"status-{}\">{}</td><td class=\"sub\">{}</td></tr>\n",
            esc(d.category.label()),
            comma(d.total_products as i64),
            comma(d.total_stock),
            comma(d.total_sales_qty),
            d.stock_to_sales_ratio,
            d.status.tag(),
            esc(d.status.label()),
            esc(&d.action)
        ));
    }
    h.push_str("</table>\n");
}

fn top_sellers_table(h: &mut String, analytics: &Analytics) {
    h.push_str("<h2>베스트셀러 TOP 20</h2>\n<table>\n<tr><th>#</th><th>코드</th><th>상품명</th><th class=\"text-right\">TAG가</th><th class=\"text-right\">평균 판매가</th><th class=\"text-right\">판매수량</th><th class=\"text-right\">매출</th><th class=\"text-right\">마진율</th><th class=\"text-right\">재고</th></tr>\n");
    for (i, p) in analytics.top_sellers.iter().take(20).enumerate() {
        h.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"text-right\">{}</td><td class=\"text-right\">{}</td><td class=\"text-right\">{}</td><td class=\"text-right\">{}</td><td class=\"text-right\">{}</td><td class=\"text-right\">{}</td></tr>\n",
            i + 1,
            esc(&p.code),
            esc(&p.name),
            comma(p.tag_price),
            comma(p.avg_sale_price.round() as i64),
            comma(p.sales_qty),
            manwon(p.sales_revenue),
            pct(p.margin_rate),
            comma(p.stock)
        ));
    }
    h.push_str("</table>\n");
}

fn event_section(h: &mut String, event: &Event) {
    let color = event_color(event.event_type);
    h.push_str("<div class=\"event\">\n<div class=\"event-head\">\n");
    h.push_str(&format!(
        "<span class=\"tag\" style=\"color:{color};border-color:{color}\">{}</span>\n",
        esc(event.event_type.label())
    ));
    h.push_str(&format!("<h3>{}</h3>\n", esc(&event.title)));
    if let Some(n) = event.deal_number {
        h.push_str(&format!("<span class=\"sub\">DEAL #{n}</span>\n"));
    }
    h.push_str(&format!(
        "<span class=\"sub\">{} ~ {} ({}일)</span>\n</div>\n",
        event.duration.start, event.duration.end, event.duration.days
    ));
    h.push_str(&format!("<p class=\"sub\">{}</p>\n", esc(&event.subtitle)));
    h.push_str(&format!("<p class=\"slogan\">{}</p>\n", esc(&event.slogan)));

    h.push_str("<div class=\"copy\">\n");
    for line in &event.copy {
        h.push_str(&format!("{}<br>\n", esc(line)));
    }
    h.push_str("</div>\n");

    h.push_str("<div class=\"info-grid\">\n");

    let s = &event.discount_structure;
    h.push_str(&format!(
        "<div class=\"info-card\"><h4>할인 구조 — {} ({})</h4><ul>\n",
        esc(&s.kind),
        esc(&s.range)
    ));
    for t in &s.tiers {
        h.push_str(&format!("<li>{}: {}</li>\n", esc(&t.condition), esc(&t.discount)));
    }
    for w in &s.weekly_escalation {
        h.push_str(&format!("<li>{}주차: {}</li>\n", w.week, esc(&w.discount)));
    }
    for b in &s.bundle_types {
        h.push_str(&format!("<li>{}: {}</li>\n", esc(&b.kind), esc(&b.condition)));
    }
    if let Some(note) = &s.note {
        h.push_str(&format!("<li>{}</li>\n", esc(note)));
    }
    if let Some(limit) = s.quantity_limit {
        h.push_str(&format!("<li>1인 {limit}개 한정</li>\n"));
    }
    h.push_str("</ul></div>\n");

    h.push_str("<div class=\"info-card\"><h4>마케팅 아이디어</h4><ul>\n");
    for idea in &event.marketing_ideas {
        h.push_str(&format!("<li>{}</li>\n", esc(idea)));
    }
    h.push_str("</ul></div>\n");

    h.push_str(&format!(
        "<div class=\"info-card\"><h4>이슈화 전략 — {}</h4><ul>\n",
        esc(&event.issue_strategy.description)
    ));
    for t in &event.issue_strategy.tactics {
        h.push_str(&format!("<li>{}</li>\n", esc(t)));
    }
    h.push_str("</ul></div>\n");

    h.push_str("<div class=\"info-card\"><h4>사은품 / 적립</h4><ul>\n");
    for t in &event.gifts.tiers {
        h.push_str(&format!("<li>{}: {}</li>\n", esc(&t.condition), esc(&t.gift)));
    }
    if !event.gifts.note.is_empty() {
        h.push_str(&format!("<li>{}</li>\n", esc(&event.gifts.note)));
    }
    h.push_str(&format!(
        "<li>적립 {} ({})</li>\n",
        esc(&event.rewards.rate),
        esc(&event.rewards.condition)
    ));
    if let Some(bonus) = &event.rewards.bonus {
        h.push_str(&format!("<li>{}</li>\n", esc(bonus)));
    }
    h.push_str("</ul></div>\n");

    h.push_str(&format!(
        "<div class=\"info-card\"><h4>마케팅 예산 — {} ({})</h4><ul>\n",
        esc(&event.marketing_budget.amount),
        esc(&event.marketing_budget.share)
    ));
    for c in &event.marketing_budget.channels {
        h.push_str(&format!(
            "<li>{} {}: {}</li>\n",
            esc(&c.channel),
            esc(&c.share),
            esc(&c.amount)
        ));
    }
    h.push_str(&format!(
        "<li>{}</li>\n</ul></div>\n",
        esc(&event.marketing_budget.roas_target)
    ));

    let k = &event.kpi_targets;
    h.push_str(&format!(
        "<div class=\"info-card\"><h4>KPI 목표</h4><ul><li>예상 매출: {}</li><li>예상 주문: {}건</li><li>전환율: {}</li><li>객단가: {}</li>",
        esc(&k.expected_revenue),
        comma(k.expected_orders),
        esc(&k.conversion_rate),
        esc(&k.avg_order_value)
    ));
    if let Some(basis) = &k.calculation_basis {
        h.push_str(&format!("<li class=\"sub\">{}</li>", esc(basis)));
    }
    h.push_str("</ul></div>\n");

    let tc = &event.target_customer;
    h.push_str(&format!(
        "<div class=\"info-card\"><h4>타겟 고객</h4><ul><li>{}</li><li>{}</li><li>{}</li><li>핵심 채널: {}</li></ul></div>\n",
        esc(&tc.primary),
        esc(&tc.behavior),
        esc(&tc.new_vs_return),
        esc(&tc.key_channel)
    ));

    h.push_str("<div class=\"info-card\"><h4>외부 마케팅</h4><ul>\n");
    for m in &event.external_marketing {
        let mut line = format!("<li><strong>{}:</strong> {}", esc(&m.channel), esc(&m.plan));
        if let Some(budget) = &m.budget {
            line.push_str(&format!(" ({})", esc(budget)));
        }
        if let Some(roas) = &m.roas_target {
            line.push_str(&format!(" — 목표 {}", esc(roas)));
        }
        line.push_str("</li>\n");
        h.push_str(&line);
    }
    h.push_str("</ul></div>\n</div>\n");

    if !event.conversion_process.steps.is_empty() {
        h.push_str("<h4 style=\"margin-top:14px\">전환 프로세스</h4><ul class=\"sub\">\n");
        for step in &event.conversion_process.steps {
            h.push_str(&format!(
                "<li>Step {} — {}: {}</li>\n",
                step.step,
                esc(&step.name),
                esc(&step.action)
            ));
        }
        h.push_str("</ul>\n");
    }

    product_table(h, event, color);

    if let Some(total) = event.total_inventory_value {
        h.push_str(&format!(
            "<p class=\"sub\">묶인 재고 자산 총액: {}</p>\n",
            manwon(total)
        ));
    }
    h.push_str("</div>\n");
}

fn product_table(h: &mut String, event: &Event, color: &str) {
    if event.products.is_empty() {
        h.push_str("<p class=\"sub\">배정 가능한 상품이 없습니다.</p>\n");
        return;
    }
    h.push_str("<table>\n<tr><th>코드</th><th>상품명</th><th class=\"text-right\">TAG가</th><th class=\"text-right\">행사가</th><th class=\"text-right\">할인율</th><th class=\"text-right\">재고</th><th class=\"text-right\">원가</th><th class=\"text-right\">예상 마진</th></tr>\n");
    for p in &event.products {
        h.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td class=\"text-right\">{}</td><td class=\"text-right\" style=\"color:{color};font-weight:600\">{}</td><td class=\"text-right\">{:.0}%</td><td class=\"text-right\">{}</td><td class=\"text-right\">{}</td><td class=\"text-right\">{}</td></tr>\n",
            esc(&p.code),
            esc(&p.name),
            comma(p.tag_price),
            comma(p.event_price),
            p.discount_rate,
            comma(p.stock),
            comma(p.cost),
            pct(p.expected_margin)
        ));
    }
    h.push_str("</table>\n");
}

fn gift_candidates_table(h: &mut String, bundle: &ScenarioBundle) {
    if bundle.gift_candidates.is_empty() {
        return;
    }
    h.push_str("<h2>사은품 후보 (부진재고 연계)</h2>\n<table>\n<tr><th>코드</th><th>상품명</th><th>카테고리</th><th class=\"text-right\">원가</th><th class=\"text-right\">재고</th></tr>\n");
    for g in &bundle.gift_candidates {
        h.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"text-right\">{}</td><td class=\"text-right\">{}</td></tr>\n",
            esc(&g.code),
            esc(&g.name),
            esc(g.category.label()),
            won(g.cost),
            comma(g.stock)
        ));
    }
    h.push_str("</table>\n");
}

fn strategy_section(h: &mut String, bundle: &ScenarioBundle) {
    let strategy = &bundle.overall_strategy;
    h.push_str("<h2>종합 전략</h2>\n");
    h.push_str(&format!("<p>{}</p>\n", esc(&strategy.key_message)));

    for phase in &strategy.timeline {
        h.push_str(&format!(
            "<div class=\"phase\"><h3>{} <span class=\"sub\">{}</span></h3><ul>\n",
            esc(&phase.phase),
            esc(&phase.period)
        ));
        for e in &phase.events {
            h.push_str(&format!("<li>{}</li>\n", esc(e)));
        }
        h.push_str(&format!(
            "</ul><p class=\"sub\">{}</p></div>\n",
            esc(&phase.focus)
        ));
    }

    let april = &strategy.april_plan;
    h.push_str(&format!("<h3>{}</h3>\n", esc(&april.title)));
    for phase in &april.phases {
        h.push_str(&format!(
            "<div class=\"phase\"><h4>{} — {}</h4><ul>\n",
            esc(&phase.period),
            esc(&phase.name)
        ));
        for idea in &phase.ideas {
            h.push_str(&format!("<li>{}</li>\n", esc(idea)));
        }
        h.push_str("</ul></div>\n");
    }
    h.push_str(&format!("<p class=\"sub\">{}</p>\n", esc(&april.budget_note)));
    h.push_str("<ul class=\"sub\">\n");
    for m in &april.key_metrics {
        h.push_str(&format!("<li>{}</li>\n", esc(m)));
    }
    h.push_str("</ul>\n");

    h.push_str(&format!(
        "<h3>예산 배분 — {}</h3>\n<table>\n<tr><th>채널</th><th class=\"text-right\">금액</th><th class=\"text-right\">비중</th></tr>\n",
        esc(&strategy.budget_allocation.total)
    ));
    for b in &strategy.budget_allocation.breakdown {
        h.push_str(&format!(
            "<tr><td>{}</td><td class=\"text-right\">{}</td><td class=\"text-right\">{}</td></tr>\n",
            esc(&b.channel),
            esc(&b.amount),
            esc(&b.share)
        ));
    }
    h.push_str("</table>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::analyze;
    use crate::domain::event::EventType;
    use crate::ingest::types::{SalesRow, StockRow};
    use crate::scenario::{generate, GenerateOptions};
    use chrono::NaiveDate;

    fn fixture() -> (Analytics, ScenarioBundle) {
        let stocks = vec![
            StockRow {
                code: "S01".to_string(),
                name: "데일리 스니커즈 <핑크&화이트>".to_string(),
                tag_price: 50_000,
                plan_type: "정상".to_string(),
                cost: 15_000,
                stock: 200,
            },
            StockRow {
                code: "D01".to_string(),
                name: "쿠션 양말 세트".to_string(),
                tag_price: 3_000,
                plan_type: "정상".to_string(),
                cost: 1_000,
                stock: 300,
            },
        ];
        let sales: Vec<SalesRow> = (1..=10u32)
            .map(|d| SalesRow {
                date: NaiveDate::from_ymd_opt(2026, 2, d),
                code: "S01".to_string(),
                color: "PINK".to_string(),
                size: "250".to_string(),
                tag_price: 0,
                unit_cost: 15_000,
                qty: 12,
                amount: 12 * 40_000,
            })
            .collect();
        let analytics = analyze(&stocks, &sales);
        let bundle = futures_block(generate(
            &analytics,
            &[EventType::Main, EventType::DeadStock],
            GenerateOptions {
                seed: Some(11),
                ..GenerateOptions::default()
            },
        ));
        (analytics, bundle)
    }

    fn futures_block<F: std::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(f)
    }

    #[test]
    fn escapes_html_metacharacters() {
        assert_eq!(esc("<b>&\"'"), "&lt;b&gt;&amp;&quot;&#39;");
        assert_eq!(esc("평범한 텍스트"), "평범한 텍스트");
    }

    #[test]
    fn renders_a_complete_document() {
        let (analytics, bundle) = fixture();
        let html = render(&analytics, &bundle);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.ends_with("</html>\n"));
        assert!(html.contains("밸롭 (BALLOP)"));
        assert!(html.contains("카테고리 건강도 진단"));
        assert!(html.contains("밸롭 봄맞이 빅 세일"));
        assert!(html.contains("라스트 찬스! 한정 수량 소진전"));
        // Product names pass through escaped.
        assert!(html.contains("데일리 스니커즈 &lt;핑크&amp;화이트&gt;"));
        assert!(!html.contains("<핑크&화이트>"));
    }

    #[test]
    fn guerrilla_deals_render_with_deal_numbers() {
        let stocks: Vec<StockRow> = (0..6)
            .map(|i| StockRow {
                code: format!("G{i:02}"),
                name: format!("지압 슬리퍼 {i:02}"),
                tag_price: 30_000,
                plan_type: "정상".to_string(),
                cost: 5_000,
                stock: 100,
            })
            .collect();
        let sales: Vec<SalesRow> = (1..=10u32)
            .flat_map(|d| {
                stocks.iter().map(move |s| SalesRow {
                    date: NaiveDate::from_ymd_opt(2026, 2, d),
                    code: s.code.clone(),
                    color: String::new(),
                    size: String::new(),
                    tag_price: 0,
                    unit_cost: 5_000,
                    qty: 6,
                    amount: 6 * 25_000,
                })
            })
            .collect();
        let analytics = analyze(&stocks, &sales);
        let bundle = futures_block(generate(
            &analytics,
            &[EventType::Guerrilla],
            GenerateOptions {
                seed: Some(12),
                ..GenerateOptions::default()
            },
        ));
        let html = render(&analytics, &bundle);
        assert!(html.contains("DEAL #1"));
        assert!(html.contains("DEAL #5"));
    }
}
