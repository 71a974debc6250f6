//! Static fallback content per campaign type. Used verbatim when enrichment
//! is disabled, and per-field when an enrichment response comes back partial.

use crate::domain::event::{ConversionProcess, ConversionStep, Event, EventType, IssueStrategy};
use crate::llm::EventContent;

pub struct FallbackContent {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub copy: &'static [&'static str],
    pub slogan: &'static str,
    pub marketing_ideas: &'static [&'static str],
    pub issue_description: &'static str,
    pub issue_tactics: &'static [&'static str],
}

pub fn fallback(event_type: EventType) -> &'static FallbackContent {
    match event_type {
        // Guerrilla deals carry their own themed copy; this is only the
        // last-resort default.
        EventType::Main | EventType::Guerrilla => &FallbackContent {
            title: "밸롭 봄맞이 빅 세일",
            subtitle: "겨울 끝! 새 시즌을 여는 최대 60% 할인 축제",
            copy: &[
                "긴 겨울이 끝나고, 새로운 계절이 시작됩니다.",
                "밸롭이 준비한 봄맞이 빅 세일로",
                "올 시즌 필수 아이템을 최대 60% 할인된 가격에 만나보세요.",
                "베스트셀러를 지금이 가장 좋은 타이밍에!",
                "놓치면 후회할 가격, 확인하세요.",
            ],
            slogan: "봄을 걷다, 밸롭과 함께 — 최대 60% OFF",
            marketing_ideas: &[
                "인스타그램 릴스 챌린지",
                "카카오톡 플친 알림 3단계 발송",
                "네이버 블로그 체험단",
                "유튜브 쇼츠 리뷰",
                "틱톡 인플루언서 콜라보",
                "네이버 쇼핑라이브",
            ],
            issue_description: "사회적 증거 + 긴급성 결합",
            issue_tactics: &[
                "실시간 판매 카운터",
                "품절 임박 뱃지",
                "일별 타임딜",
                "카운트다운 타이머",
                "리뷰 하이라이트",
            ],
        },
        EventType::Sub => &FallbackContent {
            title: "이런 상품은 어때요?",
            subtitle: "놓치기 아까운 숨은 인기 아이템 모음",
            copy: &[
                "베스트셀러만 좋은 게 아닙니다.",
                "숨은 보석같은 아이템들을 최대 45% 할인으로!",
                "취향에 딱 맞는 나만의 아이템을 찾아보세요.",
                "3개 이상 구매 시 사은품을 드립니다.",
            ],
            slogan: "내 취향, 내 스타일 — 밸롭 추천",
            marketing_ideas: &[
                "개인화 추천",
                "장바구니 이탈 리타게팅",
                "카테고리 큐레이션",
                "묶음 구매 인센티브",
                "스타일링 가이드",
            ],
            issue_description: "교차 판매 전략",
            issue_tactics: &[
                "메인 행사 하단 노출",
                "함께 구매한 상품 연동",
                "미니 랭킹",
                "묶음 카운트 뱃지",
            ],
        },
        EventType::Season => &FallbackContent {
            title: "봄 신상 미리보기 — 2026 S/S",
            subtitle: "봄바람 타고 온 밸롭 S/S 라인업",
            copy: &[
                "올 봄, 밸롭이 준비한 S/S 라인업.",
                "가볍고 스타일리시한 스니커즈부터",
                "아웃도어 트레킹화까지.",
                "시즌 프리뷰 특별가 최대 35% 할인!",
            ],
            slogan: "새 계절의 첫 걸음, 밸롭 S/S",
            marketing_ideas: &[
                "시즌 룩북",
                "러닝 크루 이벤트",
                "봄 스타일 투표",
                "라이브 커머스",
                "날씨 연동 광고",
            ],
            issue_description: "트렌드 선점 전략",
            issue_tactics: &[
                "룩북 화보",
                "얼리어답터 뱃지",
                "SNS 챌린지",
                "날씨 맥락 광고",
                "첫 구매 적립금",
            ],
        },
        EventType::OffSeason => &FallbackContent {
            title: "여름 미리 준비! 최대 70% OFF",
            subtitle: "역시즌 얼리버드 세일",
            copy: &[
                "여름이 오기 전에 미리 준비하면?",
                "역시즌 최대 70% 할인!",
                "아쿠아슈즈, 샌들을 지금 사면 여름에 두 배로 아낍니다.",
                "선제적 구매가 곧 현명한 소비입니다.",
            ],
            slogan: "먼저 사면 더 싸다! 밸롭 역시즌 특가",
            marketing_ideas: &[
                "가격 비교 인포그래픽",
                "얼리버드 후기 이벤트",
                "역시즌 알림 서비스",
                "세트 할인",
                "가격 비교 슬라이드",
            ],
            issue_description: "가격 앵커링 전략",
            issue_tactics: &[
                "정시즌 vs 역시즌 가격 비교",
                "품절 상품 뱃지",
                "재입고 없음 강조",
                "세트 추가 할인",
                "만족 후기 공유",
            ],
        },
        EventType::NewProduct => &FallbackContent {
            title: "NEW ARRIVAL — 밸롭 신상품",
            subtitle: "가장 먼저 만나는 밸롭의 새 라인업",
            copy: &[
                "밸롭의 새로운 라인업을 가장 먼저 만나보세요.",
                "신상품 런칭 기념 최대 20% 할인!",
                "첫 구매 고객에게는 10% 적립금까지.",
                "밸롭 NEW ARRIVAL에서 시작됩니다.",
            ],
            slogan: "BE FIRST — 밸롭 신상, 누구보다 먼저",
            marketing_ideas: &[
                "티저 영상 D-5",
                "인플루언서 체험단",
                "런칭 라이브",
                "퀴즈 이벤트",
                "SNS 공유 할인",
            ],
            issue_description: "희소성 + 얼리어답터 전략",
            issue_tactics: &[
                "단계적 티저 공개",
                "첫 100명 한정 혜택",
                "개발 스토리 콘텐츠",
                "런칭 라이브",
                "언박싱 리뷰 바이럴",
            ],
        },
        EventType::DeadStock => &FallbackContent {
            title: "라스트 찬스! 한정 수량 소진전",
            subtitle: "마지막 재고, 마지막 가격 — 최대 90% OFF",
            copy: &[
                "이 가격은 다시 없습니다.",
                "창고 정리를 위한 초특가 대방출!",
                "1+1, 묶음 특가까지 준비했습니다.",
                "한정 수량 소진 시 종료!",
                "지금 바로 확인하세요!",
            ],
            slogan: "이 가격, 마지막입니다!",
            marketing_ideas: &[
                "레드 프라이스 태그",
                "실시간 재고 카운터",
                "1+1 묶음 딜",
                "주차별 추가 할인",
                "당근마켓 광고",
                "플리마켓 연계",
            ],
            issue_description: "최저가 충격 전략",
            issue_tactics: &[
                "3단 가격 취소선",
                "마지막 XX개 카운트",
                "1+1 묶음 가성비",
                "희소성 강조",
                "주차별 추가 할인",
            ],
        },
    }
}

pub const GUERRILLA_THEMES: [&str; 5] = [
    "건강 슬리퍼 특가",
    "스니커즈 폭탄 세일",
    "아쿠아 플래시 세일",
    "인솔&양말 초특가",
    "프리미엄 러닝화 특가",
];

pub const GUERRILLA_THEME_KEYWORDS: [&[&str]; 5] = [
    &["슬리퍼", "지압"],
    &["스니커즈", "봄버", "운동화"],
    &["아쿠아", "샌들"],
    &["인솔", "양말"],
    &["카본", "러닝", "브리즈"],
];

pub struct ThemeCopy {
    pub copy: &'static [&'static str],
    pub slogan: &'static str,
    pub marketing_ideas: &'static [&'static str],
}

pub fn guerrilla_theme_copy(theme_index: usize) -> &'static ThemeCopy {
    static THEMES: [ThemeCopy; 5] = [
        ThemeCopy {
            copy: &[
                "발이 편해야 하루가 편합니다.",
                "밸롭 건강 슬리퍼, 오늘 단 하루 파격가!",
                "지압 효과로 매일의 피로를 풀어보세요.",
                "1인 2개 한정, 자정까지만!",
            ],
            slogan: "발바닥이 행복한 하루 — 슬리퍼 초특가",
            marketing_ideas: &[
                "발 건강 인포그래픽",
                "오전 10시 알림톡 발송",
                "후기 사진 리그램 이벤트",
                "슬리퍼 착용 챌린지",
                "ASMR 지압 영상",
            ],
        },
        ThemeCopy {
            copy: &[
                "봄 데일리 슈즈, 이 가격 실화?",
                "밸롭 스니커즈 최대 80% OFF — 오늘 하루만!",
                "출퇴근부터 주말 나들이까지, 올봄 필수템.",
                "수량 한정, 선착순 마감!",
            ],
            slogan: "봄 발걸음은 밸롭 스니커즈와 — 80% OFF",
            marketing_ideas: &[
                "봄 코디 룩북 인스타 릴스",
                "사이즈별 실시간 잔여량 표시",
                "스니커즈 커스텀 이벤트",
                "직장인 출근룩 투표",
                "오후 2시 추가 물량 오픈",
            ],
        },
        ThemeCopy {
            copy: &[
                "올 여름 준비, 지금이 제일 싸다!",
                "아쿠아슈즈 역시즌 초특가 — 정시즌의 절반 가격!",
                "물놀이 시즌 전에 미리 득템하세요.",
                "재입고 없는 한정 수량!",
            ],
            slogan: "여름을 앞서가는 가격 — 아쿠아 플래시",
            marketing_ideas: &[
                "역시즌 가격 비교 카드뉴스",
                "여름 여행 체크리스트 콘텐츠",
                "물놀이 필수템 3종 세트",
                "작년 정시즌 가격 대비 표시",
                "가족 세트 추가 할인",
            ],
        },
        ThemeCopy {
            copy: &[
                "신발 안의 숨은 영웅, 인솔 & 양말!",
                "1+1 가격으로 만나는 소모품 특가!",
                "교체만 해도 신발이 새것처럼!",
                "3세트 이상 구매 시 무료배송!",
            ],
            slogan: "작은 투자, 큰 변화 — 인솔&양말 초특가",
            marketing_ideas: &[
                "인솔 교체 전후 비교 영상",
                "양말 구독 서비스 맛보기",
                "묶음 구매 할인 강조",
                "출근러 필수 소모품 콘텐츠",
                "리뷰 인증 적립금 지급",
            ],
        },
        ThemeCopy {
            copy: &[
                "프리미엄 러닝화를 이 가격에?",
                "카본 플레이트 러닝화 파격 할인!",
                "기록을 갱신할 당신의 파트너.",
                "마라톤 시즌 대비 최저가!",
            ],
            slogan: "기록의 시작 — 프리미엄 러닝화 특가",
            marketing_ideas: &[
                "러닝 크루 콜라보 할인 코드",
                "기록 인증 챌린지",
                "러닝 코스 추천 콘텐츠",
                "유명 러너 협찬 리뷰",
                "봄 마라톤 대회 연계 프로모션",
            ],
        },
    ];
    &THEMES[theme_index % THEMES.len()]
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn pick_str(enriched: Option<String>, default: &str) -> String {
    match enriched {
        Some(s) if !s.trim().is_empty() => s,
        _ => default.to_string(),
    }
}

fn pick_vec(enriched: Option<Vec<String>>, default: &[&str]) -> Vec<String> {
    match enriched {
        Some(v) if !v.is_empty() => v,
        _ => strings(default),
    }
}

/// Steps synthesized from the issue-strategy tactics when the enrichment
/// response omits a conversion process.
fn steps_from_tactics(tactics: &[String]) -> ConversionProcess {
    ConversionProcess {
        steps: tactics
            .iter()
            .enumerate()
            .map(|(i, t)| ConversionStep {
                step: i as u32 + 1,
                name: format!("Step {}", i + 1),
                action: t.clone(),
                channel: None,
            })
            .collect(),
    }
}

/// Fill the editorial fields of an event, preferring enrichment output and
/// falling back per field to the static deck for its type.
pub fn apply_content(event: &mut Event, enrichment: Option<EventContent>) {
    let fb = fallback(event.event_type);
    let c = enrichment.unwrap_or_default();

    event.title = pick_str(c.title, fb.title);
    event.subtitle = pick_str(c.subtitle, fb.subtitle);
    event.copy = pick_vec(c.copy, fb.copy);
    event.slogan = pick_str(c.slogan, fb.slogan);
    event.marketing_ideas = pick_vec(c.marketing_ideas, fb.marketing_ideas);
    event.issue_strategy = c.issue_strategy.unwrap_or_else(|| IssueStrategy {
        description: fb.issue_description.to_string(),
        tactics: strings(fb.issue_tactics),
    });
    event.conversion_process = c
        .conversion_process
        .filter(|p| !p.steps.is_empty())
        .unwrap_or_else(|| steps_from_tactics(&event.issue_strategy.tactics));
}

/// Same policy for one guerrilla deal, falling back to its theme deck.
pub fn apply_guerrilla_content(
    event: &mut Event,
    enrichment: Option<EventContent>,
    theme_index: usize,
    quantity_capped: i64,
) {
    let theme = GUERRILLA_THEMES[theme_index % GUERRILLA_THEMES.len()];
    let deck = guerrilla_theme_copy(theme_index);
    let c = enrichment.unwrap_or_default();

    event.title = pick_str(c.title, &format!("오늘만 이 가격! — {theme}"));
    event.subtitle = pick_str(c.subtitle, theme);
    event.copy = pick_vec(c.copy, deck.copy);
    event.slogan = pick_str(c.slogan, deck.slogan);
    event.marketing_ideas = pick_vec(c.marketing_ideas, deck.marketing_ideas);
    event.issue_strategy = c.issue_strategy.unwrap_or_else(|| IssueStrategy {
        description: "FOMO 극대화".to_string(),
        tactics: vec![
            "24시간 카운트다운".to_string(),
            format!("수량 제한 {quantity_capped}개"),
            "실시간 구매 카운터".to_string(),
            "재고 소진 게이지".to_string(),
            "사전 알림 신청".to_string(),
        ],
    });
    event.conversion_process = ConversionProcess {
        steps: vec![
            ConversionStep {
                step: 1,
                name: "알림".to_string(),
                action: "카카오톡/푸시 알림".to_string(),
                channel: None,
            },
            ConversionStep {
                step: 2,
                name: "확인".to_string(),
                action: "파격 할인가 확인".to_string(),
                channel: None,
            },
            ConversionStep {
                step: 3,
                name: "구매".to_string(),
                action: "간편결제 30초 내 완료".to_string(),
                channel: None,
            },
            ConversionStep {
                step: 4,
                name: "공유".to_string(),
                action: "SNS 공유 → 바이럴".to_string(),
                channel: None,
            },
        ],
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_a_fallback_deck() {
        for t in EventType::ALL {
            let fb = fallback(t);
            assert!(!fb.title.is_empty());
            assert!(!fb.copy.is_empty());
            assert!(!fb.issue_tactics.is_empty());
        }
    }

    #[test]
    fn blank_enrichment_fields_fall_back() {
        let c = EventContent {
            title: Some("  ".to_string()),
            copy: Some(Vec::new()),
            slogan: Some("새 슬로건".to_string()),
            ..Default::default()
        };
        let fb = fallback(EventType::Main);
        assert_eq!(pick_str(c.title, fb.title), fb.title);
        assert_eq!(pick_vec(c.copy, fb.copy), strings(fb.copy));
        assert_eq!(pick_str(c.slogan, fb.slogan), "새 슬로건");
    }

    #[test]
    fn conversion_steps_mirror_tactics_when_absent() {
        let p = steps_from_tactics(&["a".to_string(), "b".to_string()]);
        assert_eq!(p.steps.len(), 2);
        assert_eq!(p.steps[1].step, 2);
        assert_eq!(p.steps[1].action, "b");
    }
}
