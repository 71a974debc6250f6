use crate::config::Settings;
use crate::llm::error::LlmDiagnosticsError;
use crate::llm::json;
use crate::llm::{DealPromptInput, EnrichmentClient, EventContent, EventPromptInput};
use crate::domain::money::comma;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2000;
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const TEMPERATURE: f64 = 0.8;

/// Deal prompts ask for a smaller payload than full event prompts.
const DEAL_MAX_OUTPUT_TOKENS: u32 = 1000;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_output_tokens: u32,
}

impl GeminiClient {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let max_output_tokens = std::env::var("GEMINI_MAX_OUTPUT_TOKENS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS);

        let timeout_secs = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            http,
            api_key,
            base_url,
            model,
            max_output_tokens,
        })
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_gemini_api_key()?.to_string();
        Self::new(api_key)
    }

    async fn generate(&self, prompt: String, max_output_tokens: u32) -> anyhow::Result<String> {
        let req = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens,
                temperature: TEMPERATURE,
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        );
        let res = self
            .http
            .post(url)
            .json(&req)
            .send()
            .await
            .context("Gemini request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read Gemini response body")?;
        if !status.is_success() {
            let raw_response_json = serde_json::from_str::<serde_json::Value>(&text).ok();
            return Err(LlmDiagnosticsError {
                stage: "http",
                detail: format!("status={status}"),
                raw_output: Some(text),
                raw_response_json,
            }
            .into());
        }

        let parsed = serde_json::from_str::<GenerateContentResponse>(&text)
            .with_context(|| format!("failed to parse Gemini response JSON: {text}"))?;
        let out = Self::response_text(&parsed);
        if out.trim().is_empty() {
            return Err(LlmDiagnosticsError {
                stage: "empty_response",
                detail: "Gemini returned no text parts".to_string(),
                raw_output: Some(text),
                raw_response_json: None,
            }
            .into());
        }
        Ok(out)
    }

    fn response_text(res: &GenerateContentResponse) -> String {
        let mut out = String::new();
        for candidate in &res.candidates {
            let Some(content) = &candidate.content else {
                continue;
            };
            for part in &content.parts {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(&part.text);
            }
        }
        out
    }

    fn event_prompt(input: &EventPromptInput) -> String {
        let s = &input.summary;
        let (start, end) = s
            .date_range
            .as_ref()
            .map(|r| (r.start.to_string(), r.end.to_string()))
            .unwrap_or_else(|| ("2026-02-01".to_string(), "2026-02-20".to_string()));
        let revenue_100m = (s.total_revenue as f64 / 100_000_000.0 * 10.0).round() / 10.0;
        let top_products = if input.product_names.is_empty() {
            "밸롭 스니커즈, 지압 슬리퍼, 아쿠아슈즈 등".to_string()
        } else {
            input.product_names.join(", ")
        };

        format!(
            r#"당신은 한국 스포츠/신발 브랜드 "밸롭(BALLOP)"의 자사몰 마케팅 전문가입니다.

## 브랜드 정보
- 브랜드: 밸롭 (BALLOP) - 한국 스포츠웨어/신발 브랜드
- 주요 상품: 스니커즈, 슬리퍼, 아쿠아슈즈, 샌들, 트레킹화, 스포츠 의류
- 현재 시점: 2026년 2월, 겨울 끝자락

## 판매 데이터 요약
- 분석 기간: {start} ~ {end}
- 총 매출: {revenue_100m}억원
- 총 판매: {total_qty}개
- 일평균 매출: {daily}만원
- 매출 트렌드: {trend}

## 행사 유형
{event_desc}

## 주요 상품
{top_products}

## 할인 범위
{discount_range}

아래 항목들을 JSON 형식으로 생성해주세요. 반드시 유효한 JSON만 출력하세요. 마크다운 코드블록 없이 순수 JSON만 출력:

{{
  "title": "행사 제목 (한글, 20자 이내)",
  "subtitle": "부제목 (한글, 30자 이내)",
  "copy": ["마케팅 카피 5줄 (각 줄은 배열 요소)"],
  "slogan": "원라이너 슬로건",
  "marketingIdeas": ["마케팅 아이디어 6개 이상 (구체적, 실행 가능한)"],
  "issueStrategy": {{
    "description": "이슈화 핵심 전략 한 줄",
    "tactics": ["구체적 이슈화 전술 5개"]
  }},
  "conversionProcess": {{
    "steps": [
      {{"step": 1, "name": "단계명", "action": "구체적 행동", "channel": "채널"}}
    ]
  }},
  "gifts": {{
    "tiers": [
      {{"condition": "구매 조건", "gift": "사은품 내용"}}
    ],
    "note": "사은품 관련 추가 안내"
  }},
  "rewards": {{
    "rate": "적립률",
    "condition": "적립 조건",
    "bonus": "추가 혜택"
  }},
  "externalMarketing": [
    {{"channel": "채널명", "plan": "구체적 실행 계획", "budget": "예산(선택)"}}
  ],
  "kpiTargets": {{
    "expectedRevenue": "예상 매출",
    "expectedOrders": 0,
    "conversionRate": "목표 전환율",
    "avgOrderValue": "목표 객단가"
  }}
}}"#,
            start = start,
            end = end,
            revenue_100m = revenue_100m,
            total_qty = comma(s.total_sales_qty),
            daily = comma((s.avg_daily_revenue as f64 / 10_000.0).round() as i64),
            trend = input.trend,
            event_desc = input.event_type.describe(),
            top_products = top_products,
            discount_range = input.discount_range,
        )
    }

    fn deal_prompt(input: &DealPromptInput) -> String {
        format!(
            r#"한국 스포츠 브랜드 "밸롭(BALLOP)"의 게릴라 원데이 딜 마케팅 콘텐츠를 생성해주세요.

테마: {theme}
상품: {products}
할인율: 60~80%
시간: 24시간 한정

아래 JSON 형식으로 생성. 마크다운 코드블록 없이 순수 유효한 JSON만 출력:
{{
  "title": "오늘만 이 가격! — [테마]",
  "subtitle": "한 줄 서브 타이틀",
  "copy": ["긴급 마케팅 카피 4줄"],
  "slogan": "슬로건",
  "marketingIdeas": ["마케팅 아이디어 5개"],
  "issueStrategy": {{"description": "전략 설명", "tactics": ["전술 4개"]}}
}}"#,
            theme = input.theme,
            products = input.product_names.join(", "),
        )
    }
}

#[async_trait::async_trait]
impl EnrichmentClient for GeminiClient {
    async fn event_content(&self, input: EventPromptInput) -> anyhow::Result<EventContent> {
        let text = self
            .generate(Self::event_prompt(&input), self.max_output_tokens)
            .await?;
        json::parse_content(&text)
    }

    async fn deal_content(&self, input: DealPromptInput) -> anyhow::Result<EventContent> {
        let text = self
            .generate(Self::deal_prompt(&input), DEAL_MAX_OUTPUT_TOKENS)
            .await?;
        json::parse_content(&text)
    }
}

#[derive(Debug, Clone, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}
