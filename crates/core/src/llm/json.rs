use crate::llm::EventContent;
use anyhow::Context;

pub fn extract_json(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        // Remove Markdown fences (```json ... ``` or ``` ... ```).
        let mut inner = trimmed;
        if let Some(after_first) = inner.splitn(2, '\n').nth(1) {
            inner = after_first;
        }
        if let Some(end) = inner.rfind("```") {
            inner = &inner[..end];
        }
        return Some(inner.trim().to_string());
    }

    // Best-effort extraction: first '{' to last '}'.
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(trimmed[start..=end].trim().to_string())
}

pub fn parse_content(text: &str) -> anyhow::Result<EventContent> {
    let json_str = extract_json(text).unwrap_or_else(|| text.trim().to_string());
    serde_json::from_str::<EventContent>(&json_str)
        .with_context(|| format!("model output is not valid JSON for the content schema: {json_str}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_json_handles_fenced_blocks() {
        let body = "{\"title\":\"세일\"}";
        let fenced = format!("```json\n{body}\n```\n");
        assert_eq!(extract_json(&fenced), Some(body.to_string()));
    }

    #[test]
    fn extract_json_falls_back_to_braces() {
        let s = "prefix {\"a\":1} suffix";
        assert_eq!(extract_json(s), Some("{\"a\":1}".to_string()));
    }

    #[test]
    fn parse_content_accepts_partial_payloads() {
        let payload = json!({
            "title": "봄맞이 세일",
            "copy": ["한 줄", "두 줄"],
            "issueStrategy": { "description": "긴급성", "tactics": ["타이머"] },
        })
        .to_string();
        let content = parse_content(&payload).unwrap();
        assert_eq!(content.title.as_deref(), Some("봄맞이 세일"));
        assert_eq!(content.copy.as_deref().map(|c| c.len()), Some(2));
        assert!(content.subtitle.is_none());
        assert_eq!(content.issue_strategy.unwrap().tactics, vec!["타이머"]);
    }

    #[test]
    fn parse_content_converts_camel_case_kpi() {
        let payload = json!({
            "kpiTargets": {
                "expectedRevenue": "2,500만원",
                "expectedOrders": 830,
                "conversionRate": "3.5%",
                "avgOrderValue": "30,000원",
            }
        })
        .to_string();
        let content = parse_content(&payload).unwrap();
        let kpi: crate::domain::event::KpiTargets = content.kpi_targets.unwrap().into();
        assert_eq!(kpi.expected_orders, 830);
        assert!(kpi.calculation_basis.is_none());
    }

    #[test]
    fn parse_content_rejects_prose() {
        assert!(parse_content("죄송합니다, 생성할 수 없습니다.").is_err());
    }
}
