pub mod analytics;
pub mod domain;
pub mod ingest;
pub mod llm;
pub mod report;
pub mod scenario;

pub mod config {
    use anyhow::Context;

    /// Default monthly marketing budget in KRW (700만원).
    pub const DEFAULT_TOTAL_MARKETING_BUDGET: i64 = 7_000_000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub gemini_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
        pub total_marketing_budget: i64,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let total_marketing_budget = std::env::var("TOTAL_MARKETING_BUDGET")
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .unwrap_or(DEFAULT_TOTAL_MARKETING_BUDGET);

            Ok(Self {
                gemini_api_key: std::env::var("GEMINI_API_KEY").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                total_marketing_budget,
            })
        }

        pub fn require_gemini_api_key(&self) -> anyhow::Result<&str> {
            self.gemini_api_key
                .as_deref()
                .context("GEMINI_API_KEY is required")
        }
    }
}
