use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use promoplan_core::domain::event::EventType;
use promoplan_core::llm::gemini::GeminiClient;
use promoplan_core::llm::EnrichmentClient;
use promoplan_core::scenario::GenerateOptions;

const REPORT_TTL: Duration = Duration::from_secs(10 * 60);
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = promoplan_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let state = AppState {
        settings,
        reports: Arc::new(Mutex::new(HashMap::new())),
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/api/generate", post(generate_report))
        .route("/api/report/:id", get(get_report))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    settings: promoplan_core::config::Settings,
    /// Rendered reports by id. Expired entries are swept on each insert.
    reports: Arc<Mutex<HashMap<String, CachedReport>>>,
}

#[derive(Clone)]
struct CachedReport {
    html: String,
    created_at: Instant,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    report_id: String,
    report_url: String,
    report_html: String,
    summary: GenerateSummary,
}

#[derive(Debug, Serialize)]
struct GenerateSummary {
    total_products: usize,
    products_with_stock: usize,
    total_revenue: i64,
    events_generated: usize,
    ai_used: bool,
}

#[derive(Debug, Serialize)]
struct ApiError {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ApiError {
            error: message.into(),
        }),
    )
        .into_response()
}

async fn generate_report(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut stock_bytes: Option<Vec<u8>> = None;
    let mut sales_bytes: Option<Vec<u8>> = None;
    let mut events_raw: Option<String> = None;
    let mut use_ai = false;
    let mut api_key = String::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
        };
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "stock" => match field.bytes().await {
                Ok(b) => stock_bytes = Some(b.to_vec()),
                Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
            },
            "sales" => match field.bytes().await {
                Ok(b) => sales_bytes = Some(b.to_vec()),
                Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
            },
            "events" => events_raw = field.text().await.ok(),
            "use_ai" => use_ai = field.text().await.ok().as_deref() == Some("true"),
            "api_key" => api_key = field.text().await.unwrap_or_default().trim().to_string(),
            _ => {}
        }
    }

    let (Some(stock_bytes), Some(sales_bytes)) = (stock_bytes, sales_bytes) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "재고(stock)와 판매(sales) 파일을 모두 업로드해주세요.",
        );
    };

    let selection = parse_selection(events_raw.as_deref());

    // A key sent with the request wins over the environment.
    let api_key = if api_key.is_empty() {
        state.settings.gemini_api_key.clone().unwrap_or_default()
    } else {
        api_key
    };
    let use_ai = use_ai && !api_key.is_empty();

    match run_pipeline(&state, stock_bytes, sales_bytes, selection, use_ai, api_key).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "report generation failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn run_pipeline(
    state: &AppState,
    stock_bytes: Vec<u8>,
    sales_bytes: Vec<u8>,
    selection: Vec<EventType>,
    use_ai: bool,
    api_key: String,
) -> anyhow::Result<GenerateResponse> {
    let stock_rows = promoplan_core::ingest::excel::parse_stock_rows(&stock_bytes)?;
    let sales_rows = promoplan_core::ingest::excel::parse_sales_rows(&sales_bytes)?;
    let analytics = promoplan_core::analytics::analyze(&stock_rows, &sales_rows);

    let client: Option<GeminiClient> = if use_ai {
        Some(GeminiClient::new(api_key)?)
    } else {
        None
    };

    let bundle = promoplan_core::scenario::generate(
        &analytics,
        &selection,
        GenerateOptions {
            enrichment: client.as_ref().map(|c| c as &dyn EnrichmentClient),
            total_marketing_budget: state.settings.total_marketing_budget,
            seed: None,
        },
    )
    .await;

    let html = promoplan_core::report::render(&analytics, &bundle);

    let report_id = Uuid::new_v4().to_string();
    cache_report(&state.reports, &report_id, html.clone());

    Ok(GenerateResponse {
        report_url: format!("/api/report/{report_id}"),
        report_id,
        report_html: html,
        summary: GenerateSummary {
            total_products: analytics.summary.total_products,
            products_with_stock: analytics.summary.products_with_stock,
            total_revenue: analytics.summary.total_revenue,
            events_generated: bundle.events.len(),
            ai_used: use_ai,
        },
    })
}

/// Selection comes in as a JSON array of type tags. Anything unreadable,
/// unknown-only, or empty falls back to the full seven-type lineup.
fn parse_selection(raw: Option<&str>) -> Vec<EventType> {
    let tags: Vec<String> = raw
        .and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default();
    let selection: Vec<EventType> = tags
        .iter()
        .filter_map(|t| EventType::parse_tag(t))
        .collect();
    if selection.is_empty() {
        EventType::ALL.to_vec()
    } else {
        selection
    }
}

fn cache_report(reports: &Mutex<HashMap<String, CachedReport>>, id: &str, html: String) {
    if let Ok(mut map) = reports.lock() {
        let now = Instant::now();
        map.retain(|_, v| now.duration_since(v.created_at) < REPORT_TTL);
        map.insert(
            id.to_string(),
            CachedReport {
                html,
                created_at: now,
            },
        );
    }
}

async fn get_report(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let cached = state
        .reports
        .lock()
        .ok()
        .and_then(|map| map.get(&id).cloned());

    match cached {
        Some(report) if report.created_at.elapsed() < REPORT_TTL => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            Html(report.html),
        )
            .into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            "보고서를 찾을 수 없습니다. 보고서가 만료되었을 수 있습니다.",
        )
            .into_response(),
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &promoplan_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_or_empty_selection_defaults_to_all_types() {
        assert_eq!(parse_selection(None).len(), 7);
        assert_eq!(parse_selection(Some("[]")).len(), 7);
        assert_eq!(parse_selection(Some("not json")).len(), 7);
        assert_eq!(parse_selection(Some(r#"["bogus"]"#)).len(), 7);
    }

    #[test]
    fn known_tags_are_kept_in_order() {
        let selection = parse_selection(Some(r#"["guerrilla", "main"]"#));
        assert_eq!(selection, vec![EventType::Guerrilla, EventType::Main]);
    }

    #[test]
    fn expired_reports_are_swept_on_insert() {
        let reports = Mutex::new(HashMap::new());
        {
            let mut map = reports.lock().unwrap();
            map.insert(
                "old".to_string(),
                CachedReport {
                    html: String::new(),
                    created_at: Instant::now() - REPORT_TTL - Duration::from_secs(1),
                },
            );
        }
        cache_report(&reports, "fresh", "<html></html>".to_string());
        let map = reports.lock().unwrap();
        assert!(!map.contains_key("old"));
        assert!(map.contains_key("fresh"));
    }
}
