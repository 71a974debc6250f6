use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use promoplan_core::domain::event::EventType;
use promoplan_core::llm::gemini::GeminiClient;
use promoplan_core::llm::EnrichmentClient;
use promoplan_core::scenario::GenerateOptions;

#[derive(Debug, Parser)]
#[command(name = "promoplan_worker")]
struct Args {
    /// Inventory export (.xls/.xlsx).
    #[arg(long)]
    stock: std::path::PathBuf,

    /// Sales export (.xls/.xlsx).
    #[arg(long)]
    sales: std::path::PathBuf,

    /// Comma-separated campaign type tags (e.g. "main,guerrilla,deadStock").
    /// Defaults to all seven types.
    #[arg(long)]
    events: Option<String>,

    /// Enrich copy via Gemini. Requires GEMINI_API_KEY.
    #[arg(long)]
    use_ai: bool,

    /// Fixed seed for reproducible discount jitter.
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the HTML report.
    #[arg(long, default_value = "report.html")]
    out: std::path::PathBuf,

    /// Also write the scenario bundle as JSON.
    #[arg(long)]
    json: Option<std::path::PathBuf>,

    /// Stop after analytics and log summary stats only.
    #[arg(long)]
    dry_run: bool,
}

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

    let args = Args::parse();

    if let Err(err) = run(args, &settings).await {
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = %err, "report run failed");
        return Err(err);
    }

    Ok(())
}

async fn run(args: Args, settings: &promoplan_core::config::Settings) -> anyhow::Result<()> {
    let stock_bytes = std::fs::read(&args.stock)
        .with_context(|| format!("read stock file {}", args.stock.display()))?;
    let sales_bytes = std::fs::read(&args.sales)
        .with_context(|| format!("read sales file {}", args.sales.display()))?;

    let stock_rows = promoplan_core::ingest::excel::parse_stock_rows(&stock_bytes)?;
    let sales_rows = promoplan_core::ingest::excel::parse_sales_rows(&sales_bytes)?;
    let analytics = promoplan_core::analytics::analyze(&stock_rows, &sales_rows);

    if args.dry_run {
        tracing::info!(
            total_products = analytics.summary.total_products,
            products_with_stock = analytics.summary.products_with_stock,
            total_revenue = analytics.summary.total_revenue,
            sales_days = analytics.summary.sales_days,
            dead_stock = analytics.dead_stock.len(),
            new_arrivals = analytics.new_arrivals.len(),
            dry_run = true,
            "analytics complete"
        );
        return Ok(());
    }

    let selection = resolve_selection(args.events.as_deref());

    let client: Option<GeminiClient> = if args.use_ai {
        Some(GeminiClient::from_settings(settings)?)
    } else {
        None
    };

    let bundle = promoplan_core::scenario::generate(
        &analytics,
        &selection,
        GenerateOptions {
            enrichment: client.as_ref().map(|c| c as &dyn EnrichmentClient),
            total_marketing_budget: settings.total_marketing_budget,
            seed: args.seed,
        },
    )
    .await;

    let html = promoplan_core::report::render(&analytics, &bundle);
    std::fs::write(&args.out, &html)
        .with_context(|| format!("write report {}", args.out.display()))?;
    tracing::info!(path = %args.out.display(), events = bundle.events.len(), "report written");

    if let Some(json_path) = &args.json {
        let json = serde_json::to_string_pretty(&bundle)?;
        std::fs::write(json_path, json)
            .with_context(|| format!("write bundle {}", json_path.display()))?;
        tracing::info!(path = %json_path.display(), "bundle written");
    }

    Ok(())
}

/// Tags the CLI does not recognize are dropped with a warning; an empty
/// result falls back to the full lineup.
fn resolve_selection(events_arg: Option<&str>) -> Vec<EventType> {
    let Some(raw) = events_arg else {
        return EventType::ALL.to_vec();
    };

    let mut selection = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match EventType::parse_tag(tag) {
            Some(t) => selection.push(t),
            None => tracing::warn!(tag, "unknown event type tag; skipping"),
        }
    }

    if selection.is_empty() {
        EventType::ALL.to_vec()
    } else {
        selection
    }
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
    fn missing_or_empty_events_arg_selects_all_types() {
        assert_eq!(resolve_selection(None).len(), 7);
        assert_eq!(resolve_selection(Some("")).len(), 7);
        assert_eq!(resolve_selection(Some("bogus,also-bogus")).len(), 7);
    }

    #[test]
    fn comma_separated_tags_parse_in_order() {
        let selection = resolve_selection(Some("deadStock, main"));
        assert_eq!(selection, vec![EventType::DeadStock, EventType::Main]);
    }

    #[tokio::test]
    async fn unreadable_inputs_surface_as_a_single_run_error() {
        let args = Args {
            stock: "/nonexistent/stock.xlsx".into(),
            sales: "/nonexistent/sales.xlsx".into(),
            events: None,
            use_ai: false,
            seed: None,
            out: "report.html".into(),
            json: None,
            dry_run: false,
        };
        let settings = promoplan_core::config::Settings {
            gemini_api_key: None,
            sentry_dsn: None,
            total_marketing_budget: promoplan_core::config::DEFAULT_TOTAL_MARKETING_BUDGET,
        };

        let err = run(args, &settings).await.unwrap_err();
        assert!(format!("{err:#}").contains("read stock file"));
    }
}
