use axum::{
    extract::State,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stock_dash_core::handlers::{self, HandlerOutput, Trigger};
use stock_dash_core::market_data::{MarketDataClient, YahooClient};
use stock_dash_core::time::market_date::{format_date, today_local};

const PAGE_TEMPLATE: &str = include_str!("../assets/index.html");
const TODAY_PLACEHOLDER: &str = "{{today}}";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = stock_dash_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let market_data = match YahooClient::from_settings(&settings) {
        Ok(client) => client,
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "market data client setup failed");
            return Err(e);
        }
    };

    let state = AppState {
        market_data: Arc::new(market_data),
    };

    let app = router(state);

    let port = settings.port()?;
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "dashboard listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/api/company-info", post(company_info))
        .route("/api/price-series", post(price_series))
        .route("/api/indicators", post(indicators))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Built once at startup and shared by every route.
#[derive(Clone)]
struct AppState {
    market_data: Arc<dyn MarketDataClient>,
}

/// What the page posts for a button press: the button's click count plus the
/// current values of the symbol input and date picker.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HandlerRequest {
    n_clicks: Option<u64>,
    symbol: Option<String>,
    start_date: Option<String>,
}

impl HandlerRequest {
    fn trigger(&self) -> Trigger {
        Trigger {
            n_clicks: self.n_clicks,
        }
    }
}

async fn healthz() -> &'static str {
    "ok"
}

async fn index() -> Html<String> {
    Html(render_page(&format_date(today_local())))
}

fn render_page(today: &str) -> String {
    PAGE_TEMPLATE.replace(TODAY_PLACEHOLDER, today)
}

async fn company_info(
    State(state): State<AppState>,
    Json(req): Json<HandlerRequest>,
) -> Json<HandlerOutput> {
    Json(
        handlers::company_info(
            state.market_data.as_ref(),
            req.trigger(),
            req.symbol.as_deref(),
        )
        .await,
    )
}

async fn price_series(
    State(state): State<AppState>,
    Json(req): Json<HandlerRequest>,
) -> Json<HandlerOutput> {
    Json(
        handlers::price_series(
            state.market_data.as_ref(),
            req.trigger(),
            req.symbol.as_deref(),
            req.start_date.as_deref(),
        )
        .await,
    )
}

async fn indicators(
    State(state): State<AppState>,
    Json(req): Json<HandlerRequest>,
) -> Json<HandlerOutput> {
    Json(
        handlers::indicators(
            state.market_data.as_ref(),
            req.trigger(),
            req.symbol.as_deref(),
            req.start_date.as_deref(),
        )
        .await,
    )
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &stock_dash_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
