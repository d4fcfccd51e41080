use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stock_dash_core::handlers::{self, HandlerOutput, HandlerState, Trigger, View};
use stock_dash_core::market_data::YahooClient;
use stock_dash_core::time::market_date::{format_date, today_local};

#[derive(Debug, Parser)]
#[command(name = "stock_dash_cli", about = "Run one dashboard action from the terminal")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Company name, logo and description.
    Info {
        #[arg(long)]
        symbol: String,
    },

    /// Daily open/close chart data.
    Price {
        #[arg(long)]
        symbol: String,

        /// First day of the chart (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        start_date: Option<String>,
    },

    /// 20-day EMA of the close.
    Indicators {
        #[arg(long)]
        symbol: String,

        /// First day of the chart (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        start_date: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = stock_dash_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let client = YahooClient::from_settings(&settings)?;

    tracing::debug!(command = ?args.command, "running dashboard action");

    // Running the command is the click.
    let trigger = Trigger::clicks(1);

    let output = match &args.command {
        Command::Info { symbol } => handlers::company_info(&client, trigger, Some(symbol.as_str())).await,
        Command::Price { symbol, start_date } => {
            let start_date = resolve_start_date(start_date.as_deref());
            handlers::price_series(&client, trigger, Some(symbol.as_str()), Some(start_date.as_str())).await
        }
        Command::Indicators { symbol, start_date } => {
            let start_date = resolve_start_date(start_date.as_deref());
            handlers::indicators(&client, trigger, Some(symbol.as_str()), Some(start_date.as_str())).await
        }
    };

    println!("{}", render(&output)?);

    if output.state == HandlerState::Failed {
        let err = anyhow::anyhow!("{:?} failed: {}", args.command, output.text().unwrap_or_default());
        sentry_anyhow::capture_anyhow(&err);
        return Err(err);
    }
    Ok(())
}

fn resolve_start_date(arg: Option<&str>) -> String {
    match arg {
        Some(s) => s.to_string(),
        None => format_date(today_local()),
    }
}

fn render(output: &HandlerOutput) -> anyhow::Result<String> {
    Ok(match &output.view {
        View::Message { text } => text.clone(),
        View::Company(company) => serde_json::to_string_pretty(company)?,
        View::Chart { figure } => serde_json::to_string_pretty(figure)?,
    })
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
