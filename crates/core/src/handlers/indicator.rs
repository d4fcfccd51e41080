use crate::chart::{line_chart, Figure, Trace};
use crate::domain::{PriceSeries, TickerSymbol};
use crate::handlers::{HandlerOutput, Trigger};
use crate::indicators::{ema, EMA_SPAN};
use crate::market_data::MarketDataClient;
use crate::time::market_date::parse_start_date_opt;

pub const PROMPT: &str = "Enter a stock code, select a start date, and click 'Indicators'.";

const EMA_SERIES_NAME: &str = "EMA_20";

pub async fn indicators(
    client: &dyn MarketDataClient,
    trigger: Trigger,
    symbol: Option<&str>,
    start_date: Option<&str>,
) -> HandlerOutput {
    let (Some(symbol), Some(start_date)) = (
        TickerSymbol::from_input(symbol),
        parse_start_date_opt(start_date),
    ) else {
        return HandlerOutput::idle(PROMPT);
    };
    if !trigger.fired() {
        return HandlerOutput::idle(PROMPT);
    }

    tracing::info!(%symbol, %start_date, ema_span = EMA_SPAN, "fetching series for indicators");
    match client.fetch_history(&symbol, start_date).await {
        Ok(series) if series.is_empty() => HandlerOutput::no_data(),
        Ok(series) => HandlerOutput::chart(ema_figure(&symbol, &series)),
        Err(err) => {
            tracing::warn!(%symbol, %start_date, error = %err, "price history lookup failed");
            HandlerOutput::failed(&symbol, &err)
        }
    }
}

pub fn ema_figure(symbol: &TickerSymbol, series: &PriceSeries) -> Figure {
    line_chart(
        format!("{symbol} 20-Day EMA"),
        vec![Trace::line(
            EMA_SERIES_NAME,
            series.dates(),
            ema(&series.closes(), EMA_SPAN).into_iter().map(Some).collect(),
        )],
    )
}
