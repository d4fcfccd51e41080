use crate::chart::{line_chart, Figure, Trace};
use crate::domain::{PriceSeries, TickerSymbol};
use crate::handlers::{HandlerOutput, Trigger};
use crate::market_data::MarketDataClient;
use crate::time::market_date::parse_start_date_opt;

pub const PROMPT: &str = "Enter a stock code, select a start date, and click 'Stock Price'.";

pub async fn price_series(
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

    tracing::info!(%symbol, %start_date, "fetching price series");
    match client.fetch_history(&symbol, start_date).await {
        Ok(series) if series.is_empty() => HandlerOutput::no_data(),
        Ok(series) => HandlerOutput::chart(open_close_figure(&symbol, &series)),
        Err(err) => {
            tracing::warn!(%symbol, %start_date, error = %err, "price history lookup failed");
            HandlerOutput::failed(&symbol, &err)
        }
    }
}

pub fn open_close_figure(symbol: &TickerSymbol, series: &PriceSeries) -> Figure {
    let dates = series.dates();
    line_chart(
        format!("{symbol} Opening and Closing Prices"),
        vec![
            Trace::line("Open", dates.clone(), series.opens()),
            Trace::line("Close", dates, series.closes().into_iter().map(Some).collect()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{series, FakeMarketData};
    use crate::handlers::{HandlerState, NO_DATA_MESSAGE};
    use crate::market_data::ProviderError;

    #[tokio::test]
    async fn idle_without_trigger_or_inputs() {
        let fake = FakeMarketData::with_history(series(&[1.0, 2.0]));
        let cases = [
            (Trigger::default(), Some("AAPL"), Some("2024-01-01")),
            (Trigger::clicks(0), Some("AAPL"), Some("2024-01-01")),
            (Trigger::clicks(1), None, Some("2024-01-01")),
            (Trigger::clicks(1), Some(""), Some("2024-01-01")),
            (Trigger::clicks(1), Some("AAPL"), None),
            (Trigger::clicks(1), Some("AAPL"), Some("not a date")),
        ];
        for (trigger, sym, date) in cases {
            let out = price_series(&fake, trigger, sym, date).await;
            assert_eq!(out.state, HandlerState::Idle);
            assert_eq!(out.text(), Some(PROMPT));
        }
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn empty_history_gives_no_data_message() {
        let fake = FakeMarketData::with_history(PriceSeries::default());
        let out = price_series(&fake, Trigger::clicks(1), Some("AAPL"), Some("2024-01-01")).await;
        assert_eq!(out.state, HandlerState::EmptyResult);
        assert_eq!(out.text(), Some(NO_DATA_MESSAGE));
    }

    #[tokio::test]
    async fn start_after_last_bar_gives_no_data_message() {
        let fake = FakeMarketData::with_history(series(&[1.0, 2.0]));
        let out = price_series(&fake, Trigger::clicks(1), Some("AAPL"), Some("2030-01-01")).await;
        assert_eq!(out.text(), Some(NO_DATA_MESSAGE));
    }

    #[tokio::test]
    async fn renders_open_and_close_lines() {
        let fake = FakeMarketData::with_history(series(&[10.0, 11.0, 12.0]));
        let out = price_series(&fake, Trigger::clicks(2), Some("msft"), Some("2024-01-01")).await;
        assert_eq!(out.state, HandlerState::Rendered);

        let fig = out.figure().unwrap();
        assert_eq!(fig.layout.title.text, "MSFT Opening and Closing Prices");
        assert_eq!(fig.data.len(), 2);
        assert_eq!(fig.data[0].name, "Open");
        assert_eq!(fig.data[0].y, vec![Some(9.5), Some(10.5), Some(11.5)]);
        assert_eq!(fig.data[1].name, "Close");
        assert_eq!(fig.data[1].y, vec![Some(10.0), Some(11.0), Some(12.0)]);
        assert_eq!(fig.data[0].x, fig.data[1].x);
    }

    #[tokio::test]
    async fn missing_open_leaves_a_gap_in_the_open_line() {
        let mut history = series(&[10.0, 11.0, 12.0]);
        history.bars[1].open = None;
        let fake = FakeMarketData::with_history(history);
        let out = price_series(&fake, Trigger::clicks(1), Some("MSFT"), Some("2024-01-01")).await;

        let fig = out.figure().unwrap();
        assert_eq!(fig.data[0].y, vec![Some(9.5), None, Some(11.5)]);
        assert_eq!(fig.data[1].y, vec![Some(10.0), Some(11.0), Some(12.0)]);
    }

    #[tokio::test]
    async fn repeated_calls_produce_identical_charts() {
        let fake = FakeMarketData::with_history(series(&[10.0, 11.0, 12.0]));
        let a = price_series(&fake, Trigger::clicks(1), Some("MSFT"), Some("2024-01-01")).await;
        let b = price_series(&fake, Trigger::clicks(2), Some("MSFT"), Some("2024-01-01")).await;
        assert_eq!(a, b);
        assert_eq!(fake.calls(), 2);
    }

    #[tokio::test]
    async fn provider_failure_is_rendered() {
        let fake = FakeMarketData::failing_history(ProviderError::Http {
            status: 503,
            detail: "unavailable".to_string(),
        });
        let out = price_series(&fake, Trigger::clicks(1), Some("MSFT"), Some("2024-01-01")).await;
        assert_eq!(out.state, HandlerState::Failed);
        assert_eq!(
            out.text(),
            Some("Could not load data for 'MSFT'. Please try again.")
        );
    }
}
