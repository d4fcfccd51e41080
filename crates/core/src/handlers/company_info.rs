use crate::domain::TickerSymbol;
use crate::handlers::{CompanyView, HandlerOutput, HandlerState, Trigger, View, LOGO_HEIGHT};
use crate::market_data::MarketDataClient;

pub const PROMPT: &str = "Enter a stock code and click submit.";

pub async fn company_info(
    client: &dyn MarketDataClient,
    trigger: Trigger,
    symbol: Option<&str>,
) -> HandlerOutput {
    let Some(symbol) = TickerSymbol::from_input(symbol).filter(|_| trigger.fired()) else {
        return HandlerOutput::idle(PROMPT);
    };

    tracing::info!(%symbol, provider = client.provider_name(), "fetching company profile");
    match client.fetch_profile(&symbol).await {
        Ok(profile) => HandlerOutput {
            state: HandlerState::Rendered,
            view: View::Company(CompanyView {
                logo_url: profile.logo_url,
                logo_height: LOGO_HEIGHT.to_string(),
                name: profile.name,
                description: profile.description,
            }),
        },
        Err(err) => {
            tracing::warn!(%symbol, error = %err, "company profile lookup failed");
            HandlerOutput::failed(&symbol, &err)
        }
    }
}
