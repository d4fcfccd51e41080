pub mod error;
pub mod types;
pub mod yahoo;

use crate::domain::{CompanyProfile, PriceSeries, TickerSymbol};
use chrono::NaiveDate;

pub use error::ProviderError;
pub use yahoo::YahooClient;

#[async_trait::async_trait]
pub trait MarketDataClient: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_profile(&self, symbol: &TickerSymbol) -> Result<CompanyProfile, ProviderError>;

    /// Daily bars from `start_date` through today. Unknown symbols and ranges
    /// without trading come back as an empty series, not an error.
    async fn fetch_history(
        &self,
        symbol: &TickerSymbol,
        start_date: NaiveDate,
    ) -> Result<PriceSeries, ProviderError>;
}
