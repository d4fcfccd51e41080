pub mod bars;
pub mod profile;
pub mod ticker;

pub use bars::{DailyBar, PriceSeries};
pub use profile::CompanyProfile;
pub use ticker::TickerSymbol;
