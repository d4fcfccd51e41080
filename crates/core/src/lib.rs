pub mod chart;
pub mod domain;
pub mod handlers;
pub mod indicators;
pub mod market_data;
pub mod time;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub sentry_dsn: Option<String>,
        pub market_data_base_url: Option<String>,
        pub yahoo_crumb: Option<String>,
        pub port: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                market_data_base_url: std::env::var("MARKET_DATA_BASE_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                yahoo_crumb: std::env::var("YAHOO_CRUMB")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                port: std::env::var("PORT").ok(),
            })
        }

        pub fn port(&self) -> anyhow::Result<u16> {
            match self.port.as_deref() {
                Some(p) => p
                    .trim()
                    .parse()
                    .with_context(|| format!("PORT must be a valid port number (got {p:?})")),
                None => Ok(3000),
            }
        }
    }

}
