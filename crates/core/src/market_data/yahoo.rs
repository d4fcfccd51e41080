use crate::config::Settings;
use crate::domain::{CompanyProfile, PriceSeries, TickerSymbol};
use crate::market_data::types::{ChartResponse, QuoteSummaryResponse};
use crate::market_data::{MarketDataClient, ProviderError};
use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::StatusCode;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_COOKIE_URL: &str = "https://fc.yahoo.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RETRIES: u32 = 1;
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) stock-dash/0.1";

const CHART_PATH: &str = "/v8/finance/chart";
const QUOTE_SUMMARY_PATH: &str = "/v10/finance/quoteSummary";
const CRUMB_PATH: &str = "/v1/test/getcrumb";
const PROFILE_MODULES: &str = "price,assetProfile";

#[derive(Debug)]
pub struct YahooClient {
    http: reqwest::Client,
    base_url: String,
    cookie_url: String,
    retries: u32,
    auto_adjust: bool,

    // quoteSummary rejects requests without a crumb tied to the session cookie.
    crumb: tokio::sync::Mutex<Option<String>>,
    crumb_override: Option<String>,
}

impl YahooClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let base_url = settings
            .market_data_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let cookie_url = std::env::var("MARKET_DATA_COOKIE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COOKIE_URL.to_string());

        let timeout_secs = std::env::var("MARKET_DATA_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let retries = std::env::var("MARKET_DATA_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_RETRIES)
            .max(1);

        let auto_adjust = std::env::var("MARKET_DATA_AUTO_ADJUST")
            .ok()
            .map(|s| parse_bool(&s))
            .unwrap_or(true);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .context("failed to build market data http client")?;

        Ok(Self {
            http,
            base_url,
            cookie_url,
            retries,
            auto_adjust,
            crumb: tokio::sync::Mutex::new(None),
            crumb_override: settings.yahoo_crumb.clone(),
        })
    }

    pub fn with_cookie_url(mut self, cookie_url: impl Into<String>) -> Self {
        self.cookie_url = cookie_url.into();
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries.max(1);
        self
    }

    fn url(&self, path: &str, symbol: &TickerSymbol) -> String {
        format!(
            "{}{}/{}",
            self.base_url.trim_end_matches('/'),
            path,
            urlencoding::encode(symbol.as_str())
        )
    }

    async fn get_text(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<(StatusCode, String), ProviderError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let res = self.http.get(url).query(query).send().await;
            let res = match res {
                Ok(r) => r,
                Err(err) => {
                    if attempt >= self.retries {
                        return Err(ProviderError::transport(err));
                    }
                    let backoff = Duration::from_secs(1 << (attempt - 1));
                    tracing::warn!(attempt, ?backoff, %url, error = %err, "market data request failed; retrying");
                    tokio::time::sleep(backoff).await;
                    continue;
                }
            };

            let status = res.status();
            let text = res.text().await.map_err(ProviderError::transport)?;
            return Ok((status, text));
        }
    }

    async fn crumb(&self) -> Result<String, ProviderError> {
        if let Some(c) = &self.crumb_override {
            return Ok(c.clone());
        }

        let mut guard = self.crumb.lock().await;
        if let Some(c) = guard.as_ref() {
            return Ok(c.clone());
        }

        // The cookie endpoint answers 404 but still sets the session cookie.
        if let Err(err) = self.http.get(&self.cookie_url).send().await {
            tracing::warn!(error = %err, cookie_url = %self.cookie_url, "cookie priming request failed");
        }

        let url = format!("{}{}", self.base_url.trim_end_matches('/'), CRUMB_PATH);
        let (status, body) = self.get_text(&url, &[]).await?;
        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                detail: "crumb request rejected".to_string(),
            });
        }
        let crumb = parse_crumb(&body)
            .ok_or_else(|| ProviderError::decode(format!("unexpected crumb body: {body}")))?;

        *guard = Some(crumb.clone());
        Ok(crumb)
    }

    async fn invalidate_crumb(&self) {
        *self.crumb.lock().await = None;
    }

    async fn fetch_summary(&self, symbol: &TickerSymbol) -> Result<(StatusCode, String), ProviderError> {
        let url = self.url(QUOTE_SUMMARY_PATH, symbol);
        let crumb = self.crumb().await?;
        let query = [
            ("modules", PROFILE_MODULES.to_string()),
            ("crumb", crumb),
        ];
        self.get_text(&url, &query).await
    }
}

#[async_trait::async_trait]
impl MarketDataClient for YahooClient {
    fn provider_name(&self) -> &'static str {
        "yahoo_finance"
    }

    async fn fetch_profile(&self, symbol: &TickerSymbol) -> Result<CompanyProfile, ProviderError> {
        let (mut status, mut body) = self.fetch_summary(symbol).await?;

        if status == StatusCode::UNAUTHORIZED && self.crumb_override.is_none() {
            tracing::warn!(%symbol, "quoteSummary rejected crumb; refreshing once");
            self.invalidate_crumb().await;
            (status, body) = self.fetch_summary(symbol).await?;
        }

        if status == StatusCode::NOT_FOUND {
            return match serde_json::from_str::<QuoteSummaryResponse>(&body) {
                Ok(resp) => resp.into_profile(symbol.as_str()),
                Err(_) => Err(ProviderError::NotFound {
                    symbol: symbol.to_string(),
                }),
            };
        }
        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                detail: truncate(&body, 200),
            });
        }

        serde_json::from_str::<QuoteSummaryResponse>(&body)
            .map_err(ProviderError::decode)?
            .into_profile(symbol.as_str())
    }

    async fn fetch_history(
        &self,
        symbol: &TickerSymbol,
        start_date: NaiveDate,
    ) -> Result<PriceSeries, ProviderError> {
        let url = self.url(CHART_PATH, symbol);
        let (period1, period2) = period_bounds(start_date, Utc::now());
        let query = [
            ("period1", period1.to_string()),
            ("period2", period2.to_string()),
            ("interval", "1d".to_string()),
            ("events", "div,splits".to_string()),
        ];

        let (status, body) = self.get_text(&url, &query).await?;

        if status.is_client_error() {
            // Unknown symbols (404) and ranges with no sessions (400) both
            // surface as "no data".
            match serde_json::from_str::<ChartResponse>(&body) {
                Ok(resp) if resp.reports_no_data() => {
                    tracing::debug!(%symbol, %start_date, %status, "provider reported no data");
                    return Ok(PriceSeries::default());
                }
                Err(_) if status == StatusCode::NOT_FOUND => return Ok(PriceSeries::default()),
                _ => {}
            }
        }
        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                detail: truncate(&body, 200),
            });
        }

        let series = serde_json::from_str::<ChartResponse>(&body)
            .map_err(ProviderError::decode)?
            .into_series(start_date, self.auto_adjust)?;
        tracing::debug!(%symbol, %start_date, bars = series.len(), "fetched daily history");
        Ok(series)
    }
}

/// `period1`/`period2` query values: midnight UTC of the start date through now.
fn period_bounds(start_date: NaiveDate, now: DateTime<Utc>) -> (i64, i64) {
    let start = start_date.and_time(chrono::NaiveTime::default()).and_utc().timestamp();
    (start, now.timestamp().max(start))
}

fn parse_crumb(body: &str) -> Option<String> {
    let t = body.trim();
    if t.is_empty() || t.len() >= 100 || t.contains(char::is_whitespace) || t.contains('<') {
        return None;
    }
    Some(t.to_string())
}

fn parse_bool(s: &str) -> bool {
    !matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}
