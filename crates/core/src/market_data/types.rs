//! Yahoo Finance response shapes and their conversion into domain types.

use crate::domain::{CompanyProfile, DailyBar, PriceSeries};
use crate::market_data::ProviderError;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

const NOT_FOUND_CODE: &str = "Not Found";
const BAD_REQUEST_CODE: &str = "Bad Request";

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
}

impl ApiError {
    fn is_not_found(&self) -> bool {
        self.code.eq_ignore_ascii_case(NOT_FOUND_CODE)
    }

    /// A range with no sessions in it, e.g. a start date after the last
    /// trading day. Yahoo reports these as `400 Bad Request`.
    fn is_no_data(&self) -> bool {
        self.code.eq_ignore_ascii_case(BAD_REQUEST_CODE)
            || self.description.contains("Data doesn't exist")
            || self.description.contains("No data found")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartEnvelope,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartEnvelope {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub meta: Option<ChartMeta>,
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    #[serde(default)]
    pub indicators: Option<ChartIndicators>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<ChartQuote>,
    #[serde(default)]
    pub adjclose: Vec<ChartAdjClose>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartQuote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartAdjClose {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

impl ChartResponse {
    /// Whether the provider said there is nothing to chart, rather than
    /// failing.
    pub fn reports_no_data(&self) -> bool {
        self.chart
            .error
            .as_ref()
            .is_some_and(|e| e.is_not_found() || e.is_no_data())
    }

    /// Converts to a series, keeping only bars on or after `start_date`.
    ///
    /// With `auto_adjust`, open and close are rescaled by `adjclose / close` so
    /// splits and dividends don't show up as price jumps.
    pub fn into_series(
        self,
        start_date: NaiveDate,
        auto_adjust: bool,
    ) -> Result<PriceSeries, ProviderError> {
        if self.reports_no_data() {
            return Ok(PriceSeries::default());
        }
        if let Some(err) = &self.chart.error {
            return Err(ProviderError::Decode {
                detail: format!("chart error {}: {}", err.code, err.description),
            });
        }

        let Some(result) = self.chart.result.and_then(|r| r.into_iter().next()) else {
            return Ok(PriceSeries::default());
        };
        let (Some(timestamps), Some(indicators)) = (result.timestamp, result.indicators) else {
            return Ok(PriceSeries::default());
        };
        let Some(quote) = indicators.quote.into_iter().next() else {
            return Ok(PriceSeries::default());
        };
        let adjclose = indicators
            .adjclose
            .into_iter()
            .next()
            .map(|a| a.adjclose)
            .unwrap_or_default();
        let offset = result.meta.map(|m| m.gmtoffset).unwrap_or(0);

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, ts) in timestamps.into_iter().enumerate() {
            // A session needs a close; the open may be missing.
            let Some(Some(close)) = quote.close.get(i) else {
                continue;
            };
            let open = quote.open.get(i).copied().flatten();
            let date = DateTime::from_timestamp(ts + offset, 0)
                .ok_or_else(|| ProviderError::decode(format!("invalid timestamp {ts}")))?
                .date_naive();

            let factor = match adjclose.get(i) {
                Some(Some(adj)) if auto_adjust && *close != 0.0 => adj / close,
                _ => 1.0,
            };

            bars.push(DailyBar {
                date,
                open: open.map(|o| o * factor),
                close: close * factor,
            });
        }

        Ok(PriceSeries::new(bars).since(start_date))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    pub quote_summary: QuoteSummaryEnvelope,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteSummaryEnvelope {
    #[serde(default)]
    pub result: Option<Vec<QuoteSummaryResult>>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteSummaryResult {
    #[serde(default)]
    pub price: Option<PriceModule>,
    #[serde(rename = "assetProfile", default)]
    pub asset_profile: Option<AssetProfileModule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceModule {
    #[serde(rename = "longName", default)]
    pub long_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetProfileModule {
    #[serde(rename = "longName", default)]
    pub long_name: Option<String>,
    #[serde(rename = "longBusinessSummary", default)]
    pub long_business_summary: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl QuoteSummaryResponse {
    pub fn into_profile(self, symbol: &str) -> Result<CompanyProfile, ProviderError> {
        if let Some(err) = &self.quote_summary.error {
            if err.is_not_found() {
                return Err(ProviderError::NotFound {
                    symbol: symbol.to_string(),
                });
            }
            return Err(ProviderError::Decode {
                detail: format!("quoteSummary error {}: {}", err.code, err.description),
            });
        }

        let result = self
            .quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| ProviderError::NotFound {
                symbol: symbol.to_string(),
            })?;

        let profile = result.asset_profile;
        let name = result
            .price
            .and_then(|p| p.long_name)
            .or_else(|| profile.as_ref().and_then(|p| p.long_name.clone()));
        let (logo_url, description) = match profile {
            Some(p) => (p.logo_url, p.long_business_summary),
            None => (None, None),
        };

        Ok(CompanyProfile::from_parts(name, logo_url, description))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2024-01-02 14:30 UTC and the three following sessions, New York offset.
    fn chart_json() -> serde_json::Value {
        json!({
            "chart": {
                "result": [{
                    "meta": {"symbol": "AAPL", "gmtoffset": -18000},
                    "timestamp": [1704205800, 1704292200, 1704378600, 1704465000],
                    "indicators": {
                        "quote": [{
                            "open": [100.0, null, 104.0, 105.0],
                            "close": [102.0, 103.0, 106.0, null],
                            "high": [103.0, 104.0, 107.0, null],
                            "low": [99.0, 101.0, 103.0, null],
                            "volume": [10, 11, 12, null]
                        }],
                        "adjclose": [{"adjclose": [51.0, 51.5, 53.0, null]}]
                    }
                }],
                "error": null
            }
        })
    }

    #[test]
    fn chart_keeps_close_only_bars_and_dates_in_exchange_time() {
        let resp: ChartResponse = serde_json::from_value(chart_json()).unwrap();
        let series = resp.into_series(date(2024, 1, 1), false).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(
            series.dates(),
            vec![date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 4)]
        );
        assert_eq!(series.opens(), vec![Some(100.0), None, Some(104.0)]);
        assert_eq!(series.closes(), vec![102.0, 103.0, 106.0]);
    }

    #[test]
    fn chart_auto_adjust_scales_open_and_close() {
        let resp: ChartResponse = serde_json::from_value(chart_json()).unwrap();
        let series = resp.into_series(date(2024, 1, 1), true).unwrap();
        assert!((series.bars[0].close - 51.0).abs() < 1e-9);
        assert!((series.bars[0].open.unwrap() - 50.0).abs() < 1e-9);
        assert_eq!(series.bars[1].open, None);
    }

    #[test]
    fn chart_drops_bars_before_start() {
        let resp: ChartResponse = serde_json::from_value(chart_json()).unwrap();
        let series = resp.into_series(date(2024, 1, 4), false).unwrap();
        assert_eq!(series.dates(), vec![date(2024, 1, 4)]);
    }

    #[test]
    fn chart_not_found_is_empty_series() {
        let v = json!({
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        });
        let resp: ChartResponse = serde_json::from_value(v).unwrap();
        assert!(resp.into_series(date(2024, 1, 1), true).unwrap().is_empty());
    }

    #[test]
    fn chart_range_without_sessions_is_empty_series() {
        let v = json!({
            "chart": {
                "result": null,
                "error": {
                    "code": "Bad Request",
                    "description": "Data doesn't exist for startDate = 1893456000, endDate = 1893456000"
                }
            }
        });
        let resp: ChartResponse = serde_json::from_value(v).unwrap();
        assert!(resp.reports_no_data());
        assert!(resp.into_series(date(2030, 1, 1), true).unwrap().is_empty());
    }

    #[test]
    fn chart_other_errors_are_decode_failures() {
        let v = json!({
            "chart": {
                "result": null,
                "error": {"code": "Internal Server Error", "description": "backend timeout"}
            }
        });
        let resp: ChartResponse = serde_json::from_value(v).unwrap();
        assert!(!resp.reports_no_data());
        let err = resp.into_series(date(2024, 1, 1), true).unwrap_err();
        assert!(matches!(err, ProviderError::Decode { .. }));
    }

    #[test]
    fn chart_without_timestamps_is_empty_series() {
        let v = json!({
            "chart": {
                "result": [{"meta": {"gmtoffset": 0}, "indicators": {"quote": [{}]}}],
                "error": null
            }
        });
        let resp: ChartResponse = serde_json::from_value(v).unwrap();
        assert!(resp.into_series(date(2024, 1, 1), true).unwrap().is_empty());
    }

    #[test]
    fn summary_reads_name_logo_and_description() {
        let v = json!({
            "quoteSummary": {
                "result": [{
                    "price": {"longName": "Apple Inc."},
                    "assetProfile": {
                        "longBusinessSummary": "Designs phones.",
                        "logo_url": "https://logo.example/aapl.png"
                    }
                }],
                "error": null
            }
        });
        let resp: QuoteSummaryResponse = serde_json::from_value(v).unwrap();
        let p = resp.into_profile("AAPL").unwrap();
        assert_eq!(p.name, "Apple Inc.");
        assert_eq!(p.logo_url, "https://logo.example/aapl.png");
        assert_eq!(p.description, "Designs phones.");
    }

    #[test]
    fn summary_missing_fields_use_defaults() {
        let v = json!({
            "quoteSummary": {"result": [{"price": {}}], "error": null}
        });
        let resp: QuoteSummaryResponse = serde_json::from_value(v).unwrap();
        let p = resp.into_profile("XYZ").unwrap();
        assert_eq!(p.name, "N/A");
        assert_eq!(p.logo_url, "");
        assert_eq!(p.description, "No description available.");
    }

    #[test]
    fn summary_not_found_is_error() {
        let v = json!({
            "quoteSummary": {
                "result": null,
                "error": {"code": "Not Found", "description": "Quote not found for symbol: NOPE"}
            }
        });
        let resp: QuoteSummaryResponse = serde_json::from_value(v).unwrap();
        let err = resp.into_profile("NOPE").unwrap_err();
        assert!(err.is_not_found());
    }
}
