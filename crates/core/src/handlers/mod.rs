//! The dashboard's three request handlers.
//!
//! Each handler is stateless: it checks its trigger and inputs, calls the
//! market data client at most once, and returns what to show. Every path ends
//! in a [`View`]; missing input, empty data and provider failures are all
//! rendered as text rather than surfaced as errors.

pub mod company_info;
pub mod indicator;
pub mod price_series;

use crate::chart::Figure;
use crate::domain::TickerSymbol;
use crate::market_data::ProviderError;
use serde::{Deserialize, Serialize};

pub use company_info::company_info;
pub use indicator::indicators;
pub use price_series::price_series;

pub const NO_DATA_MESSAGE: &str = "No data available for the given stock code and date.";

/// Logo display height in the company header.
pub const LOGO_HEIGHT: &str = "100px";

/// A button's click counter. Absent before the first click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub n_clicks: Option<u64>,
}

impl Trigger {
    pub fn clicks(n: u64) -> Self {
        Self { n_clicks: Some(n) }
    }

    pub fn fired(&self) -> bool {
        self.n_clicks.is_some_and(|n| n > 0)
    }
}

/// Where a single invocation ended up.
///
/// `AwaitingFetch` is only ever transient inside a handler; the rest are the
/// terminal states reported with the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerState {
    Idle,
    AwaitingFetch,
    Rendered,
    EmptyResult,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyView {
    pub logo_url: String,
    pub logo_height: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    Message { text: String },
    Company(CompanyView),
    Chart { figure: Figure },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerOutput {
    pub state: HandlerState,
    pub view: View,
}

impl HandlerOutput {
    pub(crate) fn message(state: HandlerState, text: impl Into<String>) -> Self {
        Self {
            state,
            view: View::Message { text: text.into() },
        }
    }

    pub(crate) fn idle(prompt: &str) -> Self {
        Self::message(HandlerState::Idle, prompt)
    }

    pub(crate) fn no_data() -> Self {
        Self::message(HandlerState::EmptyResult, NO_DATA_MESSAGE)
    }

    pub(crate) fn chart(figure: Figure) -> Self {
        Self {
            state: HandlerState::Rendered,
            view: View::Chart { figure },
        }
    }

    pub(crate) fn failed(symbol: &TickerSymbol, err: &ProviderError) -> Self {
        let text = if err.is_not_found() {
            format!("Stock code '{symbol}' was not found.")
        } else {
            format!("Could not load data for '{symbol}'. Please try again.")
        };
        Self::message(HandlerState::Failed, text)
    }

    /// The text shown, if this output is a plain message.
    pub fn text(&self) -> Option<&str> {
        match &self.view {
            View::Message { text } => Some(text),
            _ => None,
        }
    }

    pub fn figure(&self) -> Option<&Figure> {
        match &self.view {
            View::Chart { figure } => Some(figure),
            _ => None,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_fires_only_after_a_click() {
        assert!(!Trigger::default().fired());
        assert!(!Trigger::clicks(0).fired());
        assert!(Trigger::clicks(1).fired());
    }

    #[test]
    fn failure_message_distinguishes_unknown_symbol() {
        let sym = TickerSymbol::parse("nope").unwrap();
        let nf = HandlerOutput::failed(
            &sym,
            &ProviderError::NotFound {
                symbol: "NOPE".to_string(),
            },
        );
        assert_eq!(nf.state, HandlerState::Failed);
        assert_eq!(nf.text(), Some("Stock code 'NOPE' was not found."));

        let other = HandlerOutput::failed(
            &sym,
            &ProviderError::Transport {
                detail: "timeout".to_string(),
            },
        );
        assert_eq!(
            other.text(),
            Some("Could not load data for 'NOPE'. Please try again.")
        );
    }

    #[test]
    fn output_serializes_with_state_and_tagged_view() {
        let out = HandlerOutput::no_data();
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["state"], "empty_result");
        assert_eq!(v["view"]["kind"], "message");
        assert_eq!(v["view"]["text"], NO_DATA_MESSAGE);
    }
}
