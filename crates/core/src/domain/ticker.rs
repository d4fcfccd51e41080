use serde::{Deserialize, Serialize};
use std::fmt;

/// A ticker as typed by the user, trimmed and upper-cased.
///
/// Only emptiness is checked locally; whether the symbol actually trades is
/// for the market data provider to decide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickerSymbol(String);

impl TickerSymbol {
    pub fn parse(raw: &str) -> Option<Self> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }
        Some(Self(s.to_ascii_uppercase()))
    }

    /// Accepts the optional form a text input yields.
    pub fn from_input(raw: Option<&str>) -> Option<Self> {
        raw.and_then(Self::parse)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
