use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    /// Missing on sessions the provider only reports a close for.
    pub open: Option<f64>,
    pub close: f64,
}

/// Daily bars in ascending date order. Empty when the provider had nothing for
/// the symbol or the range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub bars: Vec<DailyBar>,
}

impl PriceSeries {
    pub fn new(mut bars: Vec<DailyBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self { bars }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn opens(&self) -> Vec<Option<f64>> {
        self.bars.iter().map(|b| b.open).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Drops bars dated before `start`.
    pub fn since(mut self, start: NaiveDate) -> Self {
        self.bars.retain(|b| b.date >= start);
        self
    }
}
