//! A collection of daily bars for a single symbol.

use chrono::NaiveDate;

use crate::models::bar::Bar;

/// Represents a complete set of daily bars for a single symbol.
///
/// Built fresh for every request and never shared between requests.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BarSeries {
    /// The symbol as it was requested (e.g., "AAPL").
    pub symbol: String,
    /// The collection of OHLCV bars.
    pub bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Closing prices in series order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Date of the final bar, if any.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// Stable ascending sort by date. Bars sharing a date keep their
    /// relative vendor order and are not deduplicated.
    pub fn sort_by_date(&mut self) {
        self.bars.sort_by_key(|b| b.date);
    }
}
