//! Canonical in-memory representation of a daily bar (OHLCV).
//!
//! This struct is the standard output of every [`DataProvider`](crate::providers::DataProvider)
//! implementation, whatever shape the vendor payload had.

use chrono::NaiveDate;

/// A single daily bar.
///
/// The four prices are always present and finite. Their relative order
/// (`low <= open <= high`, ...) is not checked: vendors occasionally ship
/// bars that violate it and those are passed through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Trading day.
    pub date: NaiveDate,

    /// Opening price.
    pub open: f64,

    /// Highest price during the day.
    pub high: f64,

    /// Lowest price during the day.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Shares traded. Zero when the vendor did not report a usable value.
    pub volume: u64,
}

impl Bar {
    /// Builds a bar from possibly-missing vendor values.
    ///
    /// Returns `None` if any of the four prices is absent, NaN or infinite.
    /// A missing, negative or non-finite volume becomes `0`.
    pub fn from_raw(
        date: NaiveDate,
        open: Option<f64>,
        high: Option<f64>,
        low: Option<f64>,
        close: Option<f64>,
        volume: Option<f64>,
    ) -> Option<Self> {
        let finite = |v: Option<f64>| v.filter(|x| x.is_finite());

        Some(Self {
            date,
            open: finite(open)?,
            high: finite(high)?,
            low: finite(low)?,
            close: finite(close)?,
            volume: volume_from(volume),
        })
    }
}

fn volume_from(raw: Option<f64>) -> u64 {
    match raw {
        Some(v) if v.is_finite() && v >= 0.0 => v.round() as u64,
        _ => 0,
    }
}
