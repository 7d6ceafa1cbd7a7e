use chrono::DateTime;
use serde::Deserialize;

use crate::models::bar::Bar;

#[derive(Deserialize, Debug)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Deserialize, Debug)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
pub struct ChartError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    #[serde(default)]
    pub indicators: Option<Indicators>,
}

#[derive(Deserialize, Debug)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Option<Vec<QuoteArrays>>,
}

/// Parallel per-field arrays; position `i` belongs to `timestamp[i]`.
#[derive(Deserialize, Debug, Default)]
pub struct QuoteArrays {
    #[serde(default)]
    pub open: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub high: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub low: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub close: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub volume: Option<Vec<Option<f64>>>,
}

fn at(values: &Option<Vec<Option<f64>>>, i: usize) -> Option<f64> {
    values.as_ref().and_then(|v| v.get(i).copied().flatten())
}

impl ChartResponse {
    /// Vendor-reported error, if any.
    pub fn error_message(&self) -> Option<String> {
        self.chart.error.as_ref().map(|e| {
            format!(
                "{}: {}",
                e.code.as_deref().unwrap_or("unknown"),
                e.description.as_deref().unwrap_or("")
            )
        })
    }

    /// Zips the first result's timestamps with its first quote block.
    ///
    /// Only positions below `min(len(timestamp), len(close))` are considered;
    /// a position without a close or any other price is dropped.
    pub fn into_bars(self) -> Vec<Bar> {
        let Some(result) = self.chart.result.and_then(|r| r.into_iter().next()) else {
            return Vec::new();
        };
        let timestamps = result.timestamp.unwrap_or_default();
        let quote = result
            .indicators
            .and_then(|i| i.quote)
            .and_then(|q| q.into_iter().next())
            .unwrap_or_default();

        let closes = quote.close.as_ref().map_or(0, Vec::len);
        let n = timestamps.len().min(closes);

        (0..n)
            .filter_map(|i| {
                let close = at(&quote.close, i)?;
                let date = DateTime::from_timestamp(timestamps[i], 0)?.date_naive();
                Bar::from_raw(
                    date,
                    at(&quote.open, i),
                    at(&quote.high, i),
                    at(&quote.low, i),
                    Some(close),
                    at(&quote.volume, i),
                )
            })
            .collect()
    }
}
