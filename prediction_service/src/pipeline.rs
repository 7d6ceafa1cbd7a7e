//! Request flows: fetch -> filter -> infer -> assemble.

use chrono::NaiveDate;
use direction_inference::{Inference, InferenceDispatcher, history::inference_window};
use market_data_ingestor::{
    chain::{ChainError, ProviderChain},
    models::{bar_series::BarSeries, request_params::BarsRequestParams},
    range_filter::filter_range,
};
use thiserror::Error;
use tracing::info;

use crate::models::PredictionResult;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Every provider tier came back empty.
    #[error("no data for {0}")]
    NoData(String),

    /// Anything else; answered with a best-effort body at the boundary.
    #[error("internal fault: {0}")]
    Internal(String),
}

impl From<ChainError> for PipelineError {
    fn from(e: ChainError) -> Self {
        match e {
            ChainError::NoDataFound { symbol } => PipelineError::NoData(symbol),
        }
    }
}

/// Builds the request window from raw query values.
///
/// Missing or blank bounds default to the year ending `today`. Accepts plain
/// dates and date-times (the time part is ignored).
pub fn resolve_window(
    symbol: &str,
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
) -> Result<BarsRequestParams, PipelineError> {
    let default = BarsRequestParams::trailing_year(symbol, today);
    let start = parse_bound(start)?.unwrap_or(default.start);
    let end = parse_bound(end)?.unwrap_or(default.end);
    Ok(BarsRequestParams::new(symbol, start, end))
}

fn parse_bound(raw: Option<&str>) -> Result<Option<NaiveDate>, PipelineError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let date_part = raw.split(['T', ' ']).next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| PipelineError::Internal(format!("bad date {raw:?}: {e}")))
}

pub struct PredictionService {
    chain: ProviderChain,
    dispatcher: InferenceDispatcher,
}

impl PredictionService {
    pub fn new(chain: ProviderChain, dispatcher: InferenceDispatcher) -> Self {
        Self { chain, dispatcher }
    }

    /// Bars for `params`, clipped to the window (or unclipped if clipping
    /// would leave nothing), plus the tier that supplied them.
    async fn fetch_window(
        &self,
        params: &BarsRequestParams,
    ) -> Result<(BarSeries, &'static str), PipelineError> {
        let outcome = self.chain.fetch(params).await?;
        let series = filter_range(outcome.series, params.start, params.end);
        Ok((series, outcome.source.as_str()))
    }

    pub async fn predict(
        &self,
        params: &BarsRequestParams,
    ) -> Result<PredictionResult, PipelineError> {
        let (series, source) = self.fetch_window(params).await?;
        let closes = series.closes();
        let window = inference_window(&closes);
        let Inference { signal, backend } = self.dispatcher.predict(window);

        info!(
            symbol = %params.symbol,
            source,
            %backend,
            points = window.len(),
            direction = ?signal.direction,
            confidence = signal.confidence,
            "prediction served"
        );

        Ok(PredictionResult {
            direction: signal.direction,
            confidence: signal.confidence,
            symbol: params.symbol.to_uppercase(),
            date: series
                .last_date()
                .unwrap_or(params.end)
                .to_string(),
            source: source.to_string(),
            points: window.len(),
        })
    }

    pub async fn ohlc(&self, params: &BarsRequestParams) -> Result<BarSeries, PipelineError> {
        let (series, source) = self.fetch_window(params).await?;
        info!(symbol = %params.symbol, source, rows = series.len(), "ohlc served");
        Ok(series)
    }

    /// Inference over an already-extracted close sequence (uploads).
    pub fn predict_closes(&self, closes: &[f64]) -> Inference {
        self.dispatcher.predict(closes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn missing_bounds_default_to_trailing_year() {
        let p = resolve_window("AAPL", None, Some(""), d(2024, 6, 30)).unwrap();
        assert_eq!((p.start, p.end), (d(2023, 7, 1), d(2024, 6, 30)));
    }

    #[test]
    fn reversed_bounds_are_swapped() {
        let p = resolve_window("AAPL", Some("2024-05-01"), Some("2024-01-01"), d(2024, 6, 30))
            .unwrap();
        assert_eq!((p.start, p.end), (d(2024, 1, 1), d(2024, 5, 1)));
    }

    #[test]
    fn datetime_bounds_keep_the_date() {
        let p = resolve_window(
            "AAPL",
            Some("2024-01-02T09:30:00"),
            Some("2024-01-31 16:00:00"),
            d(2024, 6, 30),
        )
        .unwrap();
        assert_eq!((p.start, p.end), (d(2024, 1, 2), d(2024, 1, 31)));
    }

    #[test]
    fn garbage_bound_is_internal() {
        let err = resolve_window("AAPL", Some("yesterday"), None, d(2024, 6, 30)).unwrap_err();
        assert!(matches!(err, PipelineError::Internal(_)));
    }

    #[test]
    fn exhausted_chain_is_no_data() {
        let no_data = PipelineError::from(ChainError::NoDataFound {
            symbol: "X".into(),
        });
        assert!(matches!(no_data, PipelineError::NoData(s) if s == "X"));
    }
}
