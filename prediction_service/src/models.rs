//! Response bodies.

use direction_inference::{Direction, Signal};
use market_data_ingestor::models::bar::Bar;
use serde::Serialize;

/// Answer of `GET /predict`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub direction: Direction,
    pub confidence: u8,
    pub symbol: String,
    pub date: String,
    pub source: String,
    pub points: usize,
}

impl PredictionResult {
    /// Best-effort body used when something unexpected went wrong.
    pub fn neutral(symbol: impl Into<String>, date: impl Into<String>) -> Self {
        let Signal {
            direction,
            confidence,
        } = Signal::NEUTRAL;
        Self {
            direction,
            confidence,
            symbol: symbol.into(),
            date: date.into(),
            source: String::new(),
            points: 0,
        }
    }
}

/// Answer of `POST /predict-file`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilePrediction {
    pub direction: Direction,
    pub confidence: u8,
    pub symbol: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OhlcRow {
    pub time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl From<&Bar> for OhlcRow {
    fn from(bar: &Bar) -> Self {
        Self {
            time: bar.date.to_string(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}

/// Answer of `GET /ohlc`. `error` is omitted on success.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OhlcResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    pub rows: Vec<OhlcRow>,
}

impl OhlcResponse {
    pub fn rows(rows: Vec<OhlcRow>) -> Self {
        Self { error: None, rows }
    }

    pub fn failed(code: &'static str) -> Self {
        Self {
            error: Some(code),
            rows: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

pub const NO_DATA: &str = "no_data";
pub const SERVICE_UNAVAILABLE: &str = "service_unavailable";
pub const NO_FILE: &str = "no_file";
pub const FILE_TOO_LARGE: &str = "file_too_large";

/// Either a prediction or a structured error, serialised without a tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Prediction(PredictionResult),
    Error(ErrorBody),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilePredictResponse {
    Prediction(FilePrediction),
    Error(ErrorBody),
}
