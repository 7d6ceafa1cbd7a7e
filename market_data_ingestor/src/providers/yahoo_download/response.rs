use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::{
    models::bar::Bar,
    providers::{ProviderError, ProviderId, errors::MalformedSnafu},
};

const REQUIRED_COLUMNS: [&str; 5] = ["Date", "Open", "High", "Low", "Close"];

/// One row of the download CSV, keyed by header name.
///
/// Yahoo writes `null` (and occasionally `NaN`) for missing values; both end
/// up as `None` or a non-finite number and are rejected by [`Bar::from_raw`].
#[derive(Deserialize, Debug)]
pub struct DownloadRow {
    #[serde(rename = "Date", default, deserialize_with = "csv::invalid_option")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "Open", default, deserialize_with = "csv::invalid_option")]
    pub open: Option<f64>,
    #[serde(rename = "High", default, deserialize_with = "csv::invalid_option")]
    pub high: Option<f64>,
    #[serde(rename = "Low", default, deserialize_with = "csv::invalid_option")]
    pub low: Option<f64>,
    #[serde(rename = "Close", default, deserialize_with = "csv::invalid_option")]
    pub close: Option<f64>,
    #[serde(rename = "Volume", default, deserialize_with = "csv::invalid_option")]
    pub volume: Option<f64>,
}

impl DownloadRow {
    fn into_bar(self) -> Option<Bar> {
        Bar::from_raw(
            self.date?,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
        )
    }
}

/// Parses a download payload into canonical bars.
///
/// The header must carry `Date/Open/High/Low/Close`; `Volume` and any extra
/// columns (such as `Adj Close`) are optional. Rows that fail to deserialize
/// or miss a price are dropped.
pub fn parse_download_csv(text: &str) -> Result<Vec<Bar>, ProviderError> {
    let provider = ProviderId::Primary;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| {
            MalformedSnafu {
                provider,
                message: e.to_string(),
            }
            .build()
        })?
        .clone();

    if let Some(missing) = REQUIRED_COLUMNS
        .into_iter()
        .find(|col| !headers.iter().any(|h| h == *col))
    {
        return MalformedSnafu {
            provider,
            message: format!("missing column {missing}"),
        }
        .fail();
    }

    let mut bars = Vec::new();
    for (line, row) in reader.deserialize::<DownloadRow>().enumerate() {
        match row {
            Ok(row) => {
                if let Some(bar) = row.into_bar() {
                    bars.push(bar);
                }
            }
            Err(e) => debug!(line, error = %e, "skipping unreadable download row"),
        }
    }

    Ok(bars)
}
