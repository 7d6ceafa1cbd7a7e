use chrono::NaiveDate;
use csv::StringRecord;

use crate::{
    models::{bar::Bar, request_params::BarsRequestParams},
    providers::{ProviderError, ProviderId, errors::MalformedSnafu},
};

/// Positions of the columns of interest, resolved from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub open: usize,
    pub high: usize,
    pub low: usize,
    pub close: usize,
    pub volume: Option<usize>,
}

impl ColumnMap {
    /// Case-insensitive header lookup. `volume` may be absent.
    pub fn resolve(header: &StringRecord) -> Result<Self, String> {
        let names: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |col: &str| names.iter().position(|n| n == col);
        let require = |col: &str| find(col).ok_or_else(|| format!("missing column {col}"));

        Ok(Self {
            date: require("date")?,
            open: require("open")?,
            high: require("high")?,
            low: require("low")?,
            close: require("close")?,
            volume: find("volume"),
        })
    }

    fn bar_from(&self, record: &StringRecord) -> Option<Bar> {
        let price = |i: usize| record.get(i)?.trim().parse::<f64>().ok();
        let date = NaiveDate::parse_from_str(record.get(self.date)?.trim(), "%Y-%m-%d").ok()?;
        let volume = self.volume.and_then(price);

        // any unparseable price skips the row
        Bar::from_raw(
            date,
            Some(price(self.open)?),
            Some(price(self.high)?),
            Some(price(self.low)?),
            Some(price(self.close)?),
            volume,
        )
    }
}

/// Parses a Stooq CSV body, keeping only rows dated inside the request window.
///
/// This is the one tier that filters while parsing rather than afterwards.
pub fn parse_stooq_csv(text: &str, params: &BarsRequestParams) -> Result<Vec<Bar>, ProviderError> {
    let provider = ProviderId::CsvProvider;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.trim().as_bytes());

    let header = reader
        .headers()
        .map_err(|e| {
            MalformedSnafu {
                provider,
                message: e.to_string(),
            }
            .build()
        })?
        .clone();
    let columns =
        ColumnMap::resolve(&header).map_err(|message| MalformedSnafu { provider, message }.build())?;

    Ok(reader
        .records()
        .filter_map(Result::ok)
        .filter_map(|record| columns.bar_from(&record))
        .filter(|bar| params.contains(bar.date))
        .collect())
}
