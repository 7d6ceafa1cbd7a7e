//! Closing prices from an uploaded CSV.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("upload has neither a close nor an adj close column")]
    NoCloseColumn,

    #[error("upload has no usable close values")]
    NoData,
}

impl UploadError {
    /// Error code reported to the caller.
    pub fn code(&self) -> &'static str {
        match self {
            UploadError::NoCloseColumn => "no_close_column",
            UploadError::NoData => crate::models::NO_DATA,
        }
    }
}

/// Header lookup is case-insensitive; `close` wins over `adj close`.
fn close_column(header: &csv::StringRecord) -> Option<usize> {
    let names: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
    names
        .iter()
        .position(|n| n == "close")
        .or_else(|| names.iter().position(|n| n == "adj close"))
}

/// Extracts the close column of `text` in file order.
///
/// Rows whose value is missing, unparseable or not finite are skipped.
pub fn parse_upload_closes(text: &str) -> Result<Vec<f64>, UploadError> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let header = reader
        .headers()
        .map_err(|_| UploadError::NoCloseColumn)?
        .clone();
    let idx = close_column(&header).ok_or(UploadError::NoCloseColumn)?;

    let closes: Vec<f64> = reader
        .records()
        .filter_map(Result::ok)
        .filter_map(|r| r.get(idx)?.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect();

    if closes.is_empty() {
        Err(UploadError::NoData)
    } else {
        Ok(closes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_header_is_case_insensitive() {
        let closes = parse_upload_closes("Date,CLOSE\n2024-01-02,10.5\n2024-01-03,11\n").unwrap();
        assert_eq!(closes, vec![10.5, 11.0]);
    }

    #[test]
    fn close_is_preferred_over_adj_close() {
        let text = "Date,Adj Close,Close\n2024-01-02,9.9,10.0\n";
        assert_eq!(parse_upload_closes(text).unwrap(), vec![10.0]);
    }

    #[test]
    fn adj_close_is_used_when_close_is_absent() {
        let text = "date,adj close\n2024-01-02,9.9\n2024-01-03,9.8\n";
        assert_eq!(parse_upload_closes(text).unwrap(), vec![9.9, 9.8]);
    }

    #[test]
    fn missing_column_is_reported() {
        assert_eq!(
            parse_upload_closes("date,open\n2024-01-02,1\n").unwrap_err(),
            UploadError::NoCloseColumn
        );
        assert_eq!(parse_upload_closes("").unwrap_err(), UploadError::NoCloseColumn);
    }

    #[test]
    fn bad_values_are_skipped() {
        let text = "close\nabc\n\n12.5\nnan\n13\n";
        assert_eq!(parse_upload_closes(text).unwrap(), vec![12.5, 13.0]);
    }

    #[test]
    fn header_only_is_no_data() {
        assert_eq!(parse_upload_closes("Close\n").unwrap_err(), UploadError::NoData);
        assert_eq!(UploadError::NoData.code(), "no_data");
        assert_eq!(UploadError::NoCloseColumn.code(), "no_close_column");
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        assert_eq!(parse_upload_closes("\u{feff}Close\n1\n").unwrap(), vec![1.0]);
    }
}
