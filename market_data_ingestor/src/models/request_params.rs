use chrono::{Days, NaiveDate};

const SECONDS_PER_DAY: i64 = 86_400;

/// Parameters for requesting daily bars for one symbol from any provider.
///
/// The window is inclusive on both ends. Construction through
/// [`BarsRequestParams::new`] guarantees `start <= end`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BarsRequestParams {
    /// Symbol as typed by the caller (e.g., `"AAPL"`).
    pub symbol: String,

    /// First day of the window (inclusive).
    pub start: NaiveDate,

    /// Last day of the window (inclusive).
    pub end: NaiveDate,
}

impl BarsRequestParams {
    /// Creates request parameters, swapping `start` and `end` if they arrive reversed.
    pub fn new(symbol: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        let (start, end) = if start > end { (end, start) } else { (start, end) };
        Self {
            symbol: symbol.into(),
            start,
            end,
        }
    }

    /// The one-year window ending at `today`, clamped to the earliest
    /// representable date.
    pub fn trailing_year(symbol: impl Into<String>, today: NaiveDate) -> Self {
        let start = today.checked_sub_days(Days::new(365)).unwrap_or(NaiveDate::MIN);
        Self::new(symbol, start, today)
    }

    /// UNIX-second boundaries for vendors that take epoch query parameters.
    ///
    /// The lower bound is midnight UTC of `start`. The upper bound is midnight
    /// UTC of the day after `end`, so vendors treating it as exclusive still
    /// return the bar for `end` itself.
    pub fn epoch_bounds(&self) -> (i64, i64) {
        let end_midnight = midnight_utc(self.end);
        (midnight_utc(self.start), end_midnight.saturating_add(SECONDS_PER_DAY))
    }

    /// Whether `date` falls inside the inclusive window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}
