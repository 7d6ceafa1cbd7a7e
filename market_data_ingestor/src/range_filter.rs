//! Date-window clipping with an empty-result fallback.

use chrono::NaiveDate;

use crate::models::bar_series::BarSeries;

/// Keeps bars dated inside `[min(start, end), max(start, end)]`.
///
/// If nothing survives, the unfiltered series is returned instead: callers
/// prefer slightly-off-window data over no data at all.
pub fn filter_range(series: BarSeries, start: NaiveDate, end: NaiveDate) -> BarSeries {
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };

    let kept: Vec<_> = series
        .bars
        .iter()
        .filter(|b| lo <= b.date && b.date <= hi)
        .cloned()
        .collect();

    if kept.is_empty() {
        series
    } else {
        BarSeries::new(series.symbol, kept)
    }
}
