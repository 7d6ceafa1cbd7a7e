/// Most recent closes handed to inference. Older points are dropped.
pub const MAX_HISTORY: usize = 500;

/// The trailing `MAX_HISTORY` points of `closes`.
pub fn inference_window(closes: &[f64]) -> &[f64] {
    let skip = closes.len().saturating_sub(MAX_HISTORY);
    &closes[skip..]
}
