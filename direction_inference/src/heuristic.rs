//! Moving-average fallback. Always answers.

use crate::signal::{Direction, Signal};

/// Closes averaged for the trend line.
pub const TREND_WINDOW: usize = 20;

/// Confidence is clamped to this band so the heuristic never claims to be
/// unsure below it nor certain above it.
pub const CONFIDENCE_FLOOR: f64 = 55.0;
pub const CONFIDENCE_CEILING: f64 = 95.0;

/// Compares the latest close with the simple moving average of the last
/// [`TREND_WINDOW`] closes.
///
/// With fewer than [`TREND_WINDOW`] points the answer is [`Signal::NEUTRAL`].
pub fn heuristic_signal(closes: &[f64]) -> Signal {
    if closes.len() < TREND_WINDOW {
        return Signal::NEUTRAL;
    }

    let recent = &closes[closes.len() - TREND_WINDOW..];
    let sma = recent.iter().sum::<f64>() / TREND_WINDOW as f64;
    let last = recent[TREND_WINDOW - 1];

    let direction = if last > sma {
        Direction::Up
    } else {
        Direction::Down
    };

    let deviation = ((last - sma) / sma).abs() * 100.0;
    let confidence = if deviation.is_nan() {
        CONFIDENCE_FLOOR
    } else {
        deviation.clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING)
    };

    Signal {
        direction,
        confidence: confidence.round() as u8,
    }
}
