use serde::Serialize;

/// Predicted move of the next close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
}

/// A backend's belief that the next close is higher, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Probability(f64);

impl Probability {
    /// `None` for NaN, infinities and anything outside `[0, 1]`.
    pub fn new(p: f64) -> Option<Self> {
        (p.is_finite() && (0.0..=1.0).contains(&p)).then_some(Self(p))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Direction plus an integer confidence in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    pub direction: Direction,
    pub confidence: u8,
}

impl Signal {
    /// Answer used when nothing better can be said.
    pub const NEUTRAL: Signal = Signal {
        direction: Direction::Down,
        confidence: 50,
    };

    /// `p >= 0.5` reads as UP; confidence is `p` as a rounded percentage.
    pub fn from_probability(p: Probability) -> Self {
        let direction = if p.value() >= 0.5 {
            Direction::Up
        } else {
            Direction::Down
        };
        Self {
            direction,
            confidence: (p.value() * 100.0).round() as u8,
        }
    }
}
