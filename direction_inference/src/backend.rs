use std::fmt;

use thiserror::Error;

use crate::signal::Probability;

/// Which tier produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Quantum,
    Classical,
    Heuristic,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BackendKind::Quantum => "quantum",
            BackendKind::Classical => "classical",
            BackendKind::Heuristic => "heuristic",
        })
    }
}

/// Why a backend declined to answer. Never surfaced past the dispatcher.
#[derive(Debug, Error, PartialEq)]
pub enum InferError {
    #[error("need at least {needed} closes, got {got}")]
    InsufficientHistory { needed: usize, got: usize },

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("backend produced {0}, expected a probability")]
    InvalidOutput(f64),
}

/// One model that turns a closing-price sequence into a directional probability.
///
/// Implementations are read-only after construction and shared across
/// concurrent requests.
pub trait PredictionBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// `closes` is oldest-first.
    fn infer(&self, closes: &[f64]) -> Result<Probability, InferError>;
}

/// Checks a raw model output before it is trusted as a probability.
pub(crate) fn to_probability(raw: f64) -> Result<Probability, InferError> {
    Probability::new(raw).ok_or(InferError::InvalidOutput(raw))
}

/// Requires at least `needed` points and returns the trailing `needed` of them.
pub(crate) fn trailing(closes: &[f64], needed: usize) -> Result<&[f64], InferError> {
    if closes.len() < needed {
        return Err(InferError::InsufficientHistory {
            needed,
            got: closes.len(),
        });
    }
    Ok(&closes[closes.len() - needed..])
}
