//! Tiered backend selection.
//!
//! The dispatcher walks `TryQuantum -> TryClassical -> Heuristic`. A tier
//! that is not configured is skipped; a tier that fails (short history, bad
//! output, panic) hands over to the next one. The heuristic never fails.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::{debug, warn};

use crate::{
    backend::{BackendKind, PredictionBackend},
    classical::ClassicalBackend,
    config::ModelConfig,
    heuristic::heuristic_signal,
    quantum::QuantumBackend,
    signal::Signal,
};

/// The answer plus the tier that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inference {
    pub signal: Signal,
    pub backend: BackendKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DispatchState {
    TryQuantum,
    TryClassical,
    Heuristic,
}

pub struct InferenceDispatcher {
    quantum: Option<Box<dyn PredictionBackend>>,
    classical: Option<Box<dyn PredictionBackend>>,
}

impl InferenceDispatcher {
    /// Builds the tiers the startup configuration allows.
    pub fn from_config(config: &ModelConfig) -> Self {
        match config {
            ModelConfig::Quantum(model) => Self::with_backends(
                Some(Box::new(QuantumBackend::new(model.clone()))),
                None,
            ),
            ModelConfig::Classical(model) => Self::with_backends(
                None,
                Some(Box::new(ClassicalBackend::new(model.clone()))),
            ),
            ModelConfig::None => Self::heuristic_only(),
        }
    }

    /// Explicit tiers, e.g. stubs in tests.
    pub fn with_backends(
        quantum: Option<Box<dyn PredictionBackend>>,
        classical: Option<Box<dyn PredictionBackend>>,
    ) -> Self {
        Self { quantum, classical }
    }

    pub fn heuristic_only() -> Self {
        Self::with_backends(None, None)
    }

    /// Produces a signal for `closes` (oldest first). Never fails.
    pub fn predict(&self, closes: &[f64]) -> Inference {
        let mut state = DispatchState::TryQuantum;

        loop {
            state = match state {
                DispatchState::TryQuantum => match self.attempt(self.quantum.as_deref(), closes) {
                    Some(inference) => return inference,
                    None => DispatchState::TryClassical,
                },
                DispatchState::TryClassical => {
                    match self.attempt(self.classical.as_deref(), closes) {
                        Some(inference) => return inference,
                        None => DispatchState::Heuristic,
                    }
                }
                DispatchState::Heuristic => {
                    return Inference {
                        signal: heuristic_signal(closes),
                        backend: BackendKind::Heuristic,
                    };
                }
            };
        }
    }

    fn attempt(
        &self,
        backend: Option<&dyn PredictionBackend>,
        closes: &[f64],
    ) -> Option<Inference> {
        let backend = backend?;
        let kind = backend.kind();

        match catch_unwind(AssertUnwindSafe(|| backend.infer(closes))) {
            Ok(Ok(p)) => {
                debug!(backend = %kind, probability = p.value(), "backend answered");
                Some(Inference {
                    signal: Signal::from_probability(p),
                    backend: kind,
                })
            }
            Ok(Err(e)) => {
                warn!(backend = %kind, error = %e, "backend declined, falling through");
                None
            }
            Err(_) => {
                warn!(backend = %kind, "backend panicked, falling through");
                None
            }
        }
    }
}
