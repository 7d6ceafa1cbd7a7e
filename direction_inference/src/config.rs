//! Startup-time model selection.
//!
//! The artifact directory is inspected exactly once. The resulting
//! [`ModelConfig`] is read-only and is shared by every request.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{info, warn};

use crate::{backend::BackendKind, classical::ClassicalModel, quantum::QuantumModel};

pub const QUANTUM_ARTIFACT: &str = "qlstm_weights.json";
pub const CLASSICAL_ARTIFACT: &str = "classical_model.json";

/// Where to look for model artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    pub quantum: PathBuf,
    pub classical: PathBuf,
}

impl ModelPaths {
    /// Standard artifact file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            quantum: dir.join(QUANTUM_ARTIFACT),
            classical: dir.join(CLASSICAL_ARTIFACT),
        }
    }
}

/// The single optional model active for the process lifetime.
#[derive(Debug, Clone, Default)]
pub enum ModelConfig {
    Quantum(Arc<QuantumModel>),
    Classical(Arc<ClassicalModel>),
    #[default]
    None,
}

impl ModelConfig {
    /// Resolves the active model.
    ///
    /// A present quantum artifact is the only candidate, even if it fails to
    /// load. The classical artifact is considered only when no quantum
    /// artifact exists. Load failures are logged and leave `None`.
    pub fn load(paths: &ModelPaths) -> Self {
        if paths.quantum.exists() {
            return match QuantumModel::from_path(&paths.quantum) {
                Ok(model) => {
                    info!(
                        path = %paths.quantum.display(),
                        window = model.window(),
                        wires = model.wires(),
                        layers = model.layers(),
                        "quantum model loaded"
                    );
                    ModelConfig::Quantum(Arc::new(model))
                }
                Err(e) => {
                    warn!(path = %paths.quantum.display(), error = %e, "quantum artifact unusable");
                    ModelConfig::None
                }
            };
        }

        if paths.classical.exists() {
            return match ClassicalModel::from_path(&paths.classical) {
                Ok(model) => {
                    info!(path = %paths.classical.display(), "classical model loaded");
                    ModelConfig::Classical(Arc::new(model))
                }
                Err(e) => {
                    warn!(path = %paths.classical.display(), error = %e, "classical artifact unusable");
                    ModelConfig::None
                }
            };
        }

        info!("no model artifact found, heuristic only");
        ModelConfig::None
    }

    pub fn kind(&self) -> Option<BackendKind> {
        match self {
            ModelConfig::Quantum(_) => Some(BackendKind::Quantum),
            ModelConfig::Classical(_) => Some(BackendKind::Classical),
            ModelConfig::None => None,
        }
    }
}
