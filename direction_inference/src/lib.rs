//! Directional inference over a closing-price sequence.
//!
//! Three backends answer the same question ("will the next close be
//! higher?"): a parameterised quantum circuit, a dense neural network and a
//! moving-average heuristic. Which of the first two exist is decided once at
//! startup by [`config::ModelConfig`]; [`dispatcher::InferenceDispatcher`]
//! tries them in priority order and always ends at the heuristic, so a
//! prediction is produced for every input.

pub mod artifact;
pub mod backend;
pub mod classical;
pub mod config;
pub mod dispatcher;
pub mod heuristic;
pub mod history;
pub mod quantum;
pub mod signal;

pub use backend::{BackendKind, InferError, PredictionBackend};
pub use config::{ModelConfig, ModelPaths};
pub use dispatcher::{Inference, InferenceDispatcher};
pub use signal::{Direction, Probability, Signal};
