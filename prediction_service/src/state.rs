use std::sync::Arc;

use direction_inference::{InferenceDispatcher, ModelConfig, ModelPaths};
use market_data_ingestor::{chain::ProviderChain, providers::http::build_client};
use tracing::info;

use crate::{config::ServerConfig, pipeline::PredictionService};

/// Largest accepted `/predict-file` request body.
pub const DEFAULT_UPLOAD_LIMIT: usize = 64 * 1024 * 1024;

/// Shared by every handler; immutable after startup.
pub struct AppState {
    pub service: PredictionService,
    /// Request body cap for `/predict-file`, in bytes.
    pub upload_limit: usize,
}

impl AppState {
    pub fn new(service: PredictionService) -> Arc<Self> {
        Self::with_upload_limit(service, DEFAULT_UPLOAD_LIMIT)
    }

    pub fn with_upload_limit(service: PredictionService, upload_limit: usize) -> Arc<Self> {
        Arc::new(Self {
            service,
            upload_limit,
        })
    }
}

/// Loads model artifacts and wires the production provider chain.
pub fn build_state(config: &ServerConfig) -> anyhow::Result<Arc<AppState>> {
    let models = ModelConfig::load(&ModelPaths::in_dir(&config.model_dir));
    let client = build_client(config.provider_timeout)?;
    let chain = ProviderChain::standard(client, &config.urls).with_deadline(config.fetch_deadline);

    info!(
        model_dir = %config.model_dir.display(),
        backend = ?models.kind(),
        tiers = ?chain.tier_ids(),
        upload_limit = config.upload_limit,
        "prediction service ready"
    );

    let dispatcher = InferenceDispatcher::from_config(&models);
    Ok(AppState::with_upload_limit(
        PredictionService::new(chain, dispatcher),
        config.upload_limit,
    ))
}
