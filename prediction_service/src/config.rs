//! Runtime configuration, read from `PREDICT_*` environment variables.

use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use market_data_ingestor::chain::{ProviderUrls, STANDARD_CALLS_PER_FETCH};
use shared_utils::{
    config::ConfigError,
    env::{parse_var_or, process_env, var_or},
};

use crate::state::DEFAULT_UPLOAD_LIMIT;

pub const LISTEN_ADDR: &str = "PREDICT_LISTEN_ADDR";
pub const MODEL_DIR: &str = "PREDICT_MODEL_DIR";
pub const PROVIDER_TIMEOUT_SECS: &str = "PREDICT_PROVIDER_TIMEOUT_SECS";
pub const FETCH_DEADLINE_SECS: &str = "PREDICT_FETCH_DEADLINE_SECS";
pub const PRIMARY_URL: &str = "PREDICT_PRIMARY_URL";
pub const CHART_URL: &str = "PREDICT_CHART_URL";
pub const CSV_URL: &str = "PREDICT_CSV_URL";
pub const LOG_FORMAT: &str = "PREDICT_LOG_FORMAT";
pub const UPLOAD_LIMIT_BYTES: &str = "PREDICT_UPLOAD_LIMIT_BYTES";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected text or json, got {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub model_dir: PathBuf,
    /// Per-call timeout of the shared HTTP client.
    pub provider_timeout: Duration,
    /// Budget for one walk of the whole provider chain.
    pub fetch_deadline: Duration,
    pub urls: ProviderUrls,
    pub log_format: LogFormat,
    /// Request body cap for `/predict-file`.
    pub upload_limit: usize,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ProviderUrls::default();
        let listen_addr = parse_var_or(&lookup, LISTEN_ADDR, SocketAddr::from(([0, 0, 0, 0], 8000)))?;
        let model_dir = PathBuf::from(var_or(&lookup, MODEL_DIR, "."));
        let provider_timeout = parse_var_or(&lookup, PROVIDER_TIMEOUT_SECS, 10u64)?;
        if provider_timeout == 0 {
            return Err(invalid(
                PROVIDER_TIMEOUT_SECS,
                provider_timeout,
                "must be at least one second".to_string(),
            ));
        }

        // The budget has to cover every sequential call of a fully
        // unresponsive chain.
        let min_deadline = provider_timeout.saturating_mul(u64::from(STANDARD_CALLS_PER_FETCH));
        let fetch_deadline = parse_var_or(&lookup, FETCH_DEADLINE_SECS, min_deadline)?;
        if fetch_deadline < min_deadline {
            return Err(invalid(
                FETCH_DEADLINE_SECS,
                fetch_deadline,
                format!(
                    "must be at least {min_deadline} ({STANDARD_CALLS_PER_FETCH} calls of {provider_timeout}s)"
                ),
            ));
        }

        Ok(Self {
            listen_addr,
            model_dir,
            provider_timeout: Duration::from_secs(provider_timeout),
            fetch_deadline: Duration::from_secs(fetch_deadline),
            urls: ProviderUrls {
                primary: var_or(&lookup, PRIMARY_URL, &defaults.primary),
                chart: var_or(&lookup, CHART_URL, &defaults.chart),
                csv: var_or(&lookup, CSV_URL, &defaults.csv),
            },
            log_format: parse_var_or(&lookup, LOG_FORMAT, LogFormat::Text)?,
            upload_limit: parse_var_or(&lookup, UPLOAD_LIMIT_BYTES, DEFAULT_UPLOAD_LIMIT)?,
        })
    }
}

fn invalid(name: &str, secs: u64, reason: String) -> ConfigError {
    ConfigError::Invalid {
        name: name.to_string(),
        value: secs.to_string(),
        reason,
    }
}
