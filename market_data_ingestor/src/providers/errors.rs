use reqwest::StatusCode;
use snafu::{Backtrace, Snafu};

use crate::providers::ProviderId;

/// Errors that can occur during the creation of a provider instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `DataProvider` implementation.
///
/// None of these are fatal: the chain logs them and moves to the next tier.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// The request never produced a response (connect failure, timeout, body read).
    #[snafu(display("{provider} request failed: {source}"))]
    Request {
        provider: ProviderId,
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The vendor answered with a non-success status.
    #[snafu(display("{provider} answered with HTTP {status}"))]
    Status {
        provider: ProviderId,
        status: StatusCode,
        backtrace: Backtrace,
    },

    /// The configured base URL cannot carry a symbol path segment.
    #[snafu(display("{provider} base URL {url:?} is not usable"))]
    InvalidBaseUrl {
        provider: ProviderId,
        url: String,
        backtrace: Backtrace,
    },

    /// The payload arrived but does not have the expected shape.
    #[snafu(display("{provider} returned an unreadable payload: {message}"))]
    Malformed {
        provider: ProviderId,
        message: String,
        backtrace: Backtrace,
    },
}

impl ProviderError {
    /// The tier that failed.
    pub fn provider(&self) -> ProviderId {
        match self {
            ProviderError::Request { provider, .. }
            | ProviderError::Status { provider, .. }
            | ProviderError::InvalidBaseUrl { provider, .. }
            | ProviderError::Malformed { provider, .. } => *provider,
        }
    }

    /// Network, timeout and status failures.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            ProviderError::Request { .. } | ProviderError::Status { .. }
        )
    }

    /// Schema mismatch or unparseable payload.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ProviderError::Malformed { .. })
    }
}
