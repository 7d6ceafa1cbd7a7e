//! Provider abstraction for daily price sources.
//!
//! This module defines the [`DataProvider`] trait, the single interface every
//! price source implements. Each concrete provider translates its vendor
//! payload (CSV download, chart JSON, plain CSV) into canonical
//! [`Bar`](crate::models::bar::Bar)s, or fails with a [`ProviderError`].
//!
//! The trait is designed for async usage and dynamic dispatch
//! (`dyn DataProvider`), so the [`ProviderChain`](crate::chain::ProviderChain)
//! can hold an ordered list of heterogeneous sources.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use market_data_ingestor::models::{
//!     bar_series::BarSeries,
//!     request_params::BarsRequestParams,
//! };
//! use market_data_ingestor::providers::{DataProvider, ProviderError, ProviderId};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl DataProvider for MyProvider {
//!     fn id(&self) -> ProviderId {
//!         ProviderId::Primary
//!     }
//!
//!     async fn fetch_bars(
//!         &self,
//!         params: &BarsRequestParams,
//!     ) -> Result<BarSeries, ProviderError> {
//!         Ok(BarSeries::new(params.symbol.clone(), vec![]))
//!     }
//! }
//! ```

pub mod errors;
pub mod http;
pub mod stooq;
pub mod yahoo_chart;
pub mod yahoo_download;

use std::fmt;

use async_trait::async_trait;

pub use errors::{ProviderError, ProviderInitError};

use crate::models::{bar_series::BarSeries, request_params::BarsRequestParams};

/// Identifies which tier produced a series. Doubles as the `source` tag
/// reported to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderId {
    /// Bulk CSV download endpoint.
    Primary,
    /// Chart JSON API.
    ChartApi,
    /// Plain CSV download with symbol-variant retry.
    CsvProvider,
}

impl ProviderId {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Primary => "primary",
            ProviderId::ChartApi => "chart_api",
            ProviderId::CsvProvider => "csv_provider",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for fetching daily bars from one price source.
///
/// Implementations must not panic on bad vendor data: rows that cannot be
/// normalised are dropped, and payloads that cannot be read at all are
/// reported as [`ProviderError::Malformed`].
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// The tier this provider represents.
    fn id(&self) -> ProviderId;

    /// Fetches daily bars for the given request parameters.
    ///
    /// # Returns
    ///
    /// * `Ok(BarSeries)` - Normalised bars; may be empty when the source has nothing.
    /// * `Err(ProviderError)` - Network, status or schema failure for this tier.
    async fn fetch_bars(&self, params: &BarsRequestParams) -> Result<BarSeries, ProviderError>;
}
