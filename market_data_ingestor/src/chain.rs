//! Tiered provider fallback.
//!
//! [`ProviderChain`] walks its providers in priority order and returns the
//! first non-empty series. Every tier-local failure is logged and swallowed;
//! only total exhaustion reaches the caller. Running out of the request
//! budget counts as exhaustion: the tier cut short is treated like a timed-out
//! call and the remaining tiers are skipped.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, warn};

use crate::{
    models::{bar_series::BarSeries, request_params::BarsRequestParams},
    providers::{
        DataProvider, ProviderId, stooq, stooq::StooqProvider, yahoo_chart,
        yahoo_chart::YahooChartProvider, yahoo_download, yahoo_download::YahooDownloadProvider,
    },
};

#[derive(Debug, Error)]
pub enum ChainError {
    /// Every tier came back empty or failed.
    #[error("no provider returned bars for {symbol}")]
    NoDataFound { symbol: String },
}

/// Upper bound on sequential HTTP calls one [`ProviderChain::standard`]
/// fetch makes: primary, chart, and both CSV symbol variants.
pub const STANDARD_CALLS_PER_FETCH: u32 = 4;

/// The winning tier's series, tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainOutcome {
    pub series: BarSeries,
    pub source: ProviderId,
}

/// Base URLs for the three standard tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderUrls {
    pub primary: String,
    pub chart: String,
    pub csv: String,
}

impl Default for ProviderUrls {
    fn default() -> Self {
        Self {
            primary: yahoo_download::provider::BASE_URL.to_string(),
            chart: yahoo_chart::provider::BASE_URL.to_string(),
            csv: stooq::provider::BASE_URL.to_string(),
        }
    }
}

pub struct ProviderChain {
    tiers: Vec<Box<dyn DataProvider>>,
    deadline: Option<Duration>,
}

impl ProviderChain {
    /// A chain over `tiers`, tried front to back.
    pub fn new(tiers: Vec<Box<dyn DataProvider>>) -> Self {
        Self {
            tiers,
            deadline: None,
        }
    }

    /// The production ordering: bulk download, chart API, CSV.
    pub fn standard(client: Client, urls: &ProviderUrls) -> Self {
        Self::new(vec![
            Box::new(YahooDownloadProvider::with_base_url(
                client.clone(),
                urls.primary.clone(),
            )),
            Box::new(YahooChartProvider::with_base_url(
                client.clone(),
                urls.chart.clone(),
            )),
            Box::new(StooqProvider::with_base_url(client, urls.csv.clone())),
        ])
    }

    /// Caps the total time spent across all tiers of one fetch.
    ///
    /// Keep `budget` at or above `STANDARD_CALLS_PER_FETCH` times the per-call
    /// timeout, or a fully unresponsive chain is cut off before its last call.
    pub fn with_deadline(mut self, budget: Duration) -> Self {
        self.deadline = Some(budget);
        self
    }

    pub fn tier_ids(&self) -> Vec<ProviderId> {
        self.tiers.iter().map(|t| t.id()).collect()
    }

    /// Fetches bars for `params` from the first tier that has any.
    ///
    /// The returned series is sorted by ascending date. Dropping the returned
    /// future aborts the in-flight provider call and skips the remaining tiers.
    pub async fn fetch(&self, params: &BarsRequestParams) -> Result<ChainOutcome, ChainError> {
        let deadline = self.deadline.map(|budget| (budget, Instant::now() + budget));

        for tier in &self.tiers {
            let id = tier.id();
            let attempt = tier.fetch_bars(params);
            let result = match deadline {
                Some((budget, at)) => match timeout_at(at, attempt).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(provider = %id, symbol = %params.symbol, ?budget, "fetch budget exhausted, skipping remaining tiers");
                        break;
                    }
                },
                None => attempt.await,
            };

            match result {
                Ok(mut series) if !series.is_empty() => {
                    series.sort_by_date();
                    info!(provider = %id, symbol = %params.symbol, bars = series.len(), "provider tier succeeded");
                    return Ok(ChainOutcome { series, source: id });
                }
                Ok(_) => debug!(provider = %id, symbol = %params.symbol, "provider tier returned no bars"),
                Err(e) if e.is_unavailable() => {
                    warn!(provider = %e.provider(), symbol = %params.symbol, error = %e, "provider tier unavailable")
                }
                Err(e) => {
                    warn!(provider = %e.provider(), symbol = %params.symbol, error = %e, "provider tier failed")
                }
            }
        }

        Err(ChainError::NoDataFound {
            symbol: params.symbol.clone(),
        })
    }
}
