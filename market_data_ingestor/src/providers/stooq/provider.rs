use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::{
    models::{bar::Bar, bar_series::BarSeries, request_params::BarsRequestParams},
    providers::{DataProvider, ProviderError, ProviderId, http::get_text, stooq::parse::parse_stooq_csv},
};

pub const BASE_URL: &str = "https://stooq.com/q/d/l/";

const US_SUFFIX: &str = ".us";

pub struct StooqProvider {
    client: Client,
    base_url: String,
}

/// Remote symbols to try, in order.
pub fn symbol_variants(symbol: &str) -> Vec<String> {
    let bare = symbol.trim().to_lowercase();
    if bare.ends_with(US_SUFFIX) {
        vec![bare]
    } else {
        let suffixed = format!("{bare}{US_SUFFIX}");
        vec![bare, suffixed]
    }
}

impl StooqProvider {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn fetch_variant(
        &self,
        remote: &str,
        params: &BarsRequestParams,
    ) -> Result<Vec<Bar>, ProviderError> {
        let query = [("s", remote.to_string()), ("i", "d".to_string())];
        let text = get_text(&self.client, self.id(), &self.base_url, &query).await?;
        parse_stooq_csv(&text, params)
    }
}

#[async_trait]
impl DataProvider for StooqProvider {
    fn id(&self) -> ProviderId {
        ProviderId::CsvProvider
    }

    /// Tries each symbol variant once. Returns the first non-empty result;
    /// otherwise an empty series if any variant answered cleanly, or the
    /// last error if every variant failed.
    async fn fetch_bars(&self, params: &BarsRequestParams) -> Result<BarSeries, ProviderError> {
        let mut last_err = None;
        let mut answered = false;

        for remote in symbol_variants(&params.symbol) {
            match self.fetch_variant(&remote, params).await {
                Ok(bars) if !bars.is_empty() => {
                    debug!(symbol = %params.symbol, %remote, bars = bars.len(), "stooq variant matched");
                    return Ok(BarSeries::new(params.symbol.clone(), bars));
                }
                Ok(_) => {
                    debug!(%remote, "stooq variant returned no rows in window");
                    answered = true;
                }
                Err(e) => {
                    warn!(%remote, error = %e, "stooq variant failed");
                    last_err = Some(e);
                }
            }
        }

        match last_err {
            Some(e) if !answered => Err(e),
            _ => Ok(BarSeries::new(params.symbol.clone(), Vec::new())),
        }
    }
}
