use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    models::{bar_series::BarSeries, request_params::BarsRequestParams},
    providers::{
        DataProvider, ProviderError, ProviderId,
        http::{get_text, join_url},
        yahoo_download::response::parse_download_csv,
    },
};

pub const BASE_URL: &str = "https://query1.finance.yahoo.com/v7/finance/download";

pub struct YahooDownloadProvider {
    client: Client,
    base_url: String,
}

impl YahooDownloadProvider {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    /// Points the provider at another host, e.g. a local stub in tests.
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DataProvider for YahooDownloadProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Primary
    }

    async fn fetch_bars(&self, params: &BarsRequestParams) -> Result<BarSeries, ProviderError> {
        let (period1, period2) = params.epoch_bounds();
        let url = join_url(self.id(), &self.base_url, &params.symbol)?;
        let query = [
            ("period1", period1.to_string()),
            ("period2", period2.to_string()),
            ("interval", "1d".to_string()),
            ("events", "history".to_string()),
        ];

        let text = get_text(&self.client, self.id(), url, &query).await?;
        let bars = parse_download_csv(&text)?;
        debug!(symbol = %params.symbol, bars = bars.len(), "primary download parsed");

        Ok(BarSeries::new(params.symbol.clone(), bars))
    }
}
