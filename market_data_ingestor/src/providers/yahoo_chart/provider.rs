use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    models::{bar_series::BarSeries, request_params::BarsRequestParams},
    providers::{
        DataProvider, ProviderError, ProviderId,
        errors::MalformedSnafu,
        http::{get_text, join_url},
        yahoo_chart::response::ChartResponse,
    },
};

pub const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

pub struct YahooChartProvider {
    client: Client,
    base_url: String,
}

impl YahooChartProvider {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DataProvider for YahooChartProvider {
    fn id(&self) -> ProviderId {
        ProviderId::ChartApi
    }

    async fn fetch_bars(&self, params: &BarsRequestParams) -> Result<BarSeries, ProviderError> {
        let provider = self.id();
        let (period1, period2) = params.epoch_bounds();
        let url = join_url(self.id(), &self.base_url, &params.symbol)?;
        let query = [
            ("period1", period1.to_string()),
            ("period2", period2.to_string()),
            ("interval", "1d".to_string()),
            ("includePrePost", "false".to_string()),
        ];

        let text = get_text(&self.client, provider, url, &query).await?;
        let chart: ChartResponse = serde_json::from_str(&text).map_err(|e| {
            MalformedSnafu {
                provider,
                message: e.to_string(),
            }
            .build()
        })?;

        if let Some(message) = chart.error_message() {
            return MalformedSnafu { provider, message }.fail();
        }

        let bars = chart.into_bars();
        debug!(symbol = %params.symbol, bars = bars.len(), "chart payload parsed");

        Ok(BarSeries::new(params.symbol.clone(), bars))
    }
}
