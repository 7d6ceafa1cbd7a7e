//! Shared HTTP plumbing for the remote providers.

use std::time::Duration;

use reqwest::{Client, IntoUrl, Url};
use snafu::{OptionExt, ResultExt};

use crate::providers::{
    ProviderId,
    errors::{
        ClientBuildSnafu, InvalidBaseUrlSnafu, ProviderError, ProviderInitError, RequestSnafu,
        StatusSnafu,
    },
};

/// Per-call timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Some vendors reject requests without a browser-like agent.
pub const USER_AGENT: &str = "Mozilla/5.0";

/// Builds the client shared by every provider tier.
///
/// The timeout bounds each individual call; a timed-out call surfaces as
/// [`ProviderError::Request`] and the chain moves on.
pub fn build_client(timeout: Duration) -> Result<Client, ProviderInitError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .context(ClientBuildSnafu)
}

/// Issues a GET and returns the body of a successful response as text.
pub(crate) async fn get_text(
    client: &Client,
    provider: ProviderId,
    url: impl IntoUrl,
    query: &[(&str, String)],
) -> Result<String, ProviderError> {
    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .context(RequestSnafu { provider })?;

    let status = response.status();
    if !status.is_success() {
        return StatusSnafu { provider, status }.fail();
    }

    response.text().await.context(RequestSnafu { provider })
}

/// Appends `segment` to `base` as one percent-encoded path segment, so a
/// symbol containing `/`, `?` or `#` cannot alter the route or query.
pub(crate) fn join_url(
    provider: ProviderId,
    base: &str,
    segment: &str,
) -> Result<Url, ProviderError> {
    let mut url = Url::parse(base)
        .ok()
        .context(InvalidBaseUrlSnafu { provider, url: base })?;
    url.path_segments_mut()
        .ok()
        .context(InvalidBaseUrlSnafu { provider, url: base })?
        .pop_if_empty()
        .push(segment);
    Ok(url)
}
