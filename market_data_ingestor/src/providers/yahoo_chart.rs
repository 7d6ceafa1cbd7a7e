//! Second tier: Yahoo's chart JSON API.

pub mod provider;
pub mod response;

pub use provider::YahooChartProvider;
