//! Primary tier: Yahoo's bulk CSV download endpoint.

pub mod provider;
pub mod response;

pub use provider::YahooDownloadProvider;
