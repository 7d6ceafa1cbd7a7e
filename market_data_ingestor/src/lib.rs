//! Daily price retrieval across several independent, unreliable sources.
//!
//! Every source is a [`providers::DataProvider`] that normalises its own
//! payload into [`models::bar::Bar`]s. [`chain::ProviderChain`] tries them in
//! priority order and [`range_filter::filter_range`] clips the winner to the
//! requested window.

pub mod chain;
pub mod models;
pub mod providers;
pub mod range_filter;
