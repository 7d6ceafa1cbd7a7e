//! HTTP-facing prediction service.
//!
//! Glues the provider chain and the inference dispatcher into the three
//! request flows (`/predict`, `/ohlc`, `/predict-file`) and guarantees that
//! each of them answers with a well-formed body, whatever fails underneath.

pub mod api;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod state;
pub mod telemetry;
pub mod upload;
