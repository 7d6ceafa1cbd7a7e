//! Third tier: Stooq's daily CSV download.
//!
//! Stooq lists US equities both under the bare ticker and under a `.us`
//! suffix, so the provider tries the bare symbol first and the suffixed one
//! only if the first attempt yields nothing.

pub mod parse;
pub mod provider;

pub use provider::StooqProvider;
