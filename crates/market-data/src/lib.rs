//! Coinfolio Market Data Crate
//!
//! Provider-agnostic market data contracts for the Coinfolio reconciliation
//! core. Concrete exchange clients implement the provider traits; the core
//! only ever sees the models and errors defined here.
//!
//! # Overview
//!
//! - [`TradeLookupProvider`] - raw executed-trade history on a symbol
//! - [`PriceAtResolver`] - point-in-time price resolution with geometric
//!   window widening over a trade lookup
//! - [`DailyCloseProvider`] - daily closing-price series
//! - [`TickerProvider`] - latest ticker prices
//! - [`with_backoff`] - retry courtesy for rate-limited fetches

pub mod backoff;
pub mod errors;
pub mod lookup;
pub mod models;
pub mod provider;

pub use backoff::{with_backoff, with_backoff_config};
pub use errors::{MarketDataError, RetryClass};
pub use lookup::PriceAtResolver;
pub use models::{DailyClose, TickerPrice, TradeTick};
pub use provider::{DailyCloseProvider, TickerProvider, TradeLookupProvider};
