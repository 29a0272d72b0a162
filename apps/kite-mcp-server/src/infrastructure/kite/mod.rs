//! Kite Connect Broker Adapter
//!
//! Implementation of `BrokerPort` over the Kite Connect v3 REST API:
//! - `token api_key:access_token` authorization on every request
//! - `{status, data}` envelope decoding
//! - Kite exception types mapped onto the port's error taxonomy
//!
//! One attempt per call. There is no retry or backoff; the caller sees the
//! brokerage's own error text.

mod adapter;
mod api_types;
mod config;
mod error;
mod http_client;

pub use adapter::{KiteBrokerAdapter, KiteConnector};
pub use config::{DEFAULT_BASE_URL, KiteConfig};
pub use error::KiteError;
pub use http_client::KiteHttpClient;
