//! # rangemark-client
//!
//! Blocking HTTP client for the inventory API: pre-flight connect, one-page
//! fetch, single-record patch. Carries the typed error taxonomy separating
//! fatal pre-flight/fetch failures from the recoverable per-record patch
//! failure, plus the opt-in retry policy.

pub mod api;
pub mod error;
pub mod retry;
mod tls;

pub use api::InventoryClient;
pub use error::ClientError;
pub use retry::RetryPolicy;
