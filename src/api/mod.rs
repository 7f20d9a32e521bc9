//! Backend API access.
//!
//! - [`client`] - HTTP calls to the subscriptions proxy with timeout and size limits
//! - [`payload`] - Total mapping from the raw JSON payload to the display model

mod client;
mod payload;

pub use client::{ApiClient, ApiError, DEFAULT_TIMEOUT, MAX_RESPONSE_SIZE};
pub use payload::{normalize_item, normalize_page};
