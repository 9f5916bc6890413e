//! HTTP client module with retry logic, error handling and request events.

mod client;
mod events;
mod retry;

pub use client::HttpClient;
pub use events::{OutboundRequest, RequestEvents, RequestListener};
pub use retry::{MAX_RETRIES, NonRetryableError, RETRY_DELAY_MS, check_retryable, classify_error};
