//! HTTP client with built-in retry logic and request notifications.

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use std::sync::{Arc, RwLock};

use super::events::{OutboundRequest, RequestEvents, RequestListener};
use super::retry::{MAX_RETRIES, NonRetryableError, RETRY_DELAY_MS, check_retryable};

/// HTTP client with retry logic and outbound request events.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    listeners: Arc<RwLock<Vec<RequestListener>>>,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            listeners: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Creates a client that identifies itself with the given user agent.
    pub fn with_user_agent(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::new(client))
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Performs a GET request and deserializes the JSON response.
    /// Automatically retries on transient errors.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        debug!("GET JSON from {} with query {:?}...", url, query);

        self.with_retry("GET JSON", || async {
            let request = self
                .client
                .get(url)
                .query(query)
                .build()
                .context("Failed to build request")?;
            self.notify(request.method(), request.url().as_str());

            let response = self
                .client
                .execute(request)
                .await
                .context("Failed to send request")?;

            let response = response.error_for_status().map_err(check_retryable)?;

            response
                .json::<T>()
                .await
                .context("Failed to parse JSON response")
        })
        .await
    }

    /// Like [`HttpClient::get_json`], but a 404 response yields `None`.
    pub async fn get_json_optional<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>> {
        match self.get_json(url, query).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if matches!(
                e.downcast_ref::<NonRetryableError>(),
                Some(NonRetryableError::NotFound(_))
            ) =>
            {
                debug!("{} not found", url);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn notify(&self, method: &Method, url: &str) {
        let listeners = match self.listeners.read() {
            Ok(listeners) => listeners,
            Err(poisoned) => poisoned.into_inner(),
        };
        if listeners.is_empty() {
            return;
        }
        let request = OutboundRequest {
            method: method.to_string(),
            url: url.to_string(),
        };
        for listener in listeners.iter() {
            listener(&request);
        }
    }

    /// Executes an async operation with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation_name: &str, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 1..=MAX_RETRIES {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if e.downcast_ref::<NonRetryableError>().is_some() {
                        debug!("{}: non-retryable error: {}", operation_name, e);
                        return Err(e);
                    }

                    if attempt < MAX_RETRIES {
                        warn!(
                            "{}: attempt {}/{} failed ({}), retrying in {}ms...",
                            operation_name, attempt, MAX_RETRIES, e, RETRY_DELAY_MS
                        );
                        tokio::time::sleep(std::time::Duration::from_millis(RETRY_DELAY_MS)).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            anyhow::anyhow!("{}: failed after {} attempts", operation_name, MAX_RETRIES)
        }))
    }
}

impl RequestEvents for HttpClient {
    fn on_sending_request(&self, listener: RequestListener) {
        let mut listeners = match self.listeners.write() {
            Ok(listeners) => listeners,
            Err(poisoned) => poisoned.into_inner(),
        };
        listeners.push(listener);
    }
}
