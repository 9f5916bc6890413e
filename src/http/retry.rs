//! Retry classification for feed requests.

use reqwest::StatusCode;

/// Maximum number of attempts for a single feed request.
pub const MAX_RETRIES: usize = 3;

/// Delay between attempts in milliseconds.
pub const RETRY_DELAY_MS: u64 = 500;

/// Errors that will not go away by asking again.
#[derive(Debug, thiserror::Error)]
pub enum NonRetryableError {
    #[error("Feed rate limit exceeded: {0}. Try again later.")]
    RateLimitExceeded(String),
    #[error("Authentication failed: {0}. Check the feed credentials.")]
    AuthenticationFailed(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Access forbidden: {0}")]
    Forbidden(String),
    #[error("Request error: {0}")]
    ClientError(String),
}

/// Classifies a response error.
/// Returns Ok(()) if the request may be retried, or the reason it may not.
pub fn classify_error(error: &reqwest::Error) -> Result<(), NonRetryableError> {
    let Some(status) = error.status() else {
        // Connection errors, timeouts, etc. are retryable
        return Ok(());
    };
    let url = error
        .url()
        .map(|u| u.to_string())
        .unwrap_or_else(|| "<unknown url>".to_string());

    match status {
        StatusCode::UNAUTHORIZED => Err(NonRetryableError::AuthenticationFailed(url)),
        StatusCode::FORBIDDEN => Err(NonRetryableError::Forbidden(url)),
        StatusCode::TOO_MANY_REQUESTS => Err(NonRetryableError::RateLimitExceeded(url)),
        StatusCode::NOT_FOUND => Err(NonRetryableError::NotFound(url)),
        s if s.is_client_error() => Err(NonRetryableError::ClientError(format!(
            "HTTP {} from {}",
            s.as_u16(),
            url
        ))),
        // 5xx server errors are retryable
        _ => Ok(()),
    }
}

/// Converts an error from `error_for_status()` into an `anyhow::Error`,
/// wrapping it in [`NonRetryableError`] when retrying would not help.
pub fn check_retryable(error: reqwest::Error) -> anyhow::Error {
    match classify_error(&error) {
        Ok(()) => anyhow::Error::from(error),
        Err(non_retryable) => anyhow::Error::from(non_retryable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn status_error(status: usize) -> reqwest::Error {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(status)
            .create_async()
            .await;

        let response = reqwest::Client::new()
            .get(server.url())
            .send()
            .await
            .unwrap();
        response.error_for_status().unwrap_err()
    }

    #[test]
    fn test_non_retryable_error_display() {
        let err = NonRetryableError::RateLimitExceeded("feed".to_string());
        assert!(err.to_string().contains("rate limit"));

        let err = NonRetryableError::NotFound("https://example.com/x".to_string());
        assert_eq!(err.to_string(), "Not found: https://example.com/x");

        let err = NonRetryableError::ClientError("HTTP 400".to_string());
        assert!(err.to_string().contains("Request error"));
    }

    #[tokio::test]
    async fn test_classify_error_unauthorized() {
        let err = status_error(401).await;
        assert!(matches!(
            classify_error(&err),
            Err(NonRetryableError::AuthenticationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_classify_error_rate_limited() {
        let err = status_error(429).await;
        assert!(matches!(
            classify_error(&err),
            Err(NonRetryableError::RateLimitExceeded(_))
        ));
    }

    #[tokio::test]
    async fn test_classify_error_not_found() {
        let err = status_error(404).await;
        assert!(matches!(
            classify_error(&err),
            Err(NonRetryableError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_classify_error_other_client_error() {
        let err = status_error(400).await;
        assert!(matches!(
            classify_error(&err),
            Err(NonRetryableError::ClientError(_))
        ));
    }

    #[tokio::test]
    async fn test_classify_error_server_error_is_retryable() {
        let err = status_error(500).await;
        assert!(classify_error(&err).is_ok());
    }

    #[tokio::test]
    async fn test_check_retryable() {
        let err = check_retryable(status_error(404).await);
        assert!(err.downcast_ref::<NonRetryableError>().is_some());

        let err = check_retryable(status_error(503).await);
        assert!(err.downcast_ref::<NonRetryableError>().is_none());
    }
}
