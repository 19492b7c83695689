use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, StatusCode, header};
use tracing::debug;
use url::Url;

use crate::client_logger::ExchangeLogger;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// What came back from the chat endpoint: any status, with the body as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// The body, possibly empty.
    pub body: String,
}

impl RawResponse {
    /// Create a new `RawResponse`.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Canonical reason phrase for an HTTP status, such as "Bad Request" for 400.
pub fn reason_phrase(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Unknown")
}

/// Delivers a serialized request to the chat endpoint.
///
/// Implementations return every HTTP response, successful or not.  An `Err` means no response
/// was received at all.
#[async_trait::async_trait]
pub trait ChatSender: Send + Sync {
    /// POST `body` to `endpoint` with the bearer token.
    async fn send(&self, endpoint: &Url, bearer_token: &str, body: String) -> Result<RawResponse>;
}

#[async_trait::async_trait]
impl<T: ChatSender + ?Sized> ChatSender for Arc<T> {
    async fn send(&self, endpoint: &Url, bearer_token: &str, body: String) -> Result<RawResponse> {
        self.as_ref().send(endpoint, bearer_token, body).await
    }
}

/// [`ChatSender`] over HTTPS using `reqwest`.
#[derive(Clone)]
pub struct HttpSender {
    client: ReqwestClient,
    timeout: Duration,
    logger: Option<Arc<dyn ExchangeLogger>>,
}

impl HttpSender {
    /// Create a sender with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a sender with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;
        Ok(Self {
            client,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that sees every exchange.
    pub fn with_logger(mut self, logger: Arc<dyn ExchangeLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn headers(bearer_token: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let authorization = HeaderValue::from_str(&format!("Bearer {bearer_token}"))
            .map_err(|_| Error::authentication("bearer token is not a valid header value", None))?;
        headers.insert(header::AUTHORIZATION, authorization);
        Ok(headers)
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }
}

impl std::fmt::Debug for HttpSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSender")
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

#[async_trait::async_trait]
impl ChatSender for HttpSender {
    async fn send(&self, endpoint: &Url, bearer_token: &str, body: String) -> Result<RawResponse> {
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        if let Some(logger) = &self.logger {
            logger.log_request(&body);
        }
        debug!(%endpoint, bytes = body.len(), "sending chat completion request");

        let result = async {
            let response = self
                .client
                .post(endpoint.clone())
                .headers(Self::headers(bearer_token)?)
                .body(body)
                .send()
                .await
                .map_err(|e| self.transport_error(e))?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| self.transport_error(e))?;
            Ok::<_, Error>(RawResponse::new(status, body))
        }
        .await;

        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        match &result {
            Ok(response) => {
                debug!(status = response.status, bytes = response.body.len(), "received response");
                if let Some(logger) = &self.logger {
                    logger.log_response(response.status, &response.body);
                }
            }
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                debug!(error = %err, "chat completion request failed");
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_phrases() {
        assert_eq!(reason_phrase(400), "Bad Request");
        assert_eq!(reason_phrase(429), "Too Many Requests");
        assert_eq!(reason_phrase(599), "Unknown");
    }

    #[test]
    fn raw_response_success_range() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(!RawResponse::new(400, "").is_success());
    }

    #[test]
    fn bearer_header() {
        let headers = HttpSender::headers("abc").unwrap();
        assert_eq!(headers[header::AUTHORIZATION], "Bearer abc");
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn rejects_token_with_newline() {
        assert!(HttpSender::headers("abc\ndef").unwrap_err().is_authentication());
    }
}
