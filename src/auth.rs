//! Bearer token acquisition.
//!
//! The chat endpoint accepts Microsoft Entra ID tokens.  [`ClientCredentials`] obtains one with
//! the OAuth 2.0 client-credential grant; [`StaticToken`] hands out a token acquired elsewhere.
//! Tokens are requested once per run and never refreshed.

use std::time::Duration;

use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::client::DEFAULT_TIMEOUT;
use crate::error::{Error, Result};
use crate::observability::{AUTH_TOKEN_ERRORS, AUTH_TOKEN_REQUESTS};

/// Default Entra ID authority host.
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com/";

/// Supplies the bearer token used for every chat request.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    /// Obtain an opaque bearer token.
    async fn acquire_token(&self) -> Result<String>;
}

/// A token that was obtained out of band.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    /// Wrap an existing token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait::async_trait]
impl TokenProvider for StaticToken {
    async fn acquire_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Confidential-client credentials for the client-credential grant.
#[derive(Clone)]
pub struct ClientCredentials {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    resource: String,
    authority_host: Url,
    client: ReqwestClient,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}

impl ClientCredentials {
    /// Create credentials against the public Entra ID authority.
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        resource: impl Into<String>,
    ) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;
        Ok(Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            resource: resource.into(),
            authority_host: Url::parse(DEFAULT_AUTHORITY_HOST)?,
            client,
        })
    }

    /// Use a different authority host, such as a sovereign cloud or a test server.
    pub fn with_authority_host(mut self, authority_host: Url) -> Self {
        self.authority_host = authority_host;
        self
    }

    /// Use a different request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;
        Ok(self)
    }

    /// The token endpoint for the configured tenant.
    pub fn token_url(&self) -> Result<Url> {
        let mut base = self.authority_host.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(&format!("{}/oauth2/v2.0/token", self.tenant_id))?)
    }

    /// The scope requested for the resource.
    pub fn scope(&self) -> String {
        if self.resource.ends_with("/.default") {
            self.resource.clone()
        } else {
            format!("{}/.default", self.resource.trim_end_matches('/'))
        }
    }

    async fn request_token(&self) -> Result<String> {
        let url = self.token_url()?;
        let scope = self.scope();
        debug!(%url, %scope, "requesting client-credential token");
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", scope.as_str()),
        ];
        let response = self
            .client
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(format!("Token request timed out: {}", e), None)
                } else if e.is_connect() {
                    Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Token request failed: {}", e), Some(Box::new(e)))
                }
            })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            Error::http_client(
                format!("Failed to read token response: {}", e),
                Some(Box::new(e)),
            )
        })?;

        if !status.is_success() {
            let detail = serde_json::from_str::<TokenErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error_description.or(e.error))
                .unwrap_or(body);
            return Err(Error::authentication(detail, Some(status.as_u16())));
        }

        let parsed: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            Error::serialization(
                format!("Failed to parse token response: {}", e),
                Some(Box::new(e)),
            )
        })?;
        parsed
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                Error::authentication("token response did not include an access_token", None)
            })
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("resource", &self.resource)
            .field("authority_host", &self.authority_host.as_str())
            .finish()
    }
}

#[async_trait::async_trait]
impl TokenProvider for ClientCredentials {
    async fn acquire_token(&self) -> Result<String> {
        AUTH_TOKEN_REQUESTS.click();
        let result = self.request_token().await;
        if let Err(err) = &result {
            AUTH_TOKEN_ERRORS.click();
            warn!(error = %err, "token acquisition failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(resource: &str) -> ClientCredentials {
        ClientCredentials::new("tenant-1", "client-1", "secret", resource).unwrap()
    }

    #[test]
    fn token_url_for_tenant() {
        assert_eq!(
            credentials("https://cognitiveservices.azure.com")
                .token_url()
                .unwrap()
                .as_str(),
            "https://login.microsoftonline.com/tenant-1/oauth2/v2.0/token"
        );
    }

    #[test]
    fn token_url_with_custom_host_path() {
        let creds = credentials("api://x")
            .with_authority_host(Url::parse("http://127.0.0.1:9000/authority").unwrap());
        assert_eq!(
            creds.token_url().unwrap().as_str(),
            "http://127.0.0.1:9000/authority/tenant-1/oauth2/v2.0/token"
        );
    }

    #[test]
    fn scope_gets_default_suffix_once() {
        assert_eq!(
            credentials("https://cognitiveservices.azure.com").scope(),
            "https://cognitiveservices.azure.com/.default"
        );
        assert_eq!(
            credentials("https://cognitiveservices.azure.com/").scope(),
            "https://cognitiveservices.azure.com/.default"
        );
        assert_eq!(
            credentials("https://cognitiveservices.azure.com/.default").scope(),
            "https://cognitiveservices.azure.com/.default"
        );
    }

    #[test]
    fn debug_redacts_secret() {
        let rendered = format!("{:?}", credentials("api://x"));
        assert!(!rendered.contains("secret\""));
        assert!(rendered.contains("<redacted>"));
    }

    #[tokio::test]
    async fn static_token() {
        assert_eq!(StaticToken::new("t").acquire_token().await.unwrap(), "t");
    }
}
