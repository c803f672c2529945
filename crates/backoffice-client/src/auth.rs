//! Authentication collaborator client

use async_trait::async_trait;
use backoffice_core::DashboardConfig;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// The authentication collaborator behind the login form
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Verify a credential pair
    ///
    /// Acceptance is an `Ok(())`; a rejection surfaces as
    /// [`ClientError::Http`] carrying the collaborator's response body, and
    /// transport trouble as [`ClientError::Network`].
    async fn login(&self, identifier: &str, secret: &str) -> ClientResult<()>;
}

/// HTTP implementation of [`Authenticator`]
///
/// Speaks the backend's user-lookup contract:
/// `POST {auth_base}/getUser/{identifier}` with `{"password": secret}`.
/// Any non-empty 2xx body counts as acceptance.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    auth_base_url: String,
}

impl AuthClient {
    /// Create a client over an existing HTTP client
    pub fn new(http: reqwest::Client, auth_base_url: impl Into<String>) -> Self {
        Self {
            http,
            auth_base_url: auth_base_url.into(),
        }
    }

    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] if the HTTP client cannot be built.
    pub fn from_config(config: &DashboardConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.request_timeout_secs))
            .build()
            .map_err(|e| ClientError::network(e.to_string()))?;
        Ok(Self::new(http, config.api.auth_base_url.clone()))
    }
}

#[async_trait]
impl Authenticator for AuthClient {
    async fn login(&self, identifier: &str, secret: &str) -> ClientResult<()> {
        let url = format!(
            "{}/getUser/{identifier}",
            self.auth_base_url.trim_end_matches('/')
        );
        debug!(%url, "authenticating");

        let response = self
            .http
            .post(&url)
            .json(&json!({ "password": secret }))
            .send()
            .await
            .map_err(|e| ClientError::classify(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(ClientError::from)?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "authentication rejected");
            return Err(ClientError::http(status.as_u16(), body));
        }

        // The contract is "any truthy body": an empty or null body is not an
        // acceptance even under a 2xx status.
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" || trimmed == "false" {
            return Err(ClientError::decode(
                "authentication service returned an empty body",
            ));
        }

        Ok(())
    }
}

/// Scripted [`Authenticator`] for tests
#[derive(Debug, Default)]
pub struct MockAuthenticator {
    accepted: Option<(String, String)>,
    rejection_message: Option<String>,
    unreachable: bool,
    called: AtomicBool,
}

impl MockAuthenticator {
    /// Accept exactly one credential pair, reject everything else
    #[must_use]
    pub fn accepting(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            accepted: Some((identifier.into(), secret.into())),
            ..Self::default()
        }
    }

    /// Reject every attempt with the collaborator's error message
    #[must_use]
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self {
            rejection_message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Fail every attempt at the transport level
    #[must_use]
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Whether `login` was invoked at least once
    #[must_use]
    pub fn was_called(&self) -> bool {
        self.called.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn login(&self, identifier: &str, secret: &str) -> ClientResult<()> {
        self.called.store(true, Ordering::SeqCst);

        if self.unreachable {
            return Err(ClientError::network("connection refused"));
        }
        if let Some(message) = &self.rejection_message {
            return Err(ClientError::http(
                401,
                json!({ "error": message }).to_string(),
            ));
        }
        match &self.accepted {
            Some((id, pw)) if id == identifier && pw == secret => Ok(()),
            _ => Err(ClientError::http(
                401,
                json!({ "error": "Invalid userId or password" }).to_string(),
            )),
        }
    }
}
