//! OAuth2 client-credentials token acquisition.

use serde::Deserialize;
use std::fmt;

/// Audience for Azure Resource Manager calls.
pub const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";

/// Audience for Microsoft Graph (sendMail) calls.
pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Token endpoint failure. Fatal to the run when it hits the management
/// scope: nothing downstream can succeed without a credential.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The token endpoint answered with a non-success status.
    #[error("token endpoint returned status {status}: {detail}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body excerpt.
        detail: String,
    },
    /// The token request never completed.
    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// A success response without an `access_token` field.
    #[error("token response carried no access_token")]
    MissingToken,
}

/// A bearer credential scoped to one API audience.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub(crate) fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw bearer value, for the `Authorization` header only.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

// Tokens must never land in logs or error text.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Client for the tenant's OAuth2 token endpoint.
#[derive(Debug)]
pub struct TokenClient {
    http: reqwest::blocking::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl TokenClient {
    /// Build a client for the tenant's v2.0 token endpoint.
    pub fn new(
        tenant_id: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self::with_token_url(
            format!("https://login.microsoftonline.com/{tenant_id}/oauth2/v2.0/token"),
            client_id,
            client_secret,
        )
    }

    /// Build a client against an explicit token URL.
    pub fn with_token_url(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Fetch a bearer token for `scope`. One attempt, no retry.
    pub fn fetch(&self, scope: &str) -> Result<AccessToken, AuthError> {
        tracing::debug!(scope, "requesting access token");
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", scope),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Status {
                status: status.as_u16(),
                detail: response.text().unwrap_or_default(),
            });
        }

        let body: TokenResponse = response.json()?;
        body.access_token
            .map(AccessToken)
            .ok_or(AuthError::MissingToken)
    }
}
