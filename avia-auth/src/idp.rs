//! Identity-provider token endpoint client (ROPC and refresh flows).

use std::time::Duration;

use serde::{Deserialize, Serialize};

const REQUESTED_SCOPE: &str = "openid profile email";

#[derive(Debug, thiserror::Error)]
pub enum IdpError {
    /// The provider refused the exchange. The reason is logged but the
    /// caller is told no more than "rejected" so user existence never
    /// leaks through the gateway.
    #[error("token exchange rejected by the identity provider")]
    Rejected,

    #[error("identity provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Token material as handed back to the gateway caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub expires_in: u64,
    #[serde(default = "default_scope")]
    pub scope: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

fn default_scope() -> String {
    REQUESTED_SCOPE.to_string()
}

pub struct IdentityProviderClient {
    http: reqwest::Client,
    token_endpoint: String,
    client_id: String,
    client_secret: String,
}

impl IdentityProviderClient {
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (static configuration,
    /// should not happen in practice).
    pub fn new(
        token_endpoint: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client with static configuration"),
            token_endpoint: token_endpoint.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Exchanges a username/password pair for tokens (ROPC flow).
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse, IdpError> {
        tracing::debug!("authenticating user {} against the identity provider", username);
        self.token_request(&[
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("scope", REQUESTED_SCOPE),
        ])
        .await
    }

    /// Exchanges a refresh token for fresh tokens.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, IdpError> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("scope", REQUESTED_SCOPE),
        ])
        .await
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse, IdpError> {
        let response = self
            .http
            .post(&self.token_endpoint)
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("identity provider rejected token request: {} {}", status, body);
            return Err(IdpError::Rejected);
        }

        let tokens = response.json::<TokenResponse>().await.map_err(|e| {
            tracing::warn!("malformed token response from identity provider: {}", e);
            IdpError::Rejected
        })?;
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn authenticate_sends_ropc_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=password"))
            .and(body_string_contains("username=alice"))
            .and(body_string_contains("scope=openid+profile+email"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "at",
                "refresh_token": "rt",
                "expires_in": 300
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            IdentityProviderClient::new(format!("{}/token", server.uri()), "gw", "secret");
        let tokens = client.authenticate("alice", "pw").await.unwrap();
        assert_eq!(tokens.access_token, "at");
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.scope, "openid profile email");
    }

    #[tokio::test]
    async fn provider_refusal_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client =
            IdentityProviderClient::new(format!("{}/token", server.uri()), "gw", "secret");
        let err = client.authenticate("alice", "wrong").await.unwrap_err();
        assert!(matches!(err, IdpError::Rejected));
    }
}
