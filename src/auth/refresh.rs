// Token refresh logic

use reqwest::Client;
use std::time::Duration;

use super::types::{CredentialRecord, TokenResponse};
use crate::error::{AuthError, Result};

/// Strava OAuth token endpoint
pub const STRAVA_TOKEN_URL: &str = "https://www.strava.com/api/v3/oauth/token";

/// Client for the authorization server's token endpoint
#[derive(Debug, Clone)]
pub struct RefreshClient {
    client: Client,
    token_url: String,
}

impl RefreshClient {
    /// Create a refresh client; `timeout` of `None` keeps reqwest's default
    pub fn new(token_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_client(builder.build()?, token_url))
    }

    pub fn with_client(client: Client, token_url: impl Into<String>) -> Self {
        Self {
            client,
            token_url: token_url.into(),
        }
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Exchange the record's refresh token for a new token pair
    pub async fn refresh(&self, record: &CredentialRecord) -> Result<TokenResponse> {
        let client_id = record.client_id.to_string();

        tracing::debug!(
            "Token refresh request: url={}, client_id={}",
            self.token_url,
            client_id
        );

        let form = [
            ("client_id", client_id.as_str()),
            ("client_secret", record.client_secret.as_str()),
            ("refresh_token", record.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self.client.post(&self.token_url).form(&form).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("Token refresh failed: status={}, body={}", status, body);

            // Strava reports the reason in "message"
            if let Ok(error_json) = serde_json::from_str::<serde_json::Value>(&body) {
                if let Some(message) = error_json.get("message").and_then(|v| v.as_str()) {
                    tracing::error!("Token refresh error details: {}", message);
                }
            }

            return Err(AuthError::AuthServer {
                status: status.as_u16(),
                body,
            });
        }

        let data: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        if data.access_token.is_empty() {
            return Err(AuthError::InvalidResponse(
                "response contains an empty access_token".to_string(),
            ));
        }

        Ok(data)
    }
}
