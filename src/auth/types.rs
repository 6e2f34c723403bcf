// Authentication types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Registered application id
///
/// Strava issues numeric client ids, but hand-written token files often
/// quote them. Both shapes are accepted and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClientId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientId::Number(id) => write!(f, "{}", id),
            ClientId::Text(id) => f.write_str(id),
        }
    }
}

/// Persisted credential record
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub client_id: ClientId,
    pub client_secret: String,
    pub access_token: String,
    pub refresh_token: String,

    /// Unix timestamp (seconds) after which `access_token` is invalid
    pub expires_at: i64,

    /// Keys this crate does not interpret (athlete, token_type, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CredentialRecord {
    /// Check if the access token is expired at `now` (Unix seconds)
    /// A token is still valid at the exact expiry second
    pub fn is_expired(&self, now: i64) -> bool {
        now > self.expires_at
    }

    /// Overwrite the token fields with a refresh response
    pub fn apply(&mut self, tokens: TokenResponse) {
        self.access_token = tokens.access_token;
        self.refresh_token = tokens.refresh_token;
        self.expires_at = tokens.expires_at;
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("access_token", &token_preview(&self.access_token))
            .field("refresh_token", &token_preview(&self.refresh_token))
            .field("expires_at", &self.expires_at)
            .field("extra_keys", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Token data from refresh response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

/// Shorten a token for logging
pub fn token_preview(token: &str) -> String {
    const VISIBLE: usize = 8;
    match token.char_indices().nth(VISIBLE) {
        Some((idx, _)) => format!("{}...", &token[..idx]),
        None => token.to_string(),
    }
}
