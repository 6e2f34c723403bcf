use chrono::Utc;

use super::credentials::TokenStore;
use super::refresh::RefreshClient;
use super::types::{token_preview, CredentialRecord};
use crate::error::Result;

/// Expiry state of the stored access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStatus {
    pub expired: bool,
    pub expires_at: i64,
    /// Seconds until expiry, negative once expired
    pub expires_in: i64,
}

/// Authentication manager
/// Loads the stored token pair, refreshes it when expired and persists the result
pub struct TokenManager {
    /// Credential file
    store: TokenStore,

    /// Token endpoint client
    client: RefreshClient,
}

impl TokenManager {
    pub fn new(store: TokenStore, client: RefreshClient) -> Self {
        Self { store, client }
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Load the credential record from the store
    pub fn load(&self) -> Result<CredentialRecord> {
        self.store.load()
    }

    /// Save the full credential record to the store
    pub fn save(&self, record: &CredentialRecord) -> Result<()> {
        self.store.save(record)
    }

    /// Refresh the token pair and persist it
    /// The store is untouched unless the server returned a complete token pair
    pub async fn refresh(&self, mut record: CredentialRecord) -> Result<CredentialRecord> {
        let tokens = self.client.refresh(&record).await?;
        record.apply(tokens);
        self.store.save(&record)?;
        Ok(record)
    }

    /// Get a valid access token, refreshing if necessary
    pub async fn get_access_token(&self) -> Result<String> {
        self.get_access_token_at(Utc::now().timestamp()).await
    }

    /// Same as `get_access_token` with `now` given as Unix seconds
    pub async fn get_access_token_at(&self, now: i64) -> Result<String> {
        let record = self.load()?;

        if !record.is_expired(now) {
            tracing::info!(
                "Access token is still valid: {}",
                token_preview(&record.access_token)
            );
            return Ok(record.access_token);
        }

        tracing::info!("Access token expired. Refreshing...");
        let record = self.refresh(record).await?;
        tracing::info!(
            "Access token refreshed (token: {}, expires_at: {})",
            token_preview(&record.access_token),
            record.expires_at
        );

        Ok(record.access_token)
    }

    /// Report the expiry state without refreshing
    pub fn status_at(&self, now: i64) -> Result<TokenStatus> {
        let record = self.load()?;
        Ok(TokenStatus {
            expired: record.is_expired(now),
            expires_at: record.expires_at,
            expires_in: record.expires_at - now,
        })
    }
}
