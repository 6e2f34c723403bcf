// Credential storage in a JSON file

use std::path::{Path, PathBuf};

use super::types::CredentialRecord;
use crate::error::{AuthError, Result};

/// File-based credential store
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the credential record
    pub fn load(&self) -> Result<CredentialRecord> {
        tracing::debug!("Loading credentials from {}", self.path.display());

        let data = std::fs::read_to_string(&self.path)
            .map_err(|e| AuthError::storage(&self.path, format!("failed to read: {}", e)))?;

        serde_json::from_str(&data)
            .map_err(|e| AuthError::storage(&self.path, format!("malformed record: {}", e)))
    }

    /// Write the full record, replacing whatever the file held before
    pub fn save(&self, record: &CredentialRecord) -> Result<()> {
        let data = serde_json::to_string_pretty(record)
            .map_err(|e| AuthError::storage(&self.path, format!("failed to encode: {}", e)))?;

        std::fs::write(&self.path, data)
            .map_err(|e| AuthError::storage(&self.path, format!("failed to write: {}", e)))?;

        // Owner-only access on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| {
                    AuthError::storage(&self.path, format!("failed to set permissions: {}", e))
                })?;
        }

        tracing::debug!("Saved credentials to {}", self.path.display());
        Ok(())
    }
}
