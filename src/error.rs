// Error handling module
// Defines the errors raised while loading, refreshing and saving tokens

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while obtaining an access token
#[derive(Error, Debug)]
pub enum AuthError {
    /// Token store is missing, unreadable, unwritable or malformed
    #[error("Token store error ({}): {message}", .path.display())]
    Storage { path: PathBuf, message: String },

    /// Authorization server rejected the refresh request
    #[error("Failed to refresh token: {status} - {body}")]
    AuthServer { status: u16, body: String },

    /// Refresh request could not be sent or its body could not be read
    #[error("Token endpoint request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Successful response that lacks a required field
    #[error("Invalid token response: {0}")]
    InvalidResponse(String),
}

impl AuthError {
    pub(crate) fn storage(path: &Path, message: impl Into<String>) -> Self {
        AuthError::Storage {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// True when the authorization server answered with a non-success status
    pub fn is_auth_server(&self) -> bool {
        matches!(self, AuthError::AuthServer { .. })
    }

    /// HTTP status returned by the authorization server, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::AuthServer { status, .. } => Some(*status),
            AuthError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for token operations
pub type Result<T> = std::result::Result<T, AuthError>;
