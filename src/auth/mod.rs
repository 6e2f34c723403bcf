// Authentication module
// Manages the stored token pair and its refresh

mod credentials;
mod manager;
mod refresh;
mod types;

pub use credentials::TokenStore;
pub use manager::{TokenManager, TokenStatus};
pub use refresh::{RefreshClient, STRAVA_TOKEN_URL};
pub use types::{token_preview, ClientId, CredentialRecord, TokenResponse};
