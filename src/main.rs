use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use strava_token::auth::{RefreshClient, TokenManager, TokenStore};
use strava_token::config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration first (for log level)
    let config = config::Config::load()?;

    // Initialize logging with a configured level; stdout is reserved for the token
    let log_level = config.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    config.validate()?;

    tracing::debug!(
        "Token file: {}, token endpoint: {}",
        config.token_file.display(),
        config.token_url
    );

    let client = RefreshClient::new(config.token_url.clone(), config.request_timeout())
        .context("Failed to create HTTP client")?;
    let manager = TokenManager::new(TokenStore::new(config.token_file.clone()), client);

    if config.check_only {
        let status = manager.status_at(Utc::now().timestamp())?;
        let expires = DateTime::<Utc>::from_timestamp(status.expires_at, 0)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| status.expires_at.to_string());

        if status.expired {
            println!("expired at {} ({}s ago)", expires, -status.expires_in);
        } else {
            println!("valid until {} ({}s left)", expires, status.expires_in);
        }
        return Ok(());
    }

    let token = manager
        .get_access_token()
        .await
        .context("Failed to obtain a valid access token")?;

    println!("{}", token);
    Ok(())
}
