use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::STRAVA_TOKEN_URL;

/// Strava Token - prints a valid Strava access token, refreshing it when expired
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the JSON token file
    #[arg(
        short = 't',
        long,
        env = "STRAVA_TOKEN_FILE",
        default_value = "strava_tokens.json"
    )]
    pub token_file: String,

    /// OAuth token endpoint
    #[arg(short = 'u', long, env = "STRAVA_TOKEN_URL", default_value = STRAVA_TOKEN_URL)]
    pub token_url: String,

    /// Token request timeout in seconds (unset keeps the HTTP client default)
    #[arg(long, env = "HTTP_REQUEST_TIMEOUT")]
    pub http_timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Report whether the stored token is still valid without refreshing it
    #[arg(long)]
    pub check: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub token_file: PathBuf,
    pub token_url: String,
    pub http_timeout: Option<u64>,
    pub log_level: String,
    pub check_only: bool,
}

impl Config {
    /// Load configuration from all sources with priority: CLI > ENV > defaults
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Self::from_args(CliArgs::parse()))
    }

    pub fn from_args(args: CliArgs) -> Self {
        Config {
            token_file: expand_tilde(&args.token_file),
            token_url: args.token_url,
            http_timeout: args.http_timeout,
            log_level: args.log_level,
            check_only: args.check,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.token_file.exists() {
            anyhow::bail!(
                "STRAVA_TOKEN_FILE does not exist: {}",
                self.token_file.display()
            );
        }

        if !(self.token_url.starts_with("https://") || self.token_url.starts_with("http://")) {
            anyhow::bail!(
                "STRAVA_TOKEN_URL must be an http(s) URL: {}",
                self.token_url
            );
        }

        if self.http_timeout == Some(0) {
            anyhow::bail!("HTTP_REQUEST_TIMEOUT must be greater than zero");
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.http_timeout.map(Duration::from_secs)
    }
}

/// Expand tilde (~) in file paths to user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
