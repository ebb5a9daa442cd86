use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::engagement::platform::Benchmarks;

/// Default public base URL for media kit links.
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:8000";

/// Default location of the wkhtmltopdf binary used for PDF export.
pub const DEFAULT_WKHTMLTOPDF_PATH: &str = "/usr/local/bin/wkhtmltopdf";

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    pub db_path: String,
    /// Base URL that public media kit and PDF links are built from
    pub public_url: String,
    /// Industry averages, with any MEDIAKIT_BENCHMARK_* overrides applied
    pub benchmarks: Benchmarks,
    /// External HTML-to-PDF converter
    pub wkhtmltopdf_path: PathBuf,
    /// Secret for HMAC bearer token signing (MEDIAKIT_SESSION_SECRET env var)
    #[cfg(feature = "web")]
    pub session_secret: String,
    /// Allowed CORS origins; empty means any origin
    #[cfg(feature = "web")]
    pub cors_origins: Vec<String>,
    /// Requests allowed per user per window (default 100)
    #[cfg(feature = "web")]
    pub rate_limit_requests: u32,
    /// Rate limit window in seconds (default 60)
    #[cfg(feature = "web")]
    pub rate_limit_window_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default except the session secret, which is only
    /// checked by commands that sign or verify tokens.
    pub fn load() -> Result<Self> {
        let benchmarks = Benchmarks::from_env()?;

        Ok(Self {
            db_path: env::var("MEDIAKIT_DB_PATH").unwrap_or_else(|_| "./mediakit.db".to_string()),
            public_url: env::var("MEDIAKIT_PUBLIC_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_PUBLIC_URL.to_string()),
            benchmarks,
            wkhtmltopdf_path: env::var("MEDIAKIT_WKHTMLTOPDF_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_WKHTMLTOPDF_PATH)),
            #[cfg(feature = "web")]
            session_secret: env::var("MEDIAKIT_SESSION_SECRET").unwrap_or_default(),
            #[cfg(feature = "web")]
            cors_origins: parse_list(&env::var("MEDIAKIT_CORS_ORIGINS").unwrap_or_default()),
            #[cfg(feature = "web")]
            rate_limit_requests: parse_env("MEDIAKIT_RATE_LIMIT_REQUESTS", 100)?,
            #[cfg(feature = "web")]
            rate_limit_window_secs: parse_env("MEDIAKIT_RATE_LIMIT_WINDOW_SECS", 60)?,
        })
    }

    /// Check that the token signing secret is configured.
    /// Call this before serving the API or minting tokens.
    #[cfg(feature = "web")]
    pub fn require_session_secret(&self) -> Result<()> {
        if self.session_secret.len() < 16 {
            anyhow::bail!(
                "MEDIAKIT_SESSION_SECRET not set (or shorter than 16 characters).\n\
                 Add it to your .env file. See .env.example for details."
            );
        }
        Ok(())
    }

    /// Check that the PDF converter is installed.
    pub fn require_pdf_converter(&self) -> Result<()> {
        if !self.wkhtmltopdf_path.exists() {
            anyhow::bail!(
                "wkhtmltopdf not found at {}\n\
                 Install it or set MEDIAKIT_WKHTMLTOPDF_PATH to its location.",
                self.wkhtmltopdf_path.display()
            );
        }
        Ok(())
    }
}

/// Split a comma-separated list, dropping blanks.
#[cfg_attr(not(feature = "web"), allow(dead_code))]
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a numeric env var, falling back to `default` when unset.
#[cfg_attr(not(feature = "web"), allow(dead_code))]
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key}: '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list(" http://a.test , ,http://b.test"),
            vec!["http://a.test", "http://b.test"]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_parse_env_default_when_unset() {
        let value: u32 = parse_env("MEDIAKIT_TEST_SURELY_UNSET_VAR", 7).unwrap();
        assert_eq!(value, 7);
    }
}
