//! Provider client configuration.
//!
//! Base URLs and credentials for the managed backend (identity + storage)
//! and the email delivery service. Built from environment variables or
//! explicit construction for testing.

use url::Url;
use zeroize::Zeroizing;

/// Configuration for connecting to Docack's managed collaborators.
///
/// Custom `Debug` implementation redacts credential fields to prevent
/// leakage in log output.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Base URL of the managed backend hosting the identity provider and
    /// object storage (e.g. `https://<project>.backend.example`).
    /// Normalized to end with `/` so endpoint paths join under any path
    /// prefix.
    pub backend_url: Url,
    /// Publishable (anon) API key, sent with user-scoped identity calls.
    pub publishable_key: Zeroizing<String>,
    /// Secret (service-role) API key for admin operations: magic-link
    /// issuance, storage writes and removals.
    pub secret_key: Zeroizing<String>,
    /// Storage bucket holding uploaded documents.
    pub storage_bucket: String,
    /// Base URL of the email delivery service. Normalized like
    /// `backend_url`.
    pub email_url: Url,
    /// API key for the email delivery service.
    pub email_api_key: Zeroizing<String>,
    /// From address for outgoing mail.
    pub email_from: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("backend_url", &self.backend_url)
            .field("publishable_key", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .field("storage_bucket", &self.storage_bucket)
            .field("email_url", &self.email_url)
            .field("email_api_key", &"[REDACTED]")
            .field("email_from", &self.email_from)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `DOCACK_BACKEND_URL` (required)
    /// - `DOCACK_PUBLISHABLE_KEY` (required)
    /// - `DOCACK_SECRET_KEY` (required)
    /// - `DOCACK_STORAGE_BUCKET` (default: `documents`)
    /// - `DOCACK_EMAIL_URL` (default: `https://api.resend.com`)
    /// - `DOCACK_EMAIL_API_KEY` (required)
    /// - `DOCACK_EMAIL_FROM` (default: `Docack <onboarding@resend.dev>`)
    /// - `DOCACK_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            backend_url: env_url("DOCACK_BACKEND_URL")?,
            publishable_key: env_secret("DOCACK_PUBLISHABLE_KEY")?,
            secret_key: env_secret("DOCACK_SECRET_KEY")?,
            storage_bucket: std::env::var("DOCACK_STORAGE_BUCKET")
                .unwrap_or_else(|_| "documents".to_string()),
            email_url: env_url_or("DOCACK_EMAIL_URL", "https://api.resend.com")?,
            email_api_key: env_secret("DOCACK_EMAIL_API_KEY")?,
            email_from: std::env::var("DOCACK_EMAIL_FROM")
                .unwrap_or_else(|_| "Docack <onboarding@resend.dev>".to_string()),
            timeout_secs: std::env::var("DOCACK_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        })
    }

    /// Create a configuration pointing at local mock servers (for testing).
    pub fn local_mock(backend_port: u16, email_port: u16) -> Result<Self, ConfigError> {
        let make_url = |port: u16| -> Result<Url, ConfigError> {
            Url::parse(&format!("http://127.0.0.1:{port}"))
                .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))
        };
        Ok(Self {
            backend_url: make_url(backend_port)?,
            publishable_key: Zeroizing::new("test-publishable".to_string()),
            secret_key: Zeroizing::new("test-secret".to_string()),
            storage_bucket: "documents".to_string(),
            email_url: make_url(email_port)?,
            email_api_key: Zeroizing::new("test-email-key".to_string()),
            email_from: "Docack <test@docack.io>".to_string(),
            timeout_secs: 5,
        })
    }
}

fn env_url(var: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).map_err(|_| ConfigError::MissingVar(var.to_string()))?;
    Url::parse(&raw)
        .map(ensure_trailing_slash)
        .map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn env_url_or(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw)
        .map(ensure_trailing_slash)
        .map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Base URLs must end with `/` so relative endpoint paths join under
/// them instead of replacing the last path segment.
fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn env_secret(var: &str) -> Result<Zeroizing<String>, ConfigError> {
    std::env::var(var)
        .map(Zeroizing::new)
        .map_err(|_| ConfigError::MissingVar(var.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(String),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
