//! # docack-providers — Typed Clients for Docack's Managed Collaborators
//!
//! Docack delegates authentication, file storage, and mail transport to
//! managed services and talks to each through a narrow request/response
//! contract:
//!
//! - **Identity Provider** — session resolution and refresh, magic-link
//!   issuance, and code/token-pair exchange.
//! - **Object Storage** — `put` / `public_url` / `remove` on a single
//!   document bucket.
//! - **Email Delivery** — `send {to, subject, html}`.
//!
//! This crate is the only authorized path to those services; no other crate
//! issues HTTP requests to them directly. Calls that tolerate at-least-once
//! delivery retry transient transport errors with exponential backoff (see
//! [`retry`]); mail sends are a single attempt.

pub mod config;
pub mod email;
pub mod error;
pub mod identity;
pub(crate) mod retry;
pub mod storage;

pub use config::ProviderConfig;
pub use error::ProviderError;
pub use identity::{ResolvedSession, SessionTokens};

use std::time::Duration;

use url::Url;

/// Top-level provider client. Holds sub-clients for each collaborator.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    identity: identity::IdentityClient,
    storage: storage::StorageClient,
    email: email::EmailClient,
}

impl ProviderClient {
    /// Create a new provider client from configuration.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            identity: identity::IdentityClient::new(
                http.clone(),
                config.backend_url.clone(),
                config.publishable_key.clone(),
                config.secret_key.clone(),
            ),
            storage: storage::StorageClient::new(
                http.clone(),
                config.backend_url,
                config.storage_bucket,
                config.secret_key,
            ),
            email: email::EmailClient::new(
                http,
                config.email_url,
                config.email_api_key,
                config.email_from,
            ),
        })
    }

    /// Access the identity provider client.
    pub fn identity(&self) -> &identity::IdentityClient {
        &self.identity
    }

    /// Access the object storage client.
    pub fn storage(&self) -> &storage::StorageClient {
        &self.storage
    }

    /// Access the email delivery client.
    pub fn email(&self) -> &email::EmailClient {
        &self.email
    }
}

/// Join an endpoint path under a base URL.
///
/// Configured base URLs always end with `/` (see
/// [`config::ProviderConfig`]), so a relative join keeps any path prefix
/// of the base instead of replacing its last segment.
pub(crate) fn endpoint_url(base: &Url, path: &str, endpoint: &str) -> Result<Url, ProviderError> {
    base.join(path).map_err(|source| ProviderError::Endpoint {
        endpoint: endpoint.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_keeps_base_path_prefix() {
        let base: Url = "https://backend.docack.io/api/".parse().unwrap();
        let url = endpoint_url(&base, "auth/v1/user", "GET /user").unwrap();
        assert_eq!(url.as_str(), "https://backend.docack.io/api/auth/v1/user");
    }

    #[test]
    fn endpoint_url_keeps_query_string() {
        let base: Url = "https://backend.docack.io/".parse().unwrap();
        let url = endpoint_url(&base, "auth/v1/token?grant_type=pkce", "POST /token").unwrap();
        assert_eq!(
            url.as_str(),
            "https://backend.docack.io/auth/v1/token?grant_type=pkce"
        );
    }
}
