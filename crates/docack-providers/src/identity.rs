//! Typed client for the managed identity provider.
//!
//! The provider owns all credential handling: it issues one-time sign-in
//! links, exchanges authorization codes or token pairs for sessions, and
//! resolves a session's access token to `{email, role?}`. Docack performs
//! no token cryptography of its own.
//!
//! ## Endpoints
//!
//! | Method | Path | Operation |
//! |--------|------------------------------------------|----------------------------|
//! | GET    | `/auth/v1/user`                          | Resolve access token       |
//! | POST   | `/auth/v1/token?grant_type=refresh_token`| Refresh a session          |
//! | POST   | `/auth/v1/token?grant_type=pkce`         | Exchange an auth code      |
//! | POST   | `/auth/v1/admin/generate_link`           | Issue a magic sign-in link |

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;
use zeroize::Zeroizing;

use docack_core::Identity;

use crate::error::ProviderError;
use crate::retry::retry_send;

/// Auth API path prefix on the managed backend.
const AUTH_PREFIX: &str = "auth/v1";

/// An access/refresh token pair representing a session.
///
/// Tokens are opaque to Docack; they are stored in cookies and forwarded
/// back to the provider verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    /// Short-lived access token presented on every request.
    pub access_token: String,
    /// Long-lived refresh token used when the access token expires.
    pub refresh_token: String,
}

/// Outcome of resolving a request's session cookies.
///
/// `refreshed` is populated when the provider rotated the token pair during
/// resolution; the caller must write the new pair back onto the outgoing
/// response regardless of which verdict the gate reaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSession {
    /// The resolved caller, if the session was valid.
    pub identity: Option<Identity>,
    /// A rotated token pair to propagate onto the response, if any.
    pub refreshed: Option<SessionTokens>,
}

impl ResolvedSession {
    /// A session with no caller and nothing to propagate.
    pub fn anonymous() -> Self {
        Self {
            identity: None,
            refreshed: None,
        }
    }
}

// -- Wire types --------------------------------------------------------------

/// User payload returned by `GET /auth/v1/user`.
///
/// `#[serde(default)]` on optional fields for resilience against provider
/// schema evolution; unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct UserResponse {
    id: Uuid,
    email: String,
    #[serde(default)]
    app_metadata: AppMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct AppMetadata {
    #[serde(default)]
    role: Option<String>,
}

impl UserResponse {
    fn into_identity(self) -> Identity {
        Identity {
            user_id: self.id,
            email: self.email,
            role: self.app_metadata.role,
        }
    }
}

/// Token payload returned by the `token` grant endpoints.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
}

/// Magic-link payload returned by `POST /auth/v1/admin/generate_link`.
#[derive(Debug, Deserialize)]
struct GenerateLinkResponse {
    #[serde(default)]
    action_link: Option<String>,
}

// -- Client ------------------------------------------------------------------

/// Client for the managed identity provider.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: Url,
    publishable_key: Zeroizing<String>,
    secret_key: Zeroizing<String>,
}

impl std::fmt::Debug for IdentityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityClient")
            .field("base_url", &self.base_url)
            .field("publishable_key", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

impl IdentityClient {
    pub(crate) fn new(
        http: reqwest::Client,
        base_url: Url,
        publishable_key: Zeroizing<String>,
        secret_key: Zeroizing<String>,
    ) -> Self {
        Self {
            http,
            base_url,
            publishable_key,
            secret_key,
        }
    }

    /// Resolve a session from its cookies.
    ///
    /// Tries the access token first; on a 401 with a refresh token present,
    /// refreshes the session and retries once with the rotated pair. The
    /// rotated pair is returned in `refreshed` so the caller can propagate
    /// the new cookies — a refresh must never be silently dropped.
    pub async fn resolve_session(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Result<ResolvedSession, ProviderError> {
        if let Some(access) = access_token {
            if let Some(identity) = self.get_user(access).await? {
                return Ok(ResolvedSession {
                    identity: Some(identity),
                    refreshed: None,
                });
            }
        }

        let Some(refresh) = refresh_token else {
            return Ok(ResolvedSession::anonymous());
        };

        // Access token absent or expired — attempt one refresh. A rejected
        // refresh token means the session is simply gone, not an error.
        let tokens = match self.refresh_session(refresh).await {
            Ok(tokens) => tokens,
            Err(ProviderError::Api { status, .. }) if (400..500).contains(&status) => {
                return Ok(ResolvedSession::anonymous());
            }
            Err(e) => return Err(e),
        };

        let identity = self.get_user(&tokens.access_token).await?;
        Ok(ResolvedSession {
            identity,
            refreshed: Some(tokens),
        })
    }

    /// Resolve an access token to its user, or `None` if the token is
    /// invalid or expired.
    ///
    /// Calls `GET {base_url}/auth/v1/user`.
    pub async fn get_user(&self, access_token: &str) -> Result<Option<Identity>, ProviderError> {
        let endpoint = "GET /user";
        let url = crate::endpoint_url(&self.base_url, &format!("{AUTH_PREFIX}/user"), endpoint)?;

        let resp = retry_send(|| {
            self.http
                .get(url.clone())
                .header("apikey", self.publishable_key.as_str())
                .bearer_auth(access_token)
                .send()
        })
        .await
        .map_err(|e| ProviderError::Http {
            endpoint: endpoint.into(),
            source: e,
        })?;

        if resp.status() == reqwest::StatusCode::UNAUTHORIZED
            || resp.status() == reqwest::StatusCode::FORBIDDEN
        {
            return Ok(None);
        }

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        let user: UserResponse =
            resp.json()
                .await
                .map_err(|e| ProviderError::Deserialization {
                    endpoint: endpoint.into(),
                    source: e,
                })?;
        Ok(Some(user.into_identity()))
    }

    /// Exchange a refresh token for a rotated session.
    ///
    /// Calls `POST {base_url}/auth/v1/token?grant_type=refresh_token`.
    pub async fn refresh_session(
        &self,
        refresh_token: &str,
    ) -> Result<SessionTokens, ProviderError> {
        self.token_grant(
            "refresh_token",
            serde_json::json!({ "refresh_token": refresh_token }),
        )
        .await
    }

    /// Exchange an authorization code for a session.
    ///
    /// Calls `POST {base_url}/auth/v1/token?grant_type=pkce`.
    pub async fn exchange_code(&self, code: &str) -> Result<SessionTokens, ProviderError> {
        self.token_grant("pkce", serde_json::json!({ "auth_code": code }))
            .await
    }

    async fn token_grant(
        &self,
        grant_type: &str,
        body: serde_json::Value,
    ) -> Result<SessionTokens, ProviderError> {
        let endpoint = format!("POST /token?grant_type={grant_type}");
        let url = crate::endpoint_url(
            &self.base_url,
            &format!("{AUTH_PREFIX}/token?grant_type={grant_type}"),
            &endpoint,
        )?;

        let resp = retry_send(|| {
            self.http
                .post(url.clone())
                .header("apikey", self.publishable_key.as_str())
                .json(&body)
                .send()
        })
        .await
        .map_err(|e| ProviderError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                endpoint,
                status,
                body,
            });
        }

        let tokens: TokenResponse =
            resp.json()
                .await
                .map_err(|e| ProviderError::Deserialization {
                    endpoint: endpoint.clone(),
                    source: e,
                })?;
        Ok(SessionTokens {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }

    /// Issue a one-time magic sign-in link bound to `email`, redirecting to
    /// `redirect_to` after authentication. Requires the secret key.
    ///
    /// Calls `POST {base_url}/auth/v1/admin/generate_link`.
    pub async fn generate_magic_link(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<String, ProviderError> {
        let endpoint = "POST /admin/generate_link";
        let url = crate::endpoint_url(
            &self.base_url,
            &format!("{AUTH_PREFIX}/admin/generate_link"),
            endpoint,
        )?;

        let body = serde_json::json!({
            "type": "magiclink",
            "email": email,
            "options": { "redirect_to": redirect_to },
        });

        let resp = retry_send(|| {
            self.http
                .post(url.clone())
                .header("apikey", self.secret_key.as_str())
                .bearer_auth(self.secret_key.as_str())
                .json(&body)
                .send()
        })
        .await
        .map_err(|e| ProviderError::Http {
            endpoint: endpoint.into(),
            source: e,
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        let link: GenerateLinkResponse =
            resp.json()
                .await
                .map_err(|e| ProviderError::Deserialization {
                    endpoint: endpoint.into(),
                    source: e,
                })?;

        link.action_link.ok_or(ProviderError::MissingField {
            endpoint: endpoint.into(),
            field: "action_link",
        })
    }
}
