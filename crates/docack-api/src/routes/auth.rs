//! # Auth Flow Routes
//!
//! | Method | Path            | Operation                       |
//! |--------|-----------------|---------------------------------|
//! | POST   | `/auth/login`   | Magic-link issuance             |
//! | POST   | `/auth/confirm` | Code/token exchange, set cookies|
//! | POST   | `/auth/logout`  | Clear session cookies           |
//!
//! Credential handling stays with the identity provider; these handlers
//! only move opaque tokens between the provider and the cookies.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use axum_extra::extract::cookie::CookieJar;
use docack_core::ValidationError;
use docack_providers::email::OutgoingEmail;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::session;
use crate::state::AppState;

/// Router for the auth flows.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/confirm", post(confirm))
        .route("/auth/logout", post(logout))
}

// ── POST /auth/login ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
}

/// Issue a magic sign-in link and send it by email.
async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let email = req.email.trim().to_lowercase();

    if !docack_core::is_allowed_domain(&email) {
        return Err(docack_core::ValidationError::DisallowedEmailDomain { email }.into());
    }

    let redirect_to = format!("{}/auth/confirm", state.config.public_base_url);
    let link = state
        .providers
        .identity()
        .generate_magic_link(&email, &redirect_to)
        .await?;

    state
        .providers
        .email()
        .send(&OutgoingEmail {
            to: email.clone(),
            subject: "Sign in to Docack".to_string(),
            html: sign_in_mail(&link),
        })
        .await?;

    tracing::info!(%email, "sign-in link sent");
    Ok(Json(LoginResponse { status: "sent" }))
}

fn sign_in_mail(link: &str) -> String {
    format!(
        "<h2>Sign in to Docack</h2>\
         <p>Click the link below to sign in. The link is valid once.</p>\
         <p><a href=\"{link}\">Sign in</a></p>\
         <p>If you did not request this, you can ignore this email.</p>"
    )
}

// ── POST /auth/confirm ──────────────────────────────────────────────────────

/// Either an authorization code or a token pair from the confirmation
/// link fragment.
#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl Validate for ConfirmRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.code.is_none() && (self.access_token.is_none() || self.refresh_token.is_none()) {
            return Err(ValidationError::MissingField(
                "code or access/refresh token pair",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub location: &'static str,
}

/// Exchange the confirmation credentials for a session and set cookies.
async fn confirm(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<ConfirmRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<ConfirmResponse>), AppError> {
    let req = extract_validated_json(body)?;

    let tokens = if let Some(code) = &req.code {
        state.providers.identity().exchange_code(code).await?
    } else {
        // Validation guarantees both tokens are present on this branch.
        let (Some(access), Some(refresh)) = (&req.access_token, &req.refresh_token) else {
            return Err(AppError::BadRequest("missing token pair".to_string()));
        };
        let resolved = state
            .providers
            .identity()
            .resolve_session(Some(access), Some(refresh))
            .await?;
        if resolved.identity.is_none() {
            return Err(AppError::Unauthorized("invalid session tokens".to_string()));
        }
        resolved
            .refreshed
            .unwrap_or_else(|| docack_providers::SessionTokens {
                access_token: access.clone(),
                refresh_token: refresh.clone(),
            })
    };

    let jar = session::with_tokens(jar, &tokens);
    Ok((
        jar,
        Json(ConfirmResponse {
            location: "/dashboard",
        }),
    ))
}

// ── POST /auth/logout ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub location: &'static str,
}

/// Clear the session cookies.
async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    (session::cleared(jar), Json(LogoutResponse { location: "/" }))
}
