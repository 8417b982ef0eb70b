//! # Caller Identity Extraction & Admin Checks
//!
//! The gate middleware injects the resolved [`Identity`] into request
//! extensions; handlers extract it through [`Caller`]. Admin handlers
//! additionally call [`require_admin`], which re-evaluates domain
//! membership and the role claim independently of the gate. Every
//! admin-namespaced request is therefore checked by two code paths that
//! must agree.

use axum::http::request::Parts;
use docack_core::Identity;

use crate::error::AppError;

/// The authenticated caller, extracted from request extensions.
///
/// Returns 401 if no identity is present (the gate let an anonymous
/// request through to a handler that needs one, e.g. logout called
/// without a session).
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(Caller)
            .ok_or_else(|| AppError::Unauthorized("no authenticated session".into()))
    }
}

/// Handler-layer admin check, independent of the gate.
///
/// Requires both organization membership and the admin role claim.
/// Returns 403 Forbidden if either is missing.
pub fn require_admin(identity: &Identity) -> Result<(), AppError> {
    if !identity.in_allowed_domain() {
        return Err(AppError::Forbidden(
            "caller is outside the allowed organization".to_string(),
        ));
    }
    if !identity.is_admin() {
        return Err(AppError::Forbidden(
            "administrator role required".to_string(),
        ));
    }
    Ok(())
}
