//! # Access Gate Middleware
//!
//! The gate runs on every non-health request. It resolves the session
//! cookies to an identity **once per request**, injects the identity into
//! request extensions for handlers, and applies the routing rules:
//!
//! 1. dashboard/admin without identity → redirect `/`
//! 2. root with identity → redirect `/dashboard`
//! 3. admin with identity but without the admin role → redirect `/dashboard`
//! 4. otherwise allow
//!
//! Token refresh can rotate the session pair during resolution; the
//! rotated cookies are written onto the outgoing response on **every**
//! verdict, including redirects. Dropping them would strand the client on
//! a dead session.
//!
//! Classification and the verdict table are pure functions so the rules
//! are testable without a provider or a socket.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use docack_core::Identity;
use docack_providers::ResolvedSession;

use crate::session;
use crate::state::AppState;

// ── Route classification ────────────────────────────────────────────────────

/// Gate-relevant route classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// The login landing at exactly `/`.
    Root,
    /// Employee surface under `/dashboard`.
    Dashboard,
    /// Admin surface under `/admin`.
    Admin,
    /// Auth flows under `/auth`.
    Auth,
    /// Everything else the gate sees; allowed for any caller.
    Other,
}

/// Classify a request path.
pub fn classify(path: &str) -> RouteClass {
    if path == "/" {
        RouteClass::Root
    } else if path == "/dashboard" || path.starts_with("/dashboard/") {
        RouteClass::Dashboard
    } else if path == "/admin" || path.starts_with("/admin/") {
        RouteClass::Admin
    } else if path == "/auth" || path.starts_with("/auth/") {
        RouteClass::Auth
    } else {
        RouteClass::Other
    }
}

// ── Verdict ─────────────────────────────────────────────────────────────────

/// Outcome of applying the gate rules to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Let the request through to its handler.
    Allow,
    /// Redirect the caller to the given location.
    Redirect(&'static str),
}

/// Apply the gate rules to a classified request.
pub fn verdict(class: RouteClass, identity: Option<&Identity>) -> Verdict {
    match (class, identity) {
        (RouteClass::Dashboard | RouteClass::Admin, None) => Verdict::Redirect("/"),
        (RouteClass::Root, Some(_)) => Verdict::Redirect("/dashboard"),
        (RouteClass::Admin, Some(id)) if !id.is_admin() => Verdict::Redirect("/dashboard"),
        _ => Verdict::Allow,
    }
}

// ── Middleware ──────────────────────────────────────────────────────────────

/// Resolve the session, inject the identity, and enforce the gate rules.
///
/// A provider failure during resolution is treated as an anonymous
/// session (logged at warn); it must never take the whole surface down.
pub async fn gate_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let (access, refresh) = session::session_cookies(&jar);

    let resolved = match state
        .providers
        .identity()
        .resolve_session(access.as_deref(), refresh.as_deref())
        .await
    {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::warn!(error = %e, "session resolution failed, treating request as anonymous");
            ResolvedSession::anonymous()
        }
    };

    let class = classify(request.uri().path());
    let mut response = match verdict(class, resolved.identity.as_ref()) {
        Verdict::Allow => {
            if let Some(identity) = resolved.identity {
                request.extensions_mut().insert(identity);
            }
            next.run(request).await
        }
        Verdict::Redirect(location) => {
            tracing::debug!(path = request.uri().path(), location, "gate redirect");
            Redirect::to(location).into_response()
        }
    };

    if let Some(tokens) = &resolved.refreshed {
        session::append_refreshed(response.headers_mut(), tokens);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn identity(role: Option<&str>) -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            email: "dev@docack.io".to_string(),
            role: role.map(String::from),
        }
    }

    // ── classify ─────────────────────────────────────────────────

    #[test]
    fn classify_root_is_exact() {
        assert_eq!(classify("/"), RouteClass::Root);
        assert_ne!(classify("/anything"), RouteClass::Root);
    }

    #[test]
    fn classify_prefixes() {
        assert_eq!(classify("/dashboard"), RouteClass::Dashboard);
        assert_eq!(classify("/dashboard/documents"), RouteClass::Dashboard);
        assert_eq!(classify("/admin"), RouteClass::Admin);
        assert_eq!(classify("/admin/documents/abc"), RouteClass::Admin);
        assert_eq!(classify("/auth/login"), RouteClass::Auth);
        assert_eq!(classify("/health/liveness"), RouteClass::Other);
    }

    #[test]
    fn classify_requires_segment_boundary() {
        // "/dashboards" is not the dashboard surface.
        assert_eq!(classify("/dashboards"), RouteClass::Other);
        assert_eq!(classify("/administrator"), RouteClass::Other);
    }

    // ── verdict table ────────────────────────────────────────────

    #[test]
    fn anonymous_dashboard_redirects_home() {
        assert_eq!(verdict(RouteClass::Dashboard, None), Verdict::Redirect("/"));
    }

    #[test]
    fn anonymous_admin_redirects_home() {
        assert_eq!(verdict(RouteClass::Admin, None), Verdict::Redirect("/"));
    }

    #[test]
    fn authenticated_root_redirects_to_dashboard() {
        let id = identity(None);
        assert_eq!(
            verdict(RouteClass::Root, Some(&id)),
            Verdict::Redirect("/dashboard")
        );
    }

    #[test]
    fn non_admin_on_admin_redirects_to_dashboard() {
        let id = identity(Some("manager"));
        assert_eq!(
            verdict(RouteClass::Admin, Some(&id)),
            Verdict::Redirect("/dashboard")
        );
        let id = identity(None);
        assert_eq!(
            verdict(RouteClass::Admin, Some(&id)),
            Verdict::Redirect("/dashboard")
        );
    }

    #[test]
    fn admin_on_admin_allowed() {
        let id = identity(Some("admin"));
        assert_eq!(verdict(RouteClass::Admin, Some(&id)), Verdict::Allow);
    }

    #[test]
    fn authenticated_dashboard_allowed() {
        let id = identity(None);
        assert_eq!(verdict(RouteClass::Dashboard, Some(&id)), Verdict::Allow);
    }

    #[test]
    fn anonymous_root_and_auth_allowed() {
        assert_eq!(verdict(RouteClass::Root, None), Verdict::Allow);
        assert_eq!(verdict(RouteClass::Auth, None), Verdict::Allow);
    }

    #[test]
    fn authenticated_auth_routes_allowed() {
        // Logout needs an authenticated caller to pass through.
        let id = identity(Some("admin"));
        assert_eq!(verdict(RouteClass::Auth, Some(&id)), Verdict::Allow);
    }
}
