//! # Session Cookie Plumbing
//!
//! The session lives in two cookies holding the provider's opaque token
//! pair. This module owns the cookie names, attributes, and the helpers
//! the gate and the auth routes use to read, set, and clear them.

use axum::http::header::{HeaderMap, HeaderValue, SET_COOKIE};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use docack_providers::SessionTokens;

/// Cookie holding the short-lived access token.
pub const ACCESS_COOKIE: &str = "da-access-token";

/// Cookie holding the long-lived refresh token.
pub const REFRESH_COOKIE: &str = "da-refresh-token";

/// Read the session token pair from a request's cookies.
pub fn session_cookies(jar: &CookieJar) -> (Option<String>, Option<String>) {
    let access = jar.get(ACCESS_COOKIE).map(|c| c.value().to_string());
    let refresh = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());
    (access, refresh)
}

/// Build a session cookie with the standard attributes.
///
/// HttpOnly and SameSite=Lax; Path=/ so both cookies travel with every
/// route class the gate sees.
fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Add both session cookies for a token pair to a jar.
pub fn with_tokens(jar: CookieJar, tokens: &SessionTokens) -> CookieJar {
    jar.add(session_cookie(ACCESS_COOKIE, tokens.access_token.clone()))
        .add(session_cookie(REFRESH_COOKIE, tokens.refresh_token.clone()))
}

/// Add removal cookies for both session cookies to a jar.
pub fn cleared(jar: CookieJar) -> CookieJar {
    jar.add(removal_cookie(ACCESS_COOKIE))
        .add(removal_cookie(REFRESH_COOKIE))
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

/// Append `Set-Cookie` headers for a rotated token pair directly onto
/// response headers.
///
/// The gate uses this because it must propagate refreshed cookies onto
/// whatever response it produces, including redirects it builds itself.
pub fn append_refreshed(headers: &mut HeaderMap, tokens: &SessionTokens) {
    for cookie in [
        session_cookie(ACCESS_COOKIE, tokens.access_token.clone()),
        session_cookie(REFRESH_COOKIE, tokens.refresh_token.clone()),
    ] {
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                headers.append(SET_COOKIE, value);
            }
            Err(e) => {
                tracing::error!(cookie = cookie.name(), error = %e, "failed to encode session cookie");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie(ACCESS_COOKIE, "tok".to_string());
        assert_eq!(cookie.name(), "da-access-token");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }

    #[test]
    fn with_tokens_sets_both_cookies() {
        let jar = with_tokens(
            CookieJar::new(),
            &SessionTokens {
                access_token: "a".to_string(),
                refresh_token: "r".to_string(),
            },
        );
        assert_eq!(jar.get(ACCESS_COOKIE).map(|c| c.value()), Some("a"));
        assert_eq!(jar.get(REFRESH_COOKIE).map(|c| c.value()), Some("r"));
    }

    #[test]
    fn cleared_emits_removal_cookies() {
        let jar = cleared(CookieJar::new());
        for name in [ACCESS_COOKIE, REFRESH_COOKIE] {
            let cookie = jar.get(name).expect("removal cookie present");
            assert_eq!(cookie.value(), "");
            assert_eq!(cookie.max_age().map(|d| d.is_zero()), Some(true));
        }
    }

    #[test]
    fn append_refreshed_writes_two_set_cookie_headers() {
        let mut headers = HeaderMap::new();
        append_refreshed(
            &mut headers,
            &SessionTokens {
                access_token: "fresh-a".to_string(),
                refresh_token: "fresh-r".to_string(),
            },
        );
        let values: Vec<_> = headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(values.len(), 2);
        assert!(values[0].starts_with("da-access-token=fresh-a"));
        assert!(values[1].starts_with("da-refresh-token=fresh-r"));
    }
}
