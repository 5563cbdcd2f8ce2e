//! Login form CSRF tokens.
//!
//! The login page hands out a random token twice: in a cookie scoped to the
//! login path and in a hidden form field. A login POST is processed only when
//! both copies are present and equal.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::session::generate_session_token;
use crate::urls::RouteName;

pub const CSRF_COOKIE: &str = "csrftoken";

/// The token already held by the browser, or a fresh one
pub fn current_or_new_token(jar: &CookieJar) -> String {
    jar.get(CSRF_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|token| !token.is_empty())
        .unwrap_or_else(generate_session_token)
}

pub fn csrf_cookie(token: String) -> Cookie<'static> {
    Cookie::build((CSRF_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path(RouteName::Login.pattern())
        .build()
}

/// Whether the submitted form token matches the cookie
pub fn verify_token(jar: &CookieJar, submitted: &str) -> bool {
    matches!(jar.get(CSRF_COOKIE), Some(cookie) if !cookie.value().is_empty() && cookie.value() == submitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};

    fn jar_with(cookie: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn test_verify_token() {
        let jar = jar_with("csrftoken=abc123");

        assert!(verify_token(&jar, "abc123"));
        assert!(!verify_token(&jar, "abc124"));
        assert!(!verify_token(&jar, ""));
    }

    #[test]
    fn test_missing_or_empty_cookie_never_verifies() {
        assert!(!verify_token(&CookieJar::new(), ""));
        assert!(!verify_token(&jar_with("csrftoken="), ""));
    }

    #[test]
    fn test_existing_token_is_reused() {
        assert_eq!(current_or_new_token(&jar_with("csrftoken=abc123")), "abc123");
        assert_eq!(current_or_new_token(&CookieJar::new()).len(), 43);
    }

    #[test]
    fn test_cookie_is_scoped_to_login() {
        let cookie = csrf_cookie("abc123".to_string());

        assert_eq!(cookie.path(), Some("/accounts/login/"));
        assert_eq!(cookie.http_only(), Some(true));
    }
}
