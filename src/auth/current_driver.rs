use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::Response,
};

use super::login_redirect;
use crate::models::Driver;

/// The driver behind the current request's session
#[derive(Debug, Clone)]
pub struct CurrentDriver {
    pub driver: Driver,
    /// Token of the session the request was authenticated with
    pub session_token: String,
}

impl<S> FromRequestParts<S> for CurrentDriver
where
    S: Send + Sync,
{
    type Rejection = Response;

    /// Reads the driver placed in the extensions by `require_login`. Outside
    /// the protected routes there is none, so the client is sent to log in.
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentDriver>()
            .cloned()
            .ok_or_else(|| login_redirect(&parts.uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Request, StatusCode};

    #[tokio::test]
    async fn test_extracts_driver_from_extensions() {
        let mut request = Request::builder().uri("/").body(()).unwrap();
        request.extensions_mut().insert(CurrentDriver {
            driver: Driver::for_tests(7, "driver1", "First", "Last"),
            session_token: "token".to_string(),
        });
        let (mut parts, _) = request.into_parts();

        let current = CurrentDriver::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(current.driver.get_id(), 7);
        assert_eq!(current.session_token, "token");
    }

    #[tokio::test]
    async fn test_missing_driver_redirects_to_login() {
        let request = Request::builder().uri("/cars/1/").body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        let rejection = CurrentDriver::from_request_parts(&mut parts, &()).await.unwrap_err();

        assert_eq!(rejection.status(), StatusCode::FOUND);
        let location = rejection.headers().get(header::LOCATION).unwrap().to_str().unwrap();
        assert!(location.starts_with("/accounts/login/?next="));
    }
}
