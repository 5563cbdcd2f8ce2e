use axum::{
    extract::{Request, State},
    http::{header, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use tracing::{debug, instrument, trace};

use super::CurrentDriver;
use crate::errors::ApiError;
use crate::repo;
use crate::urls::RouteName;
use crate::AppState;

/// Builds the login page URL that sends the browser back to `uri` afterwards
pub fn login_url(uri: &Uri) -> String {
    let next = uri.path_and_query().map_or("/", |pq| pq.as_str());
    // Serializing a single pair of strings cannot fail
    let query = serde_html_form::to_string([("next", next)]).unwrap_or_default();
    format!("{}?{}", RouteName::Login.pattern(), query)
}

/// `302 Found` to the login page, remembering where the request was going
pub fn login_redirect(uri: &Uri) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, login_url(uri))]).into_response()
}

/// Lets the request through only when it carries a live session cookie.
///
/// The resolved driver is stored in the request extensions as a
/// [`CurrentDriver`] for handlers to extract.
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn require_login(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = jar.get(&state.config.cookie_name).map(|c| c.value().to_string()) else {
        debug!("No session cookie, redirecting to login");
        return login_redirect(request.uri());
    };

    match repo::find_session(&state.pool, &token) {
        Ok(Some((session, driver))) => {
            trace!("Authenticated driver {}", driver.get_id());
            request.extensions_mut().insert(CurrentDriver {
                driver,
                session_token: session.get_token(),
            });
            next.run(request).await
        }
        Ok(None) => {
            debug!("Session cookie did not resolve to a live session");
            login_redirect(request.uri())
        }
        Err(e) => ApiError::Database(e).into_response(),
    }
}
