//! Common test utilities for taxi-service integration tests
//!
//! This file contains shared functions and utilities for all integration tests,
//! including test application setup, login helpers and request helpers.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderValue, Request, Response, StatusCode},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use taxi_service::{
    config::base_config,
    create_app,
    db::{init_pool, run_migrations},
    models::{Driver, DriverRegistration},
    repo, AppState,
};
use tower::ServiceExt;

/// A test application and the state behind it
pub struct TestApp {
    pub state: AppState,
}

impl TestApp {
    pub fn router(&self) -> Router {
        create_app(self.state.clone())
    }
}

/// Creates a test application over a fresh in-memory SQLite database
///
/// Each database is a named, shared-cache in-memory database so every pooled
/// connection of one test sees the same rows, and no two tests share one.
pub fn create_test_app() -> TestApp {
    let url = format!("file:it_{}?mode=memory&cache=shared", uuid::Uuid::new_v4().simple());
    let pool = init_pool(&url).unwrap();
    run_migrations(&pool).unwrap();

    let state = AppState::new(Arc::new(pool), base_config(None)).unwrap();
    TestApp { state }
}

/// Creates a superuser and logs them in, returning the `Cookie` header for
/// their session
pub fn login_superuser(app: &TestApp, username: &str, license_number: &str) -> (Driver, HeaderValue) {
    let driver = repo::create_superuser(
        &app.state.pool,
        &DriverRegistration::new(username, "test12345", license_number),
    )
    .unwrap();
    let session =
        repo::create_session(&app.state.pool, driver.get_id(), app.state.config.session_ttl()).unwrap();
    let cookie =
        HeaderValue::from_str(&format!("{}={}", app.state.config.cookie_name, session.get_token())).unwrap();
    (driver, cookie)
}

/// Token the login tests post back, paired with [`csrf_cookie`]
pub const CSRF_TOKEN: &str = "test-csrf-token";

/// `Cookie` header carrying the login form's CSRF token
pub fn csrf_cookie() -> HeaderValue {
    HeaderValue::from_str(&format!("csrftoken={CSRF_TOKEN}")).unwrap()
}

/// Posts the login form with a valid CSRF token
pub async fn post_login(app: &TestApp, fields: &[(&str, &str)]) -> Response<Body> {
    let mut form = fields.to_vec();
    form.push(("csrfmiddlewaretoken", CSRF_TOKEN));
    post_form(app, "/accounts/login/", &form, Some(&csrf_cookie())).await
}

/// Sends a GET request, with the session cookie if given
pub async fn get(app: &TestApp, uri: &str, cookie: Option<&HeaderValue>) -> Response<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.router().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
}

/// Sends a POST request with a url-encoded form body
pub async fn post_form<T: Serialize>(
    app: &TestApp,
    uri: &str,
    form: &T,
    cookie: Option<&HeaderValue>,
) -> Response<Body> {
    let body = serde_html_form::to_string(form).unwrap();
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.router().oneshot(builder.body(Body::from(body)).unwrap()).await.unwrap()
}

/// Reads a response body as a string
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// GET that must succeed; returns the page
pub async fn get_page(app: &TestApp, uri: &str, cookie: &HeaderValue) -> String {
    let response = get(app, uri, Some(cookie)).await;
    assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
    body_string(response).await
}

/// The `Location` header of a redirect
pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
        .to_string()
}
