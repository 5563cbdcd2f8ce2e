use super::*;
use crate::test_utils::{logged_in_driver, test_state};
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

async fn get(app: Router, uri: &str, cookie: Option<&axum::http::HeaderValue>) -> (StatusCode, String) {
    let mut builder = Request::builder().uri(uri).method("GET");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_index_requires_login() {
    let app = create_app(test_state());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/accounts/login/?next=%2F"
    );
}

#[tokio::test]
async fn test_login_page_is_public() {
    let app = create_app(test_state());

    let (status, body) = get(app, "/accounts/login/?next=/cars/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("name=\"password\""));
    assert!(body.contains("name=\"next\""));
}

#[tokio::test]
async fn test_index_shows_counts_and_visits() {
    let state = test_state();
    let (_, cookie) = logged_in_driver(&state, "admin");
    repo::create_manufacturer(&state.pool, "Toyota", "Japan").unwrap();

    let (status, body) = get(create_app(state.clone()), "/", Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<strong>Manufacturers:</strong> 1"));
    assert!(body.contains("<strong>Drivers:</strong> 1"));
    assert!(body.contains("visited this page 1 time."));

    let (_, body) = get(create_app(state), "/", Some(&cookie)).await;
    assert!(body.contains("visited this page 2 times."));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let state = test_state();
    let (_, cookie) = logged_in_driver(&state, "admin");

    let (status, _) = get(create_app(state), "/cars/999/", Some(&cookie)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stale_cookie_redirects() {
    let state = test_state();
    let (_, cookie) = logged_in_driver(&state, "admin");
    let token = cookie.to_str().unwrap().split_once('=').unwrap().1.to_string();
    repo::delete_session(&state.pool, &token).unwrap();

    let (status, _) = get(create_app(state), "/drivers/", Some(&cookie)).await;

    assert_eq!(status, StatusCode::FOUND);
}
