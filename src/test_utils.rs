use crate::auth::session::generate_session_token;
use crate::config::{base_config, Config};
use crate::db::{init_pool, run_migrations, DbPool};
use crate::models::{Driver, DriverRegistration};
use crate::{repo, AppState};
use axum::http::HeaderValue;
use proptest::prelude::*;
use std::sync::Arc;

/// Sets up a fresh, migrated database for one test
///
/// Each call gets its own named in-memory SQLite database. The shared cache
/// lets every connection of the pool see the same data, and the database
/// lives as long as the pool holds a connection to it.
pub fn setup_test_db() -> Arc<DbPool> {
    let url = format!("file:test_{}?mode=memory&cache=shared", generate_session_token());
    let pool = init_pool(&url).expect("Failed to create test database pool");
    run_migrations(&pool).expect("Failed to run migrations");
    Arc::new(pool)
}

pub fn test_config() -> Config {
    base_config(None)
}

/// Application state over a fresh database
pub fn test_state() -> AppState {
    AppState::new(setup_test_db(), test_config()).expect("Failed to load templates")
}

fn next_driver_number(state: &AppState) -> i64 {
    repo::count_drivers(&state.pool).expect("Failed to count drivers") + 1
}

/// Creates a superuser and a session for it, returning the driver and a
/// `Cookie` header value carrying the session
pub fn logged_in_driver(state: &AppState, username: &str) -> (Driver, HeaderValue) {
    let driver = repo::create_superuser(
        &state.pool,
        &DriverRegistration::new(username, "test12345", format!("ZZZ{:05}", next_driver_number(state))),
    )
    .expect("Failed to create driver");
    let session = repo::create_session(&state.pool, driver.get_id(), state.config.session_ttl())
        .expect("Failed to create session");
    let cookie = HeaderValue::from_str(&format!("{}={}", state.config.cookie_name, session.get_token()))
        .expect("Invalid cookie header");
    (driver, cookie)
}

/// Strings with whitespace, punctuation, unicode and control characters
pub fn arb_messy_string() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-zA-Z0-9 ]{1,20}",
        "\\PC{1,20}",
        ".{0,20}",
        "[ \t\n%_\\\\'\"<>&]{1,10}",
    ]
}
