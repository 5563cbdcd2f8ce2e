//! Taxi Service: fleet management for a taxi company
//!
//! This library provides drivers, cars and manufacturers with server-rendered
//! HTML pages to list, search, create, update and delete them, behind a
//! username/password login.
//!
//! ### Modules
//!
//! - `config`: Layered configuration (defaults, TOML file, CLI/env)
//! - `db`: Database connection pool and migrations
//! - `models`: Data structures for manufacturers, cars, drivers and sessions
//! - `repo`: Repository layer for database operations
//! - `auth`: Password hashing, sessions and the login gate
//! - `forms`: HTML form payloads and validation
//! - `urls`: Named routes
//! - `templates`: The embedded HTML templates
//! - `handlers`: One handler per page
//!
//! ### Pages
//!
//! Every page except login and logout requires a logged-in driver:
//!
//! - `GET /`: Record counts and the session's visit counter
//! - `GET /manufacturers/`, `/cars/`, `/drivers/`: Searchable, paged lists
//! - `GET /cars/{id}/`, `/drivers/{id}/`: Detail pages
//! - `GET|POST .../create/`, `.../{id}/update/`, `.../{id}/delete/`: Forms
//! - `POST /cars/{id}/toggle-assign/`: Join or leave a car's drivers
//! - `GET|POST /accounts/login/`, `POST /accounts/logout/`

/// Configuration module
pub mod config;

/// Database connection module
pub mod db;

/// Data models module
pub mod models;

/// Repository module for database operations
pub mod repo;

/// Database schema module
pub mod schema;

pub mod auth;
pub mod forms;
pub mod urls;
pub mod templates;
pub mod telemetry;

/// Page handlers module
pub mod handlers;

/// Error handling module
pub mod errors;

#[cfg(test)]
mod test_utils;

use axum::{
    extract::FromRef,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use minijinja::Environment;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::DbPool;
use crate::urls::RouteName;

pub use crate::db::run_migrations;

/// Shared state of every request
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<DbPool>,
    pub templates: Arc<Environment<'static>>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Builds the state, loading the templates
    pub fn new(pool: Arc<DbPool>, config: Config) -> Result<Self, minijinja::Error> {
        Ok(Self {
            pool,
            templates: Arc::new(templates::build_environment()?),
            config: Arc::new(config),
        })
    }
}

impl FromRef<AppState> for Arc<DbPool> {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<Environment<'static>> {
    fn from_ref(state: &AppState) -> Self {
        state.templates.clone()
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

/// Creates the application router
///
/// Fleet pages are wrapped in the login gate; the login and logout pages are
/// not.
pub fn create_app(state: AppState) -> Router {
    use handlers::*;

    let protected = Router::new()
        .route(RouteName::Index.pattern(), get(index_handler))
        // Manufacturers
        .route(RouteName::ManufacturerList.pattern(), get(manufacturer_list_handler))
        .route(
            RouteName::ManufacturerCreate.pattern(),
            get(manufacturer_create_page_handler).post(manufacturer_create_handler),
        )
        .route(
            RouteName::ManufacturerUpdate.pattern(),
            get(manufacturer_update_page_handler).post(manufacturer_update_handler),
        )
        .route(
            RouteName::ManufacturerDelete.pattern(),
            get(manufacturer_delete_page_handler).post(manufacturer_delete_handler),
        )
        // Cars
        .route(RouteName::CarList.pattern(), get(car_list_handler))
        .route(RouteName::CarDetail.pattern(), get(car_detail_handler))
        .route(RouteName::CarCreate.pattern(), get(car_create_page_handler).post(car_create_handler))
        .route(RouteName::CarUpdate.pattern(), get(car_update_page_handler).post(car_update_handler))
        .route(RouteName::CarDelete.pattern(), get(car_delete_page_handler).post(car_delete_handler))
        .route(RouteName::ToggleCarAssign.pattern(), post(toggle_car_assign_handler))
        // Drivers
        .route(RouteName::DriverList.pattern(), get(driver_list_handler))
        .route(RouteName::DriverDetail.pattern(), get(driver_detail_handler))
        .route(
            RouteName::DriverCreate.pattern(),
            get(driver_create_page_handler).post(driver_create_handler),
        )
        .route(
            RouteName::DriverUpdate.pattern(),
            get(driver_update_page_handler).post(driver_update_handler),
        )
        .route(
            RouteName::DriverDelete.pattern(),
            get(driver_delete_page_handler).post(driver_delete_handler),
        )
        .route_layer(from_fn_with_state(state.clone(), auth::require_login));

    Router::new()
        .route(RouteName::Login.pattern(), get(login_page_handler).post(login_handler))
        .route(RouteName::Logout.pattern(), post(logout_handler))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests;
