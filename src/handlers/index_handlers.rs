use axum::{extract::State, response::Html};
use minijinja::{context, Environment};
use std::sync::Arc;
use tracing::{instrument, debug};

use crate::auth::CurrentDriver;
use crate::db::DbPool;
use crate::errors::ApiError;
use crate::repo;
use crate::templates::render;

/// Handler for the home page
///
/// Shows how many drivers, cars and manufacturers there are, and counts the
/// visits made in the current session.
#[instrument(skip_all)]
pub async fn index_handler(
    State(pool): State<Arc<DbPool>>,
    State(templates): State<Arc<Environment<'static>>>,
    current: CurrentDriver,
) -> Result<Html<String>, ApiError> {
    let num_visits = repo::record_visit(&pool, &current.session_token)
        .map_err(ApiError::Database)?;
    let num_drivers = repo::count_drivers(&pool).map_err(ApiError::Database)?;
    let num_cars = repo::count_cars(&pool).map_err(ApiError::Database)?;
    let num_manufacturers = repo::count_manufacturers(&pool).map_err(ApiError::Database)?;

    debug!("Visit {} of this session", num_visits);

    render(
        &templates,
        "taxi/index.html",
        context! {
            user => current.driver,
            num_drivers,
            num_cars,
            num_manufacturers,
            num_visits,
        },
    )
}
