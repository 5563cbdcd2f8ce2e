use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::{Form, Query};
use minijinja::{context, Environment};
use std::sync::Arc;
use tracing::{instrument, debug, info};

use super::{query_prefix, run_blocking};
use crate::auth::CurrentDriver;
use crate::config::Config;
use crate::db::DbPool;
use crate::errors::ApiError;
use crate::forms::{search_term, DriverCreateForm, DriverSearch, DriverUpdateForm, FormErrors};
use crate::models::{Driver, DriverChanges};
use crate::repo::{self, PageRequest};
use crate::templates::render;
use crate::urls::RouteName;

/// Maps a failed insert or update to form errors when the username or
/// license number is taken
fn save_error(err: anyhow::Error) -> Result<FormErrors, ApiError> {
    match repo::unique_violation_field(&err) {
        Some(field) => Ok(FormErrors::unique("Driver", &field)),
        None => Err(ApiError::Database(err)),
    }
}

fn find_driver(pool: &DbPool, id: i32) -> Result<Driver, ApiError> {
    repo::get_driver(pool, id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)
}

fn render_create_form(
    templates: &Environment<'static>,
    user: &Driver,
    form: &DriverCreateForm,
    errors: &FormErrors,
) -> Result<Html<String>, ApiError> {
    render(templates, "taxi/driver_form.html", context! { user, form, errors })
}

fn render_update_form(
    templates: &Environment<'static>,
    user: &Driver,
    driver: &Driver,
    form: &DriverUpdateForm,
    errors: &FormErrors,
) -> Result<Html<String>, ApiError> {
    render(templates, "taxi/driver_update_form.html", context! { user, driver, form, errors })
}

/// Handler for the driver list
///
/// This function handles GET requests to `/drivers/`, filtered by
/// `?username=` and paged by `?page=`.
#[instrument(skip_all)]
pub async fn driver_list_handler(
    State(pool): State<Arc<DbPool>>,
    State(templates): State<Arc<Environment<'static>>>,
    State(config): State<Arc<Config>>,
    current: CurrentDriver,
    Query(query): Query<DriverSearch>,
) -> Result<Html<String>, ApiError> {
    let term = search_term(query.username.as_deref());
    let page_request = PageRequest::parse(query.page.as_deref(), config.paginate_by);

    let page = repo::search_drivers(&pool, term, page_request).map_err(ApiError::Database)?;

    debug!("Showing {} of {} drivers", page.items.len(), page.total);

    render(
        &templates,
        "taxi/driver_list.html",
        context! {
            user => current.driver,
            driver_list => &page.items,
            page => &page,
            search_value => term.unwrap_or_default(),
            query_prefix => query_prefix("username", term),
        },
    )
}

/// Handler for a driver's page and the cars they drive
#[instrument(skip_all, fields(id = id))]
pub async fn driver_detail_handler(
    State(pool): State<Arc<DbPool>>,
    State(templates): State<Arc<Environment<'static>>>,
    current: CurrentDriver,
    Path(id): Path<i32>,
) -> Result<Html<String>, ApiError> {
    let driver = find_driver(&pool, id)?;
    let cars = repo::list_driver_cars(&pool, id).map_err(ApiError::Database)?;

    render(
        &templates,
        "taxi/driver_detail.html",
        context! { user => current.driver, driver, cars },
    )
}

/// Handler for the empty driver form
#[instrument(skip_all)]
pub async fn driver_create_page_handler(
    State(templates): State<Arc<Environment<'static>>>,
    current: CurrentDriver,
) -> Result<Html<String>, ApiError> {
    render_create_form(&templates, &current.driver, &DriverCreateForm::default(), &FormErrors::new())
}

/// Handler for registering a driver
#[instrument(skip_all)]
pub async fn driver_create_handler(
    State(pool): State<Arc<DbPool>>,
    State(templates): State<Arc<Environment<'static>>>,
    current: CurrentDriver,
    Form(form): Form<DriverCreateForm>,
) -> Result<Response, ApiError> {
    let registration = match form.clean() {
        Ok(registration) => registration,
        Err(errors) => {
            return Ok(render_create_form(&templates, &current.driver, &form, &errors)?.into_response());
        }
    };

    let create_pool = Arc::clone(&pool);
    match run_blocking(move || repo::create_driver(&create_pool, &registration)).await? {
        Ok(driver) => {
            info!("Created driver {}", driver.get_id());
            Ok(Redirect::to(&driver.get_absolute_url()).into_response())
        }
        Err(err) => {
            let errors = save_error(err)?;
            Ok(render_create_form(&templates, &current.driver, &form, &errors)?.into_response())
        }
    }
}

/// Handler for the pre-filled driver form
#[instrument(skip_all, fields(id = id))]
pub async fn driver_update_page_handler(
    State(pool): State<Arc<DbPool>>,
    State(templates): State<Arc<Environment<'static>>>,
    current: CurrentDriver,
    Path(id): Path<i32>,
) -> Result<Html<String>, ApiError> {
    let driver = find_driver(&pool, id)?;
    let form = DriverUpdateForm {
        first_name: driver.get_first_name(),
        last_name: driver.get_last_name(),
        license_number: driver.get_license_number(),
    };
    render_update_form(&templates, &current.driver, &driver, &form, &FormErrors::new())
}

/// Handler for updating a driver's names and license number
#[instrument(skip_all, fields(id = id))]
pub async fn driver_update_handler(
    State(pool): State<Arc<DbPool>>,
    State(templates): State<Arc<Environment<'static>>>,
    current: CurrentDriver,
    Path(id): Path<i32>,
    Form(form): Form<DriverUpdateForm>,
) -> Result<Response, ApiError> {
    let driver = find_driver(&pool, id)?;

    let input = match form.clean() {
        Ok(input) => input,
        Err(errors) => {
            return Ok(render_update_form(&templates, &current.driver, &driver, &form, &errors)?.into_response());
        }
    };

    let changes = DriverChanges {
        first_name: &input.first_name,
        last_name: &input.last_name,
        license_number: &input.license_number,
    };

    match repo::update_driver(&pool, id, changes) {
        Ok(Some(updated)) => Ok(Redirect::to(&updated.get_absolute_url()).into_response()),
        Ok(None) => Err(ApiError::NotFound),
        Err(err) => {
            let errors = save_error(err)?;
            Ok(render_update_form(&templates, &current.driver, &driver, &form, &errors)?.into_response())
        }
    }
}

/// Handler for the delete confirmation page
#[instrument(skip_all, fields(id = id))]
pub async fn driver_delete_page_handler(
    State(pool): State<Arc<DbPool>>,
    State(templates): State<Arc<Environment<'static>>>,
    current: CurrentDriver,
    Path(id): Path<i32>,
) -> Result<Html<String>, ApiError> {
    let driver = find_driver(&pool, id)?;
    render(
        &templates,
        "taxi/driver_confirm_delete.html",
        context! { user => current.driver, driver },
    )
}

/// Handler for deleting a driver, their sessions and their assignments
#[instrument(skip_all, fields(id = id))]
pub async fn driver_delete_handler(
    State(pool): State<Arc<DbPool>>,
    _current: CurrentDriver,
    Path(id): Path<i32>,
) -> Result<Redirect, ApiError> {
    if !repo::delete_driver(&pool, id).map_err(ApiError::Database)? {
        return Err(ApiError::NotFound);
    }
    info!("Deleted driver {}", id);
    Ok(Redirect::to(RouteName::DriverList.pattern()))
}
