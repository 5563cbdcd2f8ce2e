use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::{Form, Query};
use minijinja::{context, Environment};
use std::sync::Arc;
use tracing::{instrument, debug, info};

use super::query_prefix;
use crate::auth::CurrentDriver;
use crate::config::Config;
use crate::db::DbPool;
use crate::errors::ApiError;
use crate::forms::{search_term, CarForm, CarInput, CarSearch, FormErrors};
use crate::models::{Car, Driver};
use crate::repo::{self, PageRequest};
use crate::templates::render;
use crate::urls::{path_for, RouteName};

const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

/// Renders the car form with every manufacturer and driver to choose from
fn render_form(
    pool: &DbPool,
    templates: &Environment<'static>,
    user: &Driver,
    form: &CarForm,
    errors: &FormErrors,
    car_id: Option<i32>,
) -> Result<Html<String>, ApiError> {
    let manufacturers = repo::list_manufacturers(pool).map_err(ApiError::Database)?;
    let drivers = repo::list_drivers(pool).map_err(ApiError::Database)?;
    render(
        templates,
        "taxi/car_form.html",
        context! { user, form, errors, car_id, manufacturers, drivers },
    )
}

/// Checks the chosen manufacturer exists, so the form can say which field is wrong
fn check_choices(pool: &DbPool, input: &CarInput) -> Result<FormErrors, ApiError> {
    let mut errors = FormErrors::new();
    if repo::get_manufacturer(pool, input.manufacturer_id)
        .map_err(ApiError::Database)?
        .is_none()
    {
        errors.add("manufacturer_id", INVALID_CHOICE);
    }
    Ok(errors)
}

/// A foreign key violation at this point can only come from a driver id
fn save_error(err: anyhow::Error) -> Result<FormErrors, ApiError> {
    if repo::is_foreign_key_violation(&err) {
        let mut errors = FormErrors::new();
        errors.add("drivers", INVALID_CHOICE);
        Ok(errors)
    } else {
        Err(ApiError::Database(err))
    }
}

fn find_car(pool: &DbPool, id: i32) -> Result<Car, ApiError> {
    repo::get_car(pool, id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)
}

/// Handler for the car list
///
/// This function handles GET requests to `/cars/`, filtered by `?model=`
/// and paged by `?page=`.
#[instrument(skip_all)]
pub async fn car_list_handler(
    State(pool): State<Arc<DbPool>>,
    State(templates): State<Arc<Environment<'static>>>,
    State(config): State<Arc<Config>>,
    current: CurrentDriver,
    Query(query): Query<CarSearch>,
) -> Result<Html<String>, ApiError> {
    let term = search_term(query.model.as_deref());
    let page_request = PageRequest::parse(query.page.as_deref(), config.paginate_by);

    let page = repo::search_cars(&pool, term, page_request).map_err(ApiError::Database)?;

    debug!("Showing {} of {} cars", page.items.len(), page.total);

    render(
        &templates,
        "taxi/car_list.html",
        context! {
            user => current.driver,
            car_list => &page.items,
            page => &page,
            search_value => term.unwrap_or_default(),
            query_prefix => query_prefix("model", term),
        },
    )
}

/// Handler for a car's page: its manufacturer, its drivers, and a button to
/// join or leave them
#[instrument(skip_all, fields(id = id))]
pub async fn car_detail_handler(
    State(pool): State<Arc<DbPool>>,
    State(templates): State<Arc<Environment<'static>>>,
    current: CurrentDriver,
    Path(id): Path<i32>,
) -> Result<Html<String>, ApiError> {
    let details = repo::get_car_details(&pool, id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    let is_assigned = details
        .drivers
        .iter()
        .any(|driver| driver.get_id() == current.driver.get_id());

    render(
        &templates,
        "taxi/car_detail.html",
        context! {
            user => current.driver,
            car => details.car,
            manufacturer => details.manufacturer,
            drivers => details.drivers,
            is_assigned,
        },
    )
}

/// Handler for the empty car form
#[instrument(skip_all)]
pub async fn car_create_page_handler(
    State(pool): State<Arc<DbPool>>,
    State(templates): State<Arc<Environment<'static>>>,
    current: CurrentDriver,
) -> Result<Html<String>, ApiError> {
    render_form(&pool, &templates, &current.driver, &CarForm::default(), &FormErrors::new(), None)
}

/// Handler for creating a car
#[instrument(skip_all)]
pub async fn car_create_handler(
    State(pool): State<Arc<DbPool>>,
    State(templates): State<Arc<Environment<'static>>>,
    current: CurrentDriver,
    Form(form): Form<CarForm>,
) -> Result<Response, ApiError> {
    let input = match form.clean() {
        Ok(input) => input,
        Err(errors) => {
            return Ok(render_form(&pool, &templates, &current.driver, &form, &errors, None)?.into_response());
        }
    };

    let errors = check_choices(&pool, &input)?;
    if !errors.is_empty() {
        return Ok(render_form(&pool, &templates, &current.driver, &form, &errors, None)?.into_response());
    }

    match repo::create_car(&pool, &input.model, input.manufacturer_id, &input.drivers) {
        Ok(car) => {
            info!("Created car {}", car.get_id());
            Ok(Redirect::to(RouteName::CarList.pattern()).into_response())
        }
        Err(err) => {
            let errors = save_error(err)?;
            Ok(render_form(&pool, &templates, &current.driver, &form, &errors, None)?.into_response())
        }
    }
}

/// Handler for the pre-filled car form
#[instrument(skip_all, fields(id = id))]
pub async fn car_update_page_handler(
    State(pool): State<Arc<DbPool>>,
    State(templates): State<Arc<Environment<'static>>>,
    current: CurrentDriver,
    Path(id): Path<i32>,
) -> Result<Html<String>, ApiError> {
    let car = find_car(&pool, id)?;
    let driver_ids = repo::list_car_driver_ids(&pool, id).map_err(ApiError::Database)?;
    let form = CarForm::from_car(car.get_model(), car.get_manufacturer_id(), driver_ids);

    render_form(&pool, &templates, &current.driver, &form, &FormErrors::new(), Some(id))
}

/// Handler for updating a car and its drivers
#[instrument(skip_all, fields(id = id))]
pub async fn car_update_handler(
    State(pool): State<Arc<DbPool>>,
    State(templates): State<Arc<Environment<'static>>>,
    current: CurrentDriver,
    Path(id): Path<i32>,
    Form(form): Form<CarForm>,
) -> Result<Response, ApiError> {
    find_car(&pool, id)?;

    let input = match form.clean() {
        Ok(input) => input,
        Err(errors) => {
            return Ok(render_form(&pool, &templates, &current.driver, &form, &errors, Some(id))?.into_response());
        }
    };

    let errors = check_choices(&pool, &input)?;
    if !errors.is_empty() {
        return Ok(render_form(&pool, &templates, &current.driver, &form, &errors, Some(id))?.into_response());
    }

    match repo::update_car(&pool, id, &input.model, input.manufacturer_id, &input.drivers) {
        Ok(Some(_)) => Ok(Redirect::to(RouteName::CarList.pattern()).into_response()),
        Ok(None) => Err(ApiError::NotFound),
        Err(err) => {
            let errors = save_error(err)?;
            Ok(render_form(&pool, &templates, &current.driver, &form, &errors, Some(id))?.into_response())
        }
    }
}

/// Handler for the delete confirmation page
#[instrument(skip_all, fields(id = id))]
pub async fn car_delete_page_handler(
    State(pool): State<Arc<DbPool>>,
    State(templates): State<Arc<Environment<'static>>>,
    current: CurrentDriver,
    Path(id): Path<i32>,
) -> Result<Html<String>, ApiError> {
    let car = find_car(&pool, id)?;
    render(&templates, "taxi/car_confirm_delete.html", context! { user => current.driver, car })
}

/// Handler for deleting a car
#[instrument(skip_all, fields(id = id))]
pub async fn car_delete_handler(
    State(pool): State<Arc<DbPool>>,
    _current: CurrentDriver,
    Path(id): Path<i32>,
) -> Result<Redirect, ApiError> {
    if !repo::delete_car(&pool, id).map_err(ApiError::Database)? {
        return Err(ApiError::NotFound);
    }
    info!("Deleted car {}", id);
    Ok(Redirect::to(RouteName::CarList.pattern()))
}

/// Handler for joining or leaving a car's drivers as the logged-in driver
#[instrument(skip_all, fields(id = id))]
pub async fn toggle_car_assign_handler(
    State(pool): State<Arc<DbPool>>,
    current: CurrentDriver,
    Path(id): Path<i32>,
) -> Result<Redirect, ApiError> {
    find_car(&pool, id)?;

    let assigned = repo::toggle_car_assignment(&pool, id, current.driver.get_id())
        .map_err(ApiError::Database)?;
    debug!("Driver {} assigned to car {}: {}", current.driver.get_id(), id, assigned);

    Ok(Redirect::to(&path_for(RouteName::CarDetail, id)))
}
