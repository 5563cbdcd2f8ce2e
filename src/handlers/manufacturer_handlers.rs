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
use crate::forms::{search_term, FormErrors, ManufacturerForm, ManufacturerSearch};
use crate::models::{Driver, Manufacturer};
use crate::repo::{self, PageRequest};
use crate::templates::render;
use crate::urls::RouteName;

fn render_form(
    templates: &Environment<'static>,
    user: &Driver,
    form: &ManufacturerForm,
    errors: &FormErrors,
    manufacturer: Option<&Manufacturer>,
) -> Result<Html<String>, ApiError> {
    render(
        templates,
        "taxi/manufacturer_form.html",
        context! { user, form, errors, manufacturer },
    )
}

/// Maps a failed insert or update to form errors when the name is taken
fn save_error(err: anyhow::Error) -> Result<FormErrors, ApiError> {
    match repo::unique_violation_field(&err) {
        Some(field) => Ok(FormErrors::unique("Manufacturer", &field)),
        None => Err(ApiError::Database(err)),
    }
}

fn find_manufacturer(pool: &DbPool, id: i32) -> Result<Manufacturer, ApiError> {
    repo::get_manufacturer(pool, id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)
}

/// Handler for the manufacturer list
///
/// This function handles GET requests to `/manufacturers/`, filtered by
/// `?name=` and paged by `?page=`.
#[instrument(skip_all)]
pub async fn manufacturer_list_handler(
    State(pool): State<Arc<DbPool>>,
    State(templates): State<Arc<Environment<'static>>>,
    State(config): State<Arc<Config>>,
    current: CurrentDriver,
    Query(query): Query<ManufacturerSearch>,
) -> Result<Html<String>, ApiError> {
    let term = search_term(query.name.as_deref());
    let page_request = PageRequest::parse(query.page.as_deref(), config.paginate_by);

    let page = repo::search_manufacturers(&pool, term, page_request)
        .map_err(ApiError::Database)?;

    debug!("Showing {} of {} manufacturers", page.items.len(), page.total);

    render(
        &templates,
        "taxi/manufacturer_list.html",
        context! {
            user => current.driver,
            manufacturer_list => &page.items,
            page => &page,
            search_value => term.unwrap_or_default(),
            query_prefix => query_prefix("name", term),
        },
    )
}

/// Handler for the empty manufacturer form
#[instrument(skip_all)]
pub async fn manufacturer_create_page_handler(
    State(templates): State<Arc<Environment<'static>>>,
    current: CurrentDriver,
) -> Result<Html<String>, ApiError> {
    render_form(&templates, &current.driver, &ManufacturerForm::default(), &FormErrors::new(), None)
}

/// Handler for creating a manufacturer
#[instrument(skip_all)]
pub async fn manufacturer_create_handler(
    State(pool): State<Arc<DbPool>>,
    State(templates): State<Arc<Environment<'static>>>,
    current: CurrentDriver,
    Form(form): Form<ManufacturerForm>,
) -> Result<Response, ApiError> {
    let input = match form.clean() {
        Ok(input) => input,
        Err(errors) => {
            return Ok(render_form(&templates, &current.driver, &form, &errors, None)?.into_response());
        }
    };

    match repo::create_manufacturer(&pool, &input.name, &input.country) {
        Ok(manufacturer) => {
            info!("Created manufacturer {}", manufacturer.get_id());
            Ok(Redirect::to(RouteName::ManufacturerList.pattern()).into_response())
        }
        Err(err) => {
            let errors = save_error(err)?;
            Ok(render_form(&templates, &current.driver, &form, &errors, None)?.into_response())
        }
    }
}

/// Handler for the pre-filled manufacturer form
#[instrument(skip_all, fields(id = id))]
pub async fn manufacturer_update_page_handler(
    State(pool): State<Arc<DbPool>>,
    State(templates): State<Arc<Environment<'static>>>,
    current: CurrentDriver,
    Path(id): Path<i32>,
) -> Result<Html<String>, ApiError> {
    let manufacturer = find_manufacturer(&pool, id)?;
    let form = ManufacturerForm {
        name: manufacturer.get_name(),
        country: manufacturer.get_country(),
    };
    render_form(&templates, &current.driver, &form, &FormErrors::new(), Some(&manufacturer))
}

/// Handler for updating a manufacturer
#[instrument(skip_all, fields(id = id))]
pub async fn manufacturer_update_handler(
    State(pool): State<Arc<DbPool>>,
    State(templates): State<Arc<Environment<'static>>>,
    current: CurrentDriver,
    Path(id): Path<i32>,
    Form(form): Form<ManufacturerForm>,
) -> Result<Response, ApiError> {
    let manufacturer = find_manufacturer(&pool, id)?;

    let input = match form.clean() {
        Ok(input) => input,
        Err(errors) => {
            return Ok(
                render_form(&templates, &current.driver, &form, &errors, Some(&manufacturer))?.into_response(),
            );
        }
    };

    match repo::update_manufacturer(&pool, id, &input.name, &input.country) {
        Ok(Some(_)) => Ok(Redirect::to(RouteName::ManufacturerList.pattern()).into_response()),
        Ok(None) => Err(ApiError::NotFound),
        Err(err) => {
            let errors = save_error(err)?;
            Ok(render_form(&templates, &current.driver, &form, &errors, Some(&manufacturer))?.into_response())
        }
    }
}

/// Handler for the delete confirmation page
#[instrument(skip_all, fields(id = id))]
pub async fn manufacturer_delete_page_handler(
    State(pool): State<Arc<DbPool>>,
    State(templates): State<Arc<Environment<'static>>>,
    current: CurrentDriver,
    Path(id): Path<i32>,
) -> Result<Html<String>, ApiError> {
    let manufacturer = find_manufacturer(&pool, id)?;
    render(
        &templates,
        "taxi/manufacturer_confirm_delete.html",
        context! { user => current.driver, manufacturer },
    )
}

/// Handler for deleting a manufacturer and, with it, its cars
#[instrument(skip_all, fields(id = id))]
pub async fn manufacturer_delete_handler(
    State(pool): State<Arc<DbPool>>,
    _current: CurrentDriver,
    Path(id): Path<i32>,
) -> Result<Redirect, ApiError> {
    if !repo::delete_manufacturer(&pool, id).map_err(ApiError::Database)? {
        return Err(ApiError::NotFound);
    }
    info!("Deleted manufacturer {}", id);
    Ok(Redirect::to(RouteName::ManufacturerList.pattern()))
}
