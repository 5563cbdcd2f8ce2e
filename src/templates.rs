//! HTML templates
//!
//! All templates are compiled into the binary and loaded into one
//! [`Environment`] at start-up. Templates build links with the `url`
//! function, e.g. `{{ url("car-detail", car.id) }}`.

use axum::response::Html;
use minijinja::{Environment, Error, ErrorKind, Value};
use serde::Serialize;
use tracing::debug;

use crate::errors::ApiError;
use crate::urls::{reverse, RouteName};

/// Template names paired with their sources
const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("includes/pagination.html", include_str!("../templates/includes/pagination.html")),
    ("includes/form_errors.html", include_str!("../templates/includes/form_errors.html")),
    ("taxi/index.html", include_str!("../templates/taxi/index.html")),
    ("taxi/manufacturer_list.html", include_str!("../templates/taxi/manufacturer_list.html")),
    ("taxi/manufacturer_form.html", include_str!("../templates/taxi/manufacturer_form.html")),
    (
        "taxi/manufacturer_confirm_delete.html",
        include_str!("../templates/taxi/manufacturer_confirm_delete.html"),
    ),
    ("taxi/car_list.html", include_str!("../templates/taxi/car_list.html")),
    ("taxi/car_detail.html", include_str!("../templates/taxi/car_detail.html")),
    ("taxi/car_form.html", include_str!("../templates/taxi/car_form.html")),
    ("taxi/car_confirm_delete.html", include_str!("../templates/taxi/car_confirm_delete.html")),
    ("taxi/driver_list.html", include_str!("../templates/taxi/driver_list.html")),
    ("taxi/driver_detail.html", include_str!("../templates/taxi/driver_detail.html")),
    ("taxi/driver_form.html", include_str!("../templates/taxi/driver_form.html")),
    ("taxi/driver_update_form.html", include_str!("../templates/taxi/driver_update_form.html")),
    ("taxi/driver_confirm_delete.html", include_str!("../templates/taxi/driver_confirm_delete.html")),
    ("registration/login.html", include_str!("../templates/registration/login.html")),
    ("registration/logged_out.html", include_str!("../templates/registration/logged_out.html")),
];

/// `url(name, id=none)` for templates
fn url(name: String, id: Option<i32>) -> Result<Value, Error> {
    let route = name
        .parse::<RouteName>()
        .map_err(|e| Error::new(ErrorKind::InvalidOperation, e.to_string()))?;
    let path = reverse(route, id).map_err(|e| Error::new(ErrorKind::InvalidOperation, e.to_string()))?;
    // Paths are built from route patterns and integers only
    Ok(Value::from_safe_string(path))
}

/// Builds the template environment with every template loaded
pub fn build_environment() -> Result<Environment<'static>, Error> {
    let mut env = Environment::new();
    env.set_undefined_behavior(minijinja::UndefinedBehavior::Chainable);
    for &(name, source) in TEMPLATES {
        env.add_template(name, source)?;
    }
    env.add_function("url", url);
    debug!("Loaded {} templates", TEMPLATES.len());
    Ok(env)
}

/// Renders a template into an HTML response body
pub fn render<S: Serialize>(env: &Environment<'_>, name: &str, ctx: S) -> Result<Html<String>, ApiError> {
    let template = env.get_template(name)?;
    Ok(Html(template.render(ctx)?))
}
