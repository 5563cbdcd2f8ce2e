use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    cookie::{Cookie, CookieJar, SameSite},
    Form, Query,
};
use minijinja::{context, Environment};
use std::sync::Arc;
use tracing::{instrument, debug, info, warn};

use super::run_blocking;
use crate::auth::csrf;
use crate::config::Config;
use crate::db::DbPool;
use crate::errors::ApiError;
use crate::forms::{safe_next, FormErrors, LoginForm, NextQuery, INVALID_LOGIN, NON_FIELD};
use crate::repo;
use crate::templates::render;
use crate::urls::RouteName;

fn render_login(
    templates: &Environment<'static>,
    form: &LoginForm,
    errors: &FormErrors,
    csrf_token: &str,
) -> Result<Html<String>, ApiError> {
    render(
        templates,
        "registration/login.html",
        context! {
            form,
            errors,
            csrf_token,
            next => form.next.as_deref().unwrap_or_default(),
        },
    )
}

/// Handler for the login page
///
/// Hands out the CSRF token the login form has to post back.
#[instrument(skip_all)]
pub async fn login_page_handler(
    State(templates): State<Arc<Environment<'static>>>,
    jar: CookieJar,
    Query(query): Query<NextQuery>,
) -> Result<(CookieJar, Html<String>), ApiError> {
    let form = LoginForm {
        next: query.next,
        ..Default::default()
    };
    let token = csrf::current_or_new_token(&jar);
    let page = render_login(&templates, &form, &FormErrors::new(), &token)?;

    Ok((jar.add(csrf::csrf_cookie(token)), page))
}

/// Handler for submitting the login form
///
/// On success a session is started, its token set as an HTTP-only cookie,
/// and the browser sent on to `next` (or the home page).
#[instrument(skip_all)]
pub async fn login_handler(
    State(pool): State<Arc<DbPool>>,
    State(templates): State<Arc<Environment<'static>>>,
    State(config): State<Arc<Config>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    if !csrf::verify_token(&jar, &form.csrf_token) {
        return Err(ApiError::Forbidden("login CSRF token missing or incorrect"));
    }

    if let Err(errors) = form.clean() {
        return Ok(render_login(&templates, &form, &errors, &form.csrf_token)?.into_response());
    }

    let auth_pool = Arc::clone(&pool);
    let username = form.username.trim().to_string();
    let password = form.password.clone();
    let Some(driver) = run_blocking(move || repo::authenticate(&auth_pool, &username, &password))
        .await?
        .map_err(ApiError::Database)?
    else {
        warn!("Failed login attempt");
        let mut errors = FormErrors::new();
        errors.add(NON_FIELD, INVALID_LOGIN);
        return Ok(render_login(&templates, &form, &errors, &form.csrf_token)?.into_response());
    };

    let session = repo::create_session(&pool, driver.get_id(), config.session_ttl())
        .map_err(ApiError::Database)?;

    let cookie = Cookie::build((config.cookie_name.clone(), session.get_token()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/");

    let target = safe_next(form.next.as_deref()).unwrap_or(RouteName::Index.pattern());
    info!("Driver {} logged in", driver.get_id());

    Ok((jar.add(cookie), Redirect::to(target)).into_response())
}

/// Handler for logging out
///
/// Ends the session named by the cookie, if any, and clears the cookie.
#[instrument(skip_all)]
pub async fn logout_handler(
    State(pool): State<Arc<DbPool>>,
    State(templates): State<Arc<Environment<'static>>>,
    State(config): State<Arc<Config>>,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    if let Some(cookie) = jar.get(&config.cookie_name) {
        let ended = repo::delete_session(&pool, cookie.value()).map_err(ApiError::Database)?;
        debug!("Session ended: {}", ended);
    }

    let jar = jar.remove(Cookie::build((config.cookie_name.clone(), "")).path("/"));
    let page = render(&templates, "registration/logged_out.html", context! {})?;

    Ok((jar, page).into_response())
}
