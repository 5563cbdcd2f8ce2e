//! Page handlers
//!
//! One handler per endpoint. GET handlers render a template; POST handlers
//! validate the submitted form, call the repository and answer with a
//! `303 See Other` redirect, or re-render the form with its errors.

mod index_handlers;
mod auth_handlers;
mod manufacturer_handlers;
mod car_handlers;
mod driver_handlers;

// Re-export all handlers
pub use index_handlers::*;
pub use auth_handlers::*;
pub use manufacturer_handlers::*;
pub use car_handlers::*;
pub use driver_handlers::*;

use crate::errors::ApiError;

/// Runs `f` on tokio's blocking pool.
///
/// Repository calls that hash or verify a password go through here so the
/// argon2 work does not hold up an async worker thread.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))
}

/// The search part of page links, e.g. `model=Corolla&`, so paging keeps the
/// current filter
pub(crate) fn query_prefix(param: &str, term: Option<&str>) -> String {
    term.and_then(|term| serde_html_form::to_string([(param, term)]).ok())
        .map(|query| format!("{query}&"))
        .unwrap_or_default()
}
