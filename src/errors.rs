use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Not found")]
    NotFound,
    #[error("Forbidden: {0}")]
    Forbidden(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Database(_) | ApiError::Template(_) | ApiError::Internal(_) => {
                error!("{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found"),
            ApiError::Forbidden(reason) => {
                warn!("Forbidden: {}", reason);
                (StatusCode::FORBIDDEN, "Forbidden")
            }
        };

        let body = Html(format!(
            "<!DOCTYPE html><html><head><title>{message}</title></head><body><h1>{message}</h1></body></html>"
        ));

        (status, body).into_response()
    }
}
