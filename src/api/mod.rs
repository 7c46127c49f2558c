//! HTML page handlers.
//!
//! Every handler maps one route to at most one storage operation and one render.

mod add;
mod home;
mod view;

pub use add::*;
pub use home::*;
pub use view::*;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::errors::AppError;

/// `302 Found` redirect to `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Any route not matched above.
pub async fn fallback(request: Request) -> AppError {
    AppError::NotFound(format!("Nothing here at {}", request.uri().path()))
}
