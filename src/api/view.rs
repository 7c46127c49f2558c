//! Single post page.

use axum::{
    extract::{Path, State},
    http::Method,
    response::{IntoResponse, Response},
};

use super::found;
use crate::errors::AppError;
use crate::models::PageContext;
use crate::views::Page;
use crate::AppState;

/// ANY /view/{*id} - Show one post. Anything but a GET goes back to the list.
pub async fn view_post(
    State(state): State<AppState>,
    method: Method,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    if method != Method::GET || id.is_empty() {
        return Ok(found("/"));
    }

    let post = state
        .repo
        .get_post(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))?;

    let page = state
        .templates
        .render(Page::View, &PageContext::new(vec![post]))?;
    Ok(page.into_response())
}

/// ANY /view/ - No identifier given.
pub async fn view_without_id() -> Response {
    found("/")
}
