//! Post submission form.

use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, Response},
    Form,
};
use chrono::{SubsecRound, Utc};

use super::found;
use crate::errors::AppError;
use crate::models::{CreatePostForm, NewPost, PageContext, Post};
use crate::views::Page;
use crate::AppState;

/// GET /add/ - Empty submission form.
pub async fn add_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    state
        .templates
        .render(Page::Add, &PageContext::new(vec![Post::default()]))
}

/// POST /add/ - Store the submitted post and redirect to it.
pub async fn create_post(
    State(state): State<AppState>,
    form: Result<Form<CreatePostForm>, FormRejection>,
) -> Result<Response, AppError> {
    // A body that is not form-encoded has none of the fields
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!("Unreadable submission body: {}", rejection);
            CreatePostForm::default()
        }
    };

    if let Some(field) = form.missing_field() {
        tracing::info!("Rejected post submission without {}", field);
        return Err(AppError::Validation(format!("The {} field is required", field)));
    }

    // Storage keeps microseconds
    let now = Utc::now().trunc_subsecs(6);
    let post = NewPost::unverified(form.author, form.title, form.content, now);

    let id = state.repo.insert_post(&post).await?;
    tracing::info!("Post saved with ID {}", id);

    Ok(found(&format!("/view/{}", id)))
}
