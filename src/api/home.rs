//! Post list page.

use axum::{extract::State, response::Html};

use crate::db::{PostField, SortKey};
use crate::errors::AppError;
use crate::models::{PageContext, Post};
use crate::views::Page;
use crate::AppState;

/// GET / - List all posts, newest first, with shortened content.
pub async fn home(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let posts = state
        .repo
        .find_all(&[SortKey::desc(PostField::CreatedDatetime)])
        .await?;

    let summaries: Vec<Post> = posts.iter().map(Post::summary).collect();

    state.templates.render(Page::Index, &PageContext::new(summaries))
}
