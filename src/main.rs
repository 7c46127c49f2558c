//! Blog Backend
//!
//! A server-rendered blog: list posts, read one, write a new one.
//! SQLite persistence, Tera templates.

mod api;
mod config;
mod db;
mod errors;
mod models;
mod views;

use std::sync::Arc;

use axum::{
    routing::{any, get},
    Router,
};
use chrono::{SubsecRound, Utc};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat};
use db::{PostFilter, Repository};
use models::NewPost;
use views::Templates;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub templates: Arc<Templates>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }

    tracing::info!("Starting blog backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Template dir: {:?}", config.template_dir);
    tracing::info!("Static dir: {:?}", config.static_dir);
    tracing::info!("Bind address: {}", config.bind_addr);

    // An unreachable database is fatal
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    let templates = Arc::new(Templates::load(&config.template_dir)?);

    if config.seed_sample_post {
        seed_sample_post(&repo).await;
    }

    let state = AppState { repo, templates };

    let app = create_router(state, &config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState, config: &Config) -> Router {
    let static_files = ServeDir::new(&config.static_dir).append_index_html_on_directories(false);

    Router::new()
        .route("/", get(api::home))
        .route("/view/", any(api::view_without_id))
        .route("/view/{*id}", any(api::view_post))
        .route("/add/", get(api::add_form).post(api::create_post))
        .nest_service("/static", static_files)
        .fallback(api::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

const SAMPLE_AUTHOR: &str = "tanmayb";

/// Insert the sample post unless its author already has one.
async fn seed_sample_post(repo: &Repository) {
    match repo.find_query(&PostFilter::by_author(SAMPLE_AUTHOR), &[]).await {
        Ok(existing) if !existing.is_empty() => {
            tracing::info!("Sample post already present, skipping seed");
            return;
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!("Could not check for the sample post: {}", e);
            return;
        }
    }

    let post = NewPost::unverified(
        SAMPLE_AUTHOR.to_string(),
        "So a new post with ID".to_string(),
        "This post contains an ID which we can query on. Once it is stored, \
         its ID is printed to the log so it can be opened under /view/."
            .to_string(),
        Utc::now().trunc_subsecs(6),
    );

    match repo.insert_post(&post).await {
        Ok(id) => tracing::info!("Sample post saved with ID {}", id),
        Err(e) => tracing::warn!("Couldn't save the sample post: {}", e),
    }
}
