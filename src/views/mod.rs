//! Server-side rendering of the blog pages.
//!
//! Templates are loaded once at startup. Every page extends `base.html`.

use std::path::Path;

use axum::response::Html;
use tera::Tera;

use crate::errors::AppError;
use crate::models::PageContext;

/// A renderable page and the template it comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Index,
    View,
    Add,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Index, Page::View, Page::Add];

    pub fn template_name(self) -> &'static str {
        match self {
            Page::Index => "index.html",
            Page::View => "view.html",
            Page::Add => "add.html",
        }
    }
}

/// Compiled page templates.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Load every `*.html` template under `dir`.
    pub fn load(dir: &Path) -> Result<Self, AppError> {
        let glob = format!("{}/**/*.html", dir.display());
        let tera = Tera::new(&glob).map_err(|e| {
            AppError::Config(format!("Failed to load templates from {}: {}", dir.display(), e))
        })?;

        let loaded: Vec<&str> = tera.get_template_names().collect();
        let required = std::iter::once("base.html").chain(Page::ALL.map(Page::template_name));
        for name in required {
            if !loaded.contains(&name) {
                return Err(AppError::Config(format!(
                    "Template {} not found in {}",
                    name,
                    dir.display()
                )));
            }
        }

        tracing::debug!("Loaded {} templates from {:?}", loaded.len(), dir);
        Ok(Self { tera })
    }

    /// Render `page` with the given view-model.
    pub fn render(&self, page: Page, context: &PageContext) -> Result<Html<String>, AppError> {
        let ctx = tera::Context::from_serialize(context)?;
        let body = self.tera.render(page.template_name(), &ctx)?;
        Ok(Html(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Post;
    use chrono::{TimeZone, Utc};

    fn templates() -> Templates {
        Templates::load(&Path::new(env!("CARGO_MANIFEST_DIR")).join("templates")).unwrap()
    }

    #[test]
    fn missing_template_dir_is_a_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Templates::load(dir.path()).err().unwrap();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn index_lists_posts_and_links_static_files() {
        let created = Utc.with_ymd_and_hms(2024, 3, 9, 8, 30, 0).unwrap();
        let post = Post {
            id: "abc".into(),
            author: "Ada".into(),
            title: "First".into(),
            content: "Hello".into(),
            is_verified: false,
            last_updated: created,
            created_datetime: created,
        };

        let Html(body) = templates()
            .render(Page::Index, &PageContext::new(vec![post]))
            .unwrap();

        assert!(body.contains("/static/css/style.css"));
        assert!(body.contains("href=\"/view/abc\""));
        assert!(body.contains("First"));
        assert!(body.contains("Ada"));
    }

    #[test]
    fn post_fields_are_escaped() {
        let post = Post {
            id: "x".into(),
            title: "<b>bold</b>".into(),
            content: "<script>alert(1)</script>".into(),
            ..Default::default()
        };

        let Html(body) = templates()
            .render(Page::View, &PageContext::new(vec![post]))
            .unwrap();

        assert!(!body.contains("<script>alert(1)</script>"));
        assert!(body.contains("&lt;script&gt;"));
    }

    #[test]
    fn add_page_has_the_form_fields() {
        let Html(body) = templates()
            .render(Page::Add, &PageContext::new(vec![Post::default()]))
            .unwrap();

        for field in ["author", "title", "content"] {
            assert!(body.contains(&format!("name=\"{}\"", field)));
        }
        assert!(body.contains("action=\"/add/\""));
    }
}
