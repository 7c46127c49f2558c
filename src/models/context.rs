//! View-model handed to the template renderer.

use serde::Serialize;

use super::Post;

/// URL prefix the static files are served under.
pub const STATIC_URL: &str = "/static/";

/// Data bundle a page template is rendered with.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub posts: Vec<Post>,
    #[serde(rename = "static")]
    pub static_url: &'static str,
}

impl PageContext {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            posts,
            static_url: STATIC_URL,
        }
    }
}
