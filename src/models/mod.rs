//! Data models for the blog backend.

mod context;
mod post;

pub use context::*;
pub use post::*;
