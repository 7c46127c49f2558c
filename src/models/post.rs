//! Blog post model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of characters of content shown on the post list.
pub const SUMMARY_MAX_CHARS: usize = 100;

/// Appended to content that was cut for the post list.
pub const SUMMARY_MARKER: &str = "...";

/// A single blog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Post {
    /// Assigned by storage on insert, never changed afterwards
    pub id: String,
    pub author: String,
    pub title: String,
    pub content: String,
    pub is_verified: bool,
    pub last_updated: DateTime<Utc>,
    pub created_datetime: DateTime<Utc>,
}

impl Post {
    /// Copy of this post with its content cut down for the post list.
    pub fn summary(&self) -> Post {
        Post {
            content: truncate_content(&self.content, SUMMARY_MAX_CHARS),
            ..self.clone()
        }
    }
}

/// A post that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author: String,
    pub title: String,
    pub content: String,
    pub is_verified: bool,
    pub last_updated: DateTime<Utc>,
    pub created_datetime: DateTime<Utc>,
}

impl NewPost {
    /// An unverified post created and last updated at `now`.
    pub fn unverified(author: String, title: String, content: String, now: DateTime<Utc>) -> Self {
        Self {
            author,
            title,
            content,
            is_verified: false,
            last_updated: now,
            created_datetime: now,
        }
    }
}

/// Form body of `POST /add/`.
///
/// Missing fields read as empty strings. An `id` field, if sent, is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePostForm {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl CreatePostForm {
    /// Name of the first required field that is empty, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("author", &self.author),
            ("title", &self.title),
            ("content", &self.content),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
    }
}

/// Cut `content` to at most `max_chars` characters, appending
/// [`SUMMARY_MARKER`] when anything was removed.
pub fn truncate_content(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &content[..byte_idx], SUMMARY_MARKER),
        None => content.to_string(),
    }
}
