//! Database repository for post operations.
//!
//! Uses bound parameters for every value; column names come from typed sort keys.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use super::query::{push_order_by, PostFilter, SortKey};
use crate::errors::AppError;
use crate::models::{NewPost, Post};

const POST_COLUMNS: &str =
    "SELECT id, author, title, content, is_verified, last_updated, created_datetime FROM posts";

/// Database repository for all post operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a new post and return the identifier generated for it.
    pub async fn insert_post(&self, post: &NewPost) -> Result<String, AppError> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO posts (id, author, title, content, is_verified, last_updated, created_datetime) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(&post.author)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.is_verified as i32)
        .bind(format_timestamp(&post.last_updated))
        .bind(format_timestamp(&post.created_datetime))
        .execute(&self.pool)
        .await?;

        tracing::debug!("Inserted post {}", id);

        Ok(id)
    }

    /// List all posts in the given order.
    pub async fn find_all(&self, sort: &[SortKey]) -> Result<Vec<Post>, AppError> {
        self.find_query(&PostFilter::default(), sort).await
    }

    /// List the posts matching `filter` in the given order.
    pub async fn find_query(
        &self,
        filter: &PostFilter,
        sort: &[SortKey],
    ) -> Result<Vec<Post>, AppError> {
        let mut qb = QueryBuilder::<Sqlite>::new(POST_COLUMNS);
        filter.push_where(&mut qb);
        push_order_by(&mut qb, sort);

        let rows = qb.build().fetch_all(&self.pool).await?;

        rows.iter().map(post_from_row).collect()
    }

    /// First post matching `filter`, `None` when nothing matches.
    pub async fn find_one(&self, filter: &PostFilter) -> Result<Option<Post>, AppError> {
        let mut qb = QueryBuilder::<Sqlite>::new(POST_COLUMNS);
        filter.push_where(&mut qb);
        push_order_by(&mut qb, &[]);
        qb.push(" LIMIT 1");

        let row = qb.build().fetch_optional(&self.pool).await?;

        row.as_ref().map(post_from_row).transpose()
    }

    /// Get a post by ID.
    pub async fn get_post(&self, id: &str) -> Result<Option<Post>, AppError> {
        self.find_one(&PostFilter::by_id(id)).await
    }
}

// Timestamps are stored with a fixed width so that text order is time order.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(id: &str, column: &str, raw: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            tracing::error!("Post {} has an unreadable {}: {:?} ({})", id, column, raw, e);
            AppError::Internal(format!("Post {} has an invalid {}", id, column))
        })
}

fn post_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Post, AppError> {
    let id: String = row.get("id");
    let is_verified: i32 = row.get("is_verified");
    let last_updated: String = row.get("last_updated");
    let created_datetime: String = row.get("created_datetime");

    Ok(Post {
        last_updated: parse_timestamp(&id, "last_updated", &last_updated)?,
        created_datetime: parse_timestamp(&id, "created_datetime", &created_datetime)?,
        id,
        author: row.get("author"),
        title: row.get("title"),
        content: row.get("content"),
        is_verified: is_verified != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, SubsecRound, TimeZone};

    #[test]
    fn timestamps_round_trip_at_microsecond_precision() {
        let ts = Utc::now().trunc_subsecs(6);
        let stored = format_timestamp(&ts);
        assert!(stored.ends_with('Z'));
        assert_eq!(parse_timestamp("p", "created_datetime", &stored).unwrap(), ts);
    }

    #[test]
    fn stored_timestamps_sort_chronologically() {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let later = base + Duration::microseconds(10);
        let much_later = base + Duration::seconds(1);

        let mut stored = vec![
            format_timestamp(&much_later),
            format_timestamp(&base),
            format_timestamp(&later),
        ];
        stored.sort();

        assert_eq!(
            stored,
            vec![
                format_timestamp(&base),
                format_timestamp(&later),
                format_timestamp(&much_later),
            ]
        );
    }

    #[test]
    fn unreadable_timestamp_is_an_error() {
        let err = parse_timestamp("p", "last_updated", "yesterday").unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
