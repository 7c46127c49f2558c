//! Filters and sort keys for post queries.
//!
//! Column names only ever come from [`PostField`], values are always bound.

use std::fmt;
use std::str::FromStr;

use sqlx::{QueryBuilder, Sqlite};

/// A sortable/filterable post column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostField {
    Id,
    Author,
    Title,
    Content,
    IsVerified,
    LastUpdated,
    CreatedDatetime,
}

impl PostField {
    pub fn column(self) -> &'static str {
        match self {
            PostField::Id => "id",
            PostField::Author => "author",
            PostField::Title => "title",
            PostField::Content => "content",
            PostField::IsVerified => "is_verified",
            PostField::LastUpdated => "last_updated",
            PostField::CreatedDatetime => "created_datetime",
        }
    }

    fn from_column(s: &str) -> Option<Self> {
        match s {
            "id" | "_id" => Some(PostField::Id),
            "author" => Some(PostField::Author),
            "title" => Some(PostField::Title),
            "content" => Some(PostField::Content),
            "is_verified" => Some(PostField::IsVerified),
            "last_updated" => Some(PostField::LastUpdated),
            "created_datetime" => Some(PostField::CreatedDatetime),
            _ => None,
        }
    }
}

/// One ordering term, written `field` or `-field` for descending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: PostField,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(field: PostField) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    pub fn desc(field: PostField) -> Self {
        Self {
            field,
            descending: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortField(pub String);

impl fmt::Display for UnknownSortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sort field: {}", self.0)
    }
}

impl std::error::Error for UnknownSortField {}

impl FromStr for SortKey {
    type Err = UnknownSortField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (descending, name) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let field = PostField::from_column(name).ok_or_else(|| UnknownSortField(s.to_string()))?;
        Ok(Self { field, descending })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.field.column())
        } else {
            f.write_str(self.field.column())
        }
    }
}

/// Equality constraints combined with AND. The default filter matches every post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub id: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub is_verified: Option<bool>,
}

impl PostFilter {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn by_author(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            ..Default::default()
        }
    }

    pub(crate) fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        let mut separator = " WHERE ";

        if let Some(id) = &self.id {
            qb.push(separator).push("id = ").push_bind(id.clone());
            separator = " AND ";
        }
        if let Some(author) = &self.author {
            qb.push(separator).push("author = ").push_bind(author.clone());
            separator = " AND ";
        }
        if let Some(title) = &self.title {
            qb.push(separator).push("title = ").push_bind(title.clone());
            separator = " AND ";
        }
        if let Some(is_verified) = self.is_verified {
            qb.push(separator)
                .push("is_verified = ")
                .push_bind(i32::from(is_verified));
        }
    }
}

/// Append an ORDER BY clause. Ties fall back to insertion order, running in
/// the direction of the first key.
pub(crate) fn push_order_by(qb: &mut QueryBuilder<'_, Sqlite>, sort: &[SortKey]) {
    qb.push(" ORDER BY ");
    for key in sort {
        qb.push(key.field.column());
        qb.push(if key.descending { " DESC, " } else { " ASC, " });
    }

    let tie_break = match sort.first() {
        Some(key) if key.descending => "rowid DESC",
        _ => "rowid ASC",
    };
    qb.push(tie_break);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_descending_key() {
        let key: SortKey = "-created_datetime".parse().unwrap();
        assert_eq!(key, SortKey::desc(PostField::CreatedDatetime));
        assert_eq!(key.to_string(), "-created_datetime");
    }

    #[test]
    fn parses_ascending_keys() {
        assert_eq!("title".parse::<SortKey>(), Ok(SortKey::asc(PostField::Title)));
        assert_eq!("+author".parse::<SortKey>(), Ok(SortKey::asc(PostField::Author)));
        assert_eq!("_id".parse::<SortKey>(), Ok(SortKey::asc(PostField::Id)));
    }

    #[test]
    fn rejects_unknown_field() {
        let err = "-title; DROP TABLE posts".parse::<SortKey>().unwrap_err();
        assert_eq!(err, UnknownSortField("-title; DROP TABLE posts".into()));
    }

    #[test]
    fn builds_where_and_order_clauses() {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT id FROM posts");
        let filter = PostFilter {
            author: Some("a".into()),
            is_verified: Some(false),
            ..Default::default()
        };
        filter.push_where(&mut qb);
        push_order_by(
            &mut qb,
            &[
                SortKey::desc(PostField::CreatedDatetime),
                SortKey::asc(PostField::Title),
            ],
        );

        assert_eq!(
            qb.sql(),
            "SELECT id FROM posts WHERE author = ? AND is_verified = ? \
             ORDER BY created_datetime DESC, title ASC, rowid DESC"
        );
    }

    #[test]
    fn empty_filter_has_no_where_clause() {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT id FROM posts");
        PostFilter::default().push_where(&mut qb);
        push_order_by(&mut qb, &[]);
        assert_eq!(qb.sql(), "SELECT id FROM posts ORDER BY rowid ASC");
    }
}
