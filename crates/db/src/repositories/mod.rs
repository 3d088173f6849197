//! One trait per collection, implemented over PostgreSQL by [`PgStore`] and
//! in memory by [`crate::memory::MemoryStore`].

pub mod admin;
pub mod attendance;
pub mod diet;
pub mod employee;
pub mod enquiry;
pub mod follow_up;
pub mod gym;
pub mod member;
pub mod package;
pub mod subscription;
pub mod water;
pub mod workout;

use sqlx::{Postgres, QueryBuilder};

use crate::DbPool;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// `%keyword%` for a case-insensitive `LIKE` against lowercased columns.
pub(crate) fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Appends `AND (LOWER(col) LIKE $k OR ...)` over `columns`.
pub(crate) fn push_keyword(builder: &mut QueryBuilder<'_, Postgres>, keyword: &str, columns: &[&str]) {
    let pattern = like_pattern(keyword);
    builder.push(" AND (");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            builder.push(" OR ");
        }
        builder.push(format!("LOWER(COALESCE({}, '')) LIKE ", column));
        builder.push_bind(pattern.clone());
    }
    builder.push(")");
}

pub(crate) fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
