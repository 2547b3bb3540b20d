//! Repository for the `genres` and `authors` tables.
//!
//! Both tables share one shape, so every method takes the [`TagKind`] and
//! interpolates the table name from it. Table names come from a closed enum,
//! never from request input.

use std::collections::HashMap;

use bookshelf_core::tag_name::normalize_tag_name;
use bookshelf_core::tags::TagKind;
use bookshelf_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::tag::{BookTag, Tag};

/// Column list for tag queries.
const COLUMNS: &str = "id, name";

/// Provides get-or-create, listing, rename and delete for genres and authors.
pub struct TagRepo;

impl TagRepo {
    /// Return the id of the tag matching `canonical` case-insensitively,
    /// creating it if it does not exist yet.
    ///
    /// The unique `lower(name)` index decides races: when a concurrent
    /// request inserts the same name first, the insert returns no row and
    /// the lookup is repeated.
    pub async fn resolve(
        conn: &mut PgConnection,
        kind: TagKind,
        canonical: &str,
    ) -> Result<DbId, sqlx::Error> {
        if let Some(id) = Self::find_id_by_name(&mut *conn, kind, canonical).await? {
            return Ok(id);
        }

        let table = kind.table();
        let insert = format!(
            "INSERT INTO {table} (name) VALUES ($1) \
             ON CONFLICT DO NOTHING \
             RETURNING id"
        );
        let inserted = sqlx::query_scalar::<_, DbId>(&insert)
            .bind(canonical)
            .fetch_optional(&mut *conn)
            .await?;

        match inserted {
            Some(id) => {
                tracing::debug!(%kind, tag_id = id, name = canonical, "Created tag");
                Ok(id)
            }
            None => Self::find_id_by_name(&mut *conn, kind, canonical)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    async fn find_id_by_name(
        conn: &mut PgConnection,
        kind: TagKind,
        name: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let table = kind.table();
        let query = format!("SELECT id FROM {table} WHERE lower(name) = lower($1)");
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(name)
            .fetch_optional(conn)
            .await
    }

    /// Find a tag by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        kind: TagKind,
        id: DbId,
    ) -> Result<Option<Tag>, sqlx::Error> {
        let table = kind.table();
        let query = format!("SELECT {COLUMNS} FROM {table} WHERE id = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every tag of `kind`, ordered by name descending.
    pub async fn list(pool: &PgPool, kind: TagKind) -> Result<Vec<Tag>, sqlx::Error> {
        let table = kind.table();
        let query = format!("SELECT {COLUMNS} FROM {table} ORDER BY name DESC, id DESC");
        sqlx::query_as::<_, Tag>(&query).fetch_all(pool).await
    }

    /// Rename a tag. The new name is normalized before it is stored.
    ///
    /// Returns `None` if no tag with the given ID exists. A name that
    /// collides with another tag fails with a unique violation on
    /// `uq_<table>_name_lower`.
    pub async fn rename(
        pool: &PgPool,
        kind: TagKind,
        id: DbId,
        name: &str,
    ) -> Result<Option<Tag>, sqlx::Error> {
        let table = kind.table();
        let query = format!("UPDATE {table} SET name = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .bind(normalize_tag_name(name))
            .fetch_optional(pool)
            .await
    }

    /// Delete a tag by ID. Cascade deletes its book associations.
    ///
    /// Returns `true` if a tag was deleted.
    pub async fn delete(pool: &PgPool, kind: TagKind, id: DbId) -> Result<bool, sqlx::Error> {
        let table = kind.table();
        let query = format!("DELETE FROM {table} WHERE id = $1");
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Batch-load the tags of `kind` linked to each of `book_ids`, ordered by
    /// name within each book. Books without tags are absent from the map.
    pub async fn tags_for_books(
        pool: &PgPool,
        kind: TagKind,
        book_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<Tag>>, sqlx::Error> {
        if book_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let table = kind.table();
        let link_table = kind.link_table();
        let link_column = kind.link_column();
        let query = format!(
            "SELECT l.book_id, t.id, t.name \
             FROM {link_table} l \
             JOIN {table} t ON t.id = l.{link_column} \
             WHERE l.book_id = ANY($1) \
             ORDER BY l.book_id, t.name, t.id"
        );
        let rows = sqlx::query_as::<_, BookTag>(&query)
            .bind(book_ids)
            .fetch_all(pool)
            .await?;

        let mut by_book: HashMap<DbId, Vec<Tag>> = HashMap::new();
        for row in rows {
            by_book.entry(row.book_id).or_default().push(row.into());
        }
        Ok(by_book)
    }
}
