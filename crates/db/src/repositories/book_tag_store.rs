//! [`TagStore`] over a PostgreSQL connection, used by `BookRepo` to
//! synchronize genres and authors inside its write transaction.

use std::collections::BTreeSet;

use async_trait::async_trait;
use bookshelf_core::sync::TagStore;
use bookshelf_core::tags::TagKind;
use bookshelf_core::types::DbId;
use sqlx::PgConnection;

use crate::repositories::TagRepo;

pub struct PgTagStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgTagStore<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<'c> TagStore for PgTagStore<'c> {
    type Error = sqlx::Error;

    async fn resolve(&mut self, kind: TagKind, canonical: &str) -> Result<DbId, sqlx::Error> {
        TagRepo::resolve(&mut *self.conn, kind, canonical).await
    }

    async fn linked(&mut self, kind: TagKind, book_id: DbId) -> Result<BTreeSet<DbId>, sqlx::Error> {
        let query = format!(
            "SELECT {column} FROM {table} WHERE book_id = $1",
            column = kind.link_column(),
            table = kind.link_table(),
        );
        let ids = sqlx::query_scalar::<_, DbId>(&query)
            .bind(book_id)
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(ids.into_iter().collect())
    }

    async fn link(
        &mut self,
        kind: TagKind,
        book_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let query = format!(
            "INSERT INTO {table} (book_id, {column}) \
             SELECT $1, UNNEST($2::bigint[]) \
             ON CONFLICT DO NOTHING",
            column = kind.link_column(),
            table = kind.link_table(),
        );
        sqlx::query(&query)
            .bind(book_id)
            .bind(tag_ids)
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }

    async fn unlink(
        &mut self,
        kind: TagKind,
        book_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let query = format!(
            "DELETE FROM {table} WHERE book_id = $1 AND {column} = ANY($2)",
            column = kind.link_column(),
            table = kind.link_table(),
        );
        sqlx::query(&query)
            .bind(book_id)
            .bind(tag_ids)
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }
}
