//! Postgres-backed repository implementations.

mod archive;
mod clicks;
mod experiences;
mod hackathons;
mod links;
mod profile;
mod projects;
mod timezone;
mod util;

pub use timezone::{ProfileZone, UnknownZone};
pub use util::map_sqlx_error;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use sqlx::{
    PgConnection, Postgres, Transaction,
    postgres::{PgPool, PgPoolOptions},
    query, query_scalar,
};
use uuid::Uuid;

use crate::{
    application::repos::{HealthRepo, RepoError},
    domain::types::EntityKind,
};

#[derive(Clone)]
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn begin(&self) -> Result<Transaction<'_, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    pub async fn connect(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(Into::into)
    }

    /// Rewrite the ranks of `kind` to match `ids` in one transaction.
    async fn reorder_collection(&self, kind: EntityKind, ids: &[Uuid]) -> Result<(), RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        rewrite_order(&mut tx, kind, ids).await?;
        tx.commit().await.map_err(map_sqlx_error)
    }

    /// Delete one row and shift the ranks behind it down by one so the
    /// collection stays numbered `1..=N`.
    async fn delete_from(&self, kind: EntityKind, id: Uuid) -> Result<(), RepoError> {
        let table = kind.table();
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let removed: Option<i32> =
            query_scalar(&format!("DELETE FROM {table} WHERE id = $1 RETURNING order_index"))
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        let Some(rank) = removed else {
            return Err(RepoError::NotFound);
        };

        query(&format!(
            "UPDATE {table} SET order_index = order_index - 1 WHERE order_index > $1"
        ))
        .bind(rank)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)
    }
}

#[async_trait]
impl HealthRepo for PostgresRepositories {
    async fn health_check(&self) -> Result<(), RepoError> {
        query("SELECT 1")
            .execute(self.pool())
            .await
            .map(|_| ())
            .map_err(map_sqlx_error)
    }
}

/// Set `order_index = position + 1` for every id. Fails with an integrity
/// error when `ids` is not exactly the set of rows in the table; callers
/// roll the transaction back by dropping it.
async fn rewrite_order(
    conn: &mut PgConnection,
    kind: EntityKind,
    ids: &[Uuid],
) -> Result<(), RepoError> {
    let table = kind.table();

    let total: i64 = query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;
    if usize::try_from(total).ok() != Some(ids.len()) {
        return Err(RepoError::integrity(format!(
            "{kind} reorder names {} of {total} records",
            ids.len()
        )));
    }

    let sql = format!(
        "UPDATE {table} AS t \
         SET order_index = o.position::int4, updated_at = now() \
         FROM UNNEST($1::uuid[]) WITH ORDINALITY AS o(id, position) \
         WHERE t.id = o.id"
    );
    let result = query(&sql)
        .bind(ids)
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

    if result.rows_affected() != ids.len() as u64 {
        return Err(RepoError::integrity(format!(
            "{kind} reorder matched {} of {} identifiers",
            result.rows_affected(),
            ids.len()
        )));
    }
    Ok(())
}
