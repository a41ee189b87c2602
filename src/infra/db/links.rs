use async_trait::async_trait;
use sqlx::{PgConnection, query_as};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{CollectionRepo, RepoError},
    domain::{
        collection::{CollectionEntity, EntityPatch},
        links::{LinkDraft, LinkPatch, LinkRecord},
    },
};

use super::{PostgresRepositories, map_sqlx_error};

const COLUMNS: &str = "id, title, url, icon, active, order_index, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: Uuid,
    title: String,
    url: String,
    icon: Option<String>,
    active: bool,
    order_index: i32,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<LinkRow> for LinkRecord {
    fn from(row: LinkRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            url: row.url,
            icon: row.icon,
            active: row.active,
            order_index: row.order_index,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(super) async fn insert_link(
    conn: &mut PgConnection,
    draft: LinkDraft,
    order_index: i32,
) -> Result<LinkRecord, RepoError> {
    let now = OffsetDateTime::now_utc();
    let record = LinkRecord::materialize(Uuid::new_v4(), draft, order_index, now);

    let sql = format!(
        "INSERT INTO links ({COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $7) \
         RETURNING {COLUMNS}"
    );
    let row = query_as::<_, LinkRow>(&sql)
        .bind(record.id)
        .bind(&record.title)
        .bind(&record.url)
        .bind(&record.icon)
        .bind(record.active)
        .bind(record.order_index)
        .bind(now)
        .fetch_one(conn)
        .await
        .map_err(map_sqlx_error)?;

    Ok(LinkRecord::from(row))
}

#[async_trait]
impl CollectionRepo<LinkRecord> for PostgresRepositories {
    async fn list(&self) -> Result<Vec<LinkRecord>, RepoError> {
        let sql = format!("SELECT {COLUMNS} FROM links ORDER BY order_index, created_at");
        let rows = query_as::<_, LinkRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(LinkRecord::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<LinkRecord>, RepoError> {
        let sql = format!("SELECT {COLUMNS} FROM links WHERE id = $1");
        let row = query_as::<_, LinkRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(LinkRecord::from))
    }

    async fn create(&self, draft: LinkDraft, order_index: i32) -> Result<LinkRecord, RepoError> {
        let mut conn = self.pool().acquire().await.map_err(map_sqlx_error)?;
        insert_link(&mut conn, draft, order_index).await
    }

    async fn update(&self, id: Uuid, patch: &LinkPatch) -> Result<LinkRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let select = format!("SELECT {COLUMNS} FROM links WHERE id = $1 FOR UPDATE");
        let mut record = query_as::<_, LinkRow>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .map(LinkRecord::from)
            .ok_or(RepoError::NotFound)?;
        patch.apply(&mut record);

        let update = format!(
            "UPDATE links \
             SET title = $2, url = $3, icon = $4, active = $5, updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let row = query_as::<_, LinkRow>(&update)
            .bind(id)
            .bind(&record.title)
            .bind(&record.url)
            .bind(&record.icon)
            .bind(record.active)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(LinkRecord::from(row))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.delete_from(LinkRecord::KIND, id).await
    }

    async fn reorder(&self, ids: &[Uuid]) -> Result<(), RepoError> {
        self.reorder_collection(LinkRecord::KIND, ids).await
    }
}
