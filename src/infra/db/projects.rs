use async_trait::async_trait;
use sqlx::{PgConnection, query_as};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{CollectionRepo, RepoError},
    domain::{
        collection::{CollectionEntity, EntityPatch},
        projects::{ProjectDraft, ProjectPatch, ProjectRecord},
    },
};

use super::{PostgresRepositories, map_sqlx_error};

const COLUMNS: &str = "id, slug, title, description, technologies, repository_url, live_url, \
     image_url, featured, active, order_index, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    slug: String,
    title: String,
    description: String,
    technologies: Vec<String>,
    repository_url: Option<String>,
    live_url: Option<String>,
    image_url: Option<String>,
    featured: bool,
    active: bool,
    order_index: i32,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ProjectRow> for ProjectRecord {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            description: row.description,
            technologies: row.technologies,
            repository_url: row.repository_url,
            live_url: row.live_url,
            image_url: row.image_url,
            featured: row.featured,
            active: row.active,
            order_index: row.order_index,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(super) async fn insert_project(
    conn: &mut PgConnection,
    draft: ProjectDraft,
    order_index: i32,
) -> Result<ProjectRecord, RepoError> {
    let now = OffsetDateTime::now_utc();
    let record = ProjectRecord::materialize(Uuid::new_v4(), draft, order_index, now);

    let sql = format!(
        "INSERT INTO projects ({COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12) \
         RETURNING {COLUMNS}"
    );
    let row = query_as::<_, ProjectRow>(&sql)
        .bind(record.id)
        .bind(&record.slug)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.technologies)
        .bind(&record.repository_url)
        .bind(&record.live_url)
        .bind(&record.image_url)
        .bind(record.featured)
        .bind(record.active)
        .bind(record.order_index)
        .bind(now)
        .fetch_one(conn)
        .await
        .map_err(map_sqlx_error)?;

    Ok(ProjectRecord::from(row))
}

#[async_trait]
impl CollectionRepo<ProjectRecord> for PostgresRepositories {
    async fn list(&self) -> Result<Vec<ProjectRecord>, RepoError> {
        let sql = format!("SELECT {COLUMNS} FROM projects ORDER BY order_index, created_at");
        let rows = query_as::<_, ProjectRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ProjectRecord::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProjectRecord>, RepoError> {
        let sql = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        let row = query_as::<_, ProjectRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(ProjectRecord::from))
    }

    async fn create(
        &self,
        draft: ProjectDraft,
        order_index: i32,
    ) -> Result<ProjectRecord, RepoError> {
        let mut conn = self.pool().acquire().await.map_err(map_sqlx_error)?;
        insert_project(&mut conn, draft, order_index).await
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &ProjectPatch,
    ) -> Result<ProjectRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let select = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 FOR UPDATE");
        let mut record = query_as::<_, ProjectRow>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .map(ProjectRecord::from)
            .ok_or(RepoError::NotFound)?;
        patch.apply(&mut record);

        let update = format!(
            "UPDATE projects \
             SET slug = $2, title = $3, description = $4, technologies = $5, \
                 repository_url = $6, live_url = $7, image_url = $8, featured = $9, \
                 active = $10, updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let row = query_as::<_, ProjectRow>(&update)
            .bind(id)
            .bind(&record.slug)
            .bind(&record.title)
            .bind(&record.description)
            .bind(&record.technologies)
            .bind(&record.repository_url)
            .bind(&record.live_url)
            .bind(&record.image_url)
            .bind(record.featured)
            .bind(record.active)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(ProjectRecord::from(row))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.delete_from(ProjectRecord::KIND, id).await
    }

    async fn reorder(&self, ids: &[Uuid]) -> Result<(), RepoError> {
        self.reorder_collection(ProjectRecord::KIND, ids).await
    }
}
