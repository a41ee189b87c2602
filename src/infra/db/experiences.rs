use async_trait::async_trait;
use sqlx::{PgConnection, query_as};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{
    application::repos::{CollectionRepo, RepoError},
    domain::{
        collection::{CollectionEntity, EntityPatch},
        experiences::{ExperienceDraft, ExperiencePatch, ExperienceRecord},
    },
};

use super::{PostgresRepositories, map_sqlx_error};

const COLUMNS: &str = "id, company, role, location, description, technologies, started_on, \
     ended_on, active, order_index, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ExperienceRow {
    id: Uuid,
    company: String,
    role: String,
    location: Option<String>,
    description: String,
    technologies: Vec<String>,
    started_on: Date,
    ended_on: Option<Date>,
    active: bool,
    order_index: i32,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ExperienceRow> for ExperienceRecord {
    fn from(row: ExperienceRow) -> Self {
        Self {
            id: row.id,
            company: row.company,
            role: row.role,
            location: row.location,
            description: row.description,
            technologies: row.technologies,
            started_on: row.started_on,
            ended_on: row.ended_on,
            active: row.active,
            order_index: row.order_index,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(super) async fn insert_experience(
    conn: &mut PgConnection,
    draft: ExperienceDraft,
    order_index: i32,
) -> Result<ExperienceRecord, RepoError> {
    let now = OffsetDateTime::now_utc();
    let record = ExperienceRecord::materialize(Uuid::new_v4(), draft, order_index, now);

    let sql = format!(
        "INSERT INTO experiences ({COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11) \
         RETURNING {COLUMNS}"
    );
    let row = query_as::<_, ExperienceRow>(&sql)
        .bind(record.id)
        .bind(&record.company)
        .bind(&record.role)
        .bind(&record.location)
        .bind(&record.description)
        .bind(&record.technologies)
        .bind(record.started_on)
        .bind(record.ended_on)
        .bind(record.active)
        .bind(record.order_index)
        .bind(now)
        .fetch_one(conn)
        .await
        .map_err(map_sqlx_error)?;

    Ok(ExperienceRecord::from(row))
}

#[async_trait]
impl CollectionRepo<ExperienceRecord> for PostgresRepositories {
    async fn list(&self) -> Result<Vec<ExperienceRecord>, RepoError> {
        let sql = format!("SELECT {COLUMNS} FROM experiences ORDER BY order_index, created_at");
        let rows = query_as::<_, ExperienceRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ExperienceRecord::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ExperienceRecord>, RepoError> {
        let sql = format!("SELECT {COLUMNS} FROM experiences WHERE id = $1");
        let row = query_as::<_, ExperienceRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(ExperienceRecord::from))
    }

    async fn create(
        &self,
        draft: ExperienceDraft,
        order_index: i32,
    ) -> Result<ExperienceRecord, RepoError> {
        let mut conn = self.pool().acquire().await.map_err(map_sqlx_error)?;
        insert_experience(&mut conn, draft, order_index).await
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &ExperiencePatch,
    ) -> Result<ExperienceRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let select = format!("SELECT {COLUMNS} FROM experiences WHERE id = $1 FOR UPDATE");
        let mut record = query_as::<_, ExperienceRow>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .map(ExperienceRecord::from)
            .ok_or(RepoError::NotFound)?;
        patch.apply(&mut record);

        if let Some(ended_on) = record.ended_on
            && ended_on < record.started_on
        {
            return Err(RepoError::InvalidInput {
                message: "ended_on must not be earlier than started_on".into(),
            });
        }

        let update = format!(
            "UPDATE experiences \
             SET company = $2, role = $3, location = $4, description = $5, \
                 technologies = $6, started_on = $7, ended_on = $8, active = $9, \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let row = query_as::<_, ExperienceRow>(&update)
            .bind(id)
            .bind(&record.company)
            .bind(&record.role)
            .bind(&record.location)
            .bind(&record.description)
            .bind(&record.technologies)
            .bind(record.started_on)
            .bind(record.ended_on)
            .bind(record.active)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(ExperienceRecord::from(row))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.delete_from(ExperienceRecord::KIND, id).await
    }

    async fn reorder(&self, ids: &[Uuid]) -> Result<(), RepoError> {
        self.reorder_collection(ExperienceRecord::KIND, ids).await
    }
}
