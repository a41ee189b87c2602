use async_trait::async_trait;
use sqlx::{PgConnection, query_as, types::Json};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{
    application::repos::{CollectionRepo, RepoError},
    domain::{
        collection::{CollectionEntity, EntityPatch},
        hackathons::{HackathonDraft, HackathonPatch, HackathonPhoto, HackathonRecord},
    },
};

use super::{PostgresRepositories, map_sqlx_error};

const COLUMNS: &str = "id, name, project_name, description, location, held_on, award, \
     project_url, technologies, photos, active, order_index, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct HackathonRow {
    id: Uuid,
    name: String,
    project_name: Option<String>,
    description: String,
    location: Option<String>,
    held_on: Date,
    award: Option<String>,
    project_url: Option<String>,
    technologies: Vec<String>,
    photos: Json<Vec<HackathonPhoto>>,
    active: bool,
    order_index: i32,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<HackathonRow> for HackathonRecord {
    fn from(row: HackathonRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            project_name: row.project_name,
            description: row.description,
            location: row.location,
            held_on: row.held_on,
            award: row.award,
            project_url: row.project_url,
            technologies: row.technologies,
            photos: row.photos.0,
            active: row.active,
            order_index: row.order_index,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(super) async fn insert_hackathon(
    conn: &mut PgConnection,
    draft: HackathonDraft,
    order_index: i32,
) -> Result<HackathonRecord, RepoError> {
    let now = OffsetDateTime::now_utc();
    let record = HackathonRecord::materialize(Uuid::new_v4(), draft, order_index, now);

    let sql = format!(
        "INSERT INTO hackathons ({COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13) \
         RETURNING {COLUMNS}"
    );
    let row = query_as::<_, HackathonRow>(&sql)
        .bind(record.id)
        .bind(&record.name)
        .bind(&record.project_name)
        .bind(&record.description)
        .bind(&record.location)
        .bind(record.held_on)
        .bind(&record.award)
        .bind(&record.project_url)
        .bind(&record.technologies)
        .bind(Json(&record.photos))
        .bind(record.active)
        .bind(record.order_index)
        .bind(now)
        .fetch_one(conn)
        .await
        .map_err(map_sqlx_error)?;

    Ok(HackathonRecord::from(row))
}

#[async_trait]
impl CollectionRepo<HackathonRecord> for PostgresRepositories {
    async fn list(&self) -> Result<Vec<HackathonRecord>, RepoError> {
        let sql = format!("SELECT {COLUMNS} FROM hackathons ORDER BY order_index, created_at");
        let rows = query_as::<_, HackathonRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(HackathonRecord::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<HackathonRecord>, RepoError> {
        let sql = format!("SELECT {COLUMNS} FROM hackathons WHERE id = $1");
        let row = query_as::<_, HackathonRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(HackathonRecord::from))
    }

    async fn create(
        &self,
        draft: HackathonDraft,
        order_index: i32,
    ) -> Result<HackathonRecord, RepoError> {
        let mut conn = self.pool().acquire().await.map_err(map_sqlx_error)?;
        insert_hackathon(&mut conn, draft, order_index).await
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &HackathonPatch,
    ) -> Result<HackathonRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let select = format!("SELECT {COLUMNS} FROM hackathons WHERE id = $1 FOR UPDATE");
        let mut record = query_as::<_, HackathonRow>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .map(HackathonRecord::from)
            .ok_or(RepoError::NotFound)?;
        patch.apply(&mut record);

        let update = format!(
            "UPDATE hackathons \
             SET name = $2, project_name = $3, description = $4, location = $5, \
                 held_on = $6, award = $7, project_url = $8, technologies = $9, \
                 photos = $10, active = $11, updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let row = query_as::<_, HackathonRow>(&update)
            .bind(id)
            .bind(&record.name)
            .bind(&record.project_name)
            .bind(&record.description)
            .bind(&record.location)
            .bind(record.held_on)
            .bind(&record.award)
            .bind(&record.project_url)
            .bind(&record.technologies)
            .bind(Json(&record.photos))
            .bind(record.active)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(HackathonRecord::from(row))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.delete_from(HackathonRecord::KIND, id).await
    }

    async fn reorder(&self, ids: &[Uuid]) -> Result<(), RepoError> {
        self.reorder_collection(HackathonRecord::KIND, ids).await
    }
}
