use async_trait::async_trait;
use chrono_tz::Tz;
use sqlx::{PgConnection, query_as, types::Json};
use time::OffsetDateTime;

use crate::{
    application::repos::{ProfileRepo, RepoError},
    domain::profile::{ProfileRecord, SkillGroup, UpdateProfileCommand},
};

use super::{PostgresRepositories, ProfileZone, map_sqlx_error};

const PROFILE_ROW_ID: i16 = 1;

const COLUMNS: &str = "display_name, headline, bio, avatar_url, location, email, resume_url, \
     skills, timezone, updated_at";

#[derive(sqlx::FromRow)]
struct ProfileRow {
    display_name: String,
    headline: String,
    bio: String,
    avatar_url: Option<String>,
    location: Option<String>,
    email: Option<String>,
    resume_url: Option<String>,
    skills: Json<Vec<SkillGroup>>,
    #[sqlx(try_from = "String")]
    timezone: ProfileZone,
    updated_at: OffsetDateTime,
}

impl From<ProfileRow> for ProfileRecord {
    fn from(row: ProfileRow) -> Self {
        Self {
            display_name: row.display_name,
            headline: row.headline,
            bio: row.bio,
            avatar_url: row.avatar_url,
            location: row.location,
            email: row.email,
            resume_url: row.resume_url,
            skills: row.skills.0,
            timezone: row.timezone.into(),
            updated_at: row.updated_at,
        }
    }
}

/// Upsert the singleton row.
pub(super) async fn write_profile(
    conn: &mut PgConnection,
    command: UpdateProfileCommand,
    timezone: Tz,
) -> Result<ProfileRecord, RepoError> {
    let sql = format!(
        "INSERT INTO profile (id, {COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now()) \
         ON CONFLICT (id) DO UPDATE \
         SET display_name = EXCLUDED.display_name, headline = EXCLUDED.headline, \
             bio = EXCLUDED.bio, avatar_url = EXCLUDED.avatar_url, \
             location = EXCLUDED.location, email = EXCLUDED.email, \
             resume_url = EXCLUDED.resume_url, skills = EXCLUDED.skills, \
             timezone = EXCLUDED.timezone, updated_at = now() \
         RETURNING {COLUMNS}"
    );
    let row = query_as::<_, ProfileRow>(&sql)
        .bind(PROFILE_ROW_ID)
        .bind(&command.display_name)
        .bind(&command.headline)
        .bind(&command.bio)
        .bind(&command.avatar_url)
        .bind(&command.location)
        .bind(&command.email)
        .bind(&command.resume_url)
        .bind(Json(&command.skills))
        .bind(timezone.name())
        .fetch_one(conn)
        .await
        .map_err(map_sqlx_error)?;

    Ok(ProfileRecord::from(row))
}

#[async_trait]
impl ProfileRepo for PostgresRepositories {
    async fn load_profile(&self) -> Result<ProfileRecord, RepoError> {
        let sql = format!("SELECT {COLUMNS} FROM profile WHERE id = $1");
        let row = query_as::<_, ProfileRow>(&sql)
            .bind(PROFILE_ROW_ID)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(ProfileRecord::from(row))
    }

    async fn update_profile(
        &self,
        command: UpdateProfileCommand,
        timezone: Tz,
    ) -> Result<ProfileRecord, RepoError> {
        let mut conn = self.pool().acquire().await.map_err(map_sqlx_error)?;
        write_profile(&mut conn, command, timezone).await
    }
}
