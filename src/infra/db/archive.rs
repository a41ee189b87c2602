use async_trait::async_trait;
use sqlx::query;

use crate::application::repos::{ContentImportRepo, ContentReplacement, RepoError};

use super::{
    PostgresRepositories, experiences::insert_experience, hackathons::insert_hackathon,
    links::insert_link, map_sqlx_error, profile::write_profile, projects::insert_project,
};

fn rank(index: usize) -> i32 {
    i32::try_from(index + 1).unwrap_or(i32::MAX)
}

#[async_trait]
impl ContentImportRepo for PostgresRepositories {
    async fn replace_content(&self, content: ContentReplacement) -> Result<(), RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        query("TRUNCATE link_clicks, links, hackathons, experiences, projects")
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        if let Some((command, timezone)) = content.profile {
            write_profile(&mut tx, command, timezone).await?;
        }
        for (index, draft) in content.projects.into_iter().enumerate() {
            insert_project(&mut tx, draft, rank(index)).await?;
        }
        for (index, draft) in content.experiences.into_iter().enumerate() {
            insert_experience(&mut tx, draft, rank(index)).await?;
        }
        for (index, draft) in content.hackathons.into_iter().enumerate() {
            insert_hackathon(&mut tx, draft, rank(index)).await?;
        }
        for (index, draft) in content.links.into_iter().enumerate() {
            insert_link(&mut tx, draft, rank(index)).await?;
        }

        tx.commit().await.map_err(map_sqlx_error)
    }
}
