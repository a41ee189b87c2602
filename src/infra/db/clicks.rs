use async_trait::async_trait;
use sqlx::query_as;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{LinkClicksRepo, RepoError},
    domain::clicks::{LinkClickRecord, NewLinkClick},
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct LinkClickRow {
    id: Uuid,
    link_id: Uuid,
    clicked_at: OffsetDateTime,
    referrer: Option<String>,
    visitor_hash: Option<String>,
}

impl From<LinkClickRow> for LinkClickRecord {
    fn from(row: LinkClickRow) -> Self {
        Self {
            id: row.id,
            link_id: row.link_id,
            clicked_at: row.clicked_at,
            referrer: row.referrer,
            visitor_hash: row.visitor_hash,
        }
    }
}

#[async_trait]
impl LinkClicksRepo for PostgresRepositories {
    async fn record_click(&self, click: NewLinkClick) -> Result<LinkClickRecord, RepoError> {
        let row = query_as::<_, LinkClickRow>(
            "INSERT INTO link_clicks (id, link_id, clicked_at, referrer, visitor_hash) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, link_id, clicked_at, referrer, visitor_hash",
        )
        .bind(Uuid::new_v4())
        .bind(click.link_id)
        .bind(click.clicked_at)
        .bind(&click.referrer)
        .bind(&click.visitor_hash)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(LinkClickRecord::from(row))
    }

    async fn list_clicks_since(
        &self,
        since: OffsetDateTime,
    ) -> Result<Vec<LinkClickRecord>, RepoError> {
        let rows = query_as::<_, LinkClickRow>(
            "SELECT id, link_id, clicked_at, referrer, visitor_hash \
             FROM link_clicks \
             WHERE clicked_at >= $1 \
             ORDER BY clicked_at, id",
        )
        .bind(since)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(LinkClickRecord::from).collect())
    }
}
