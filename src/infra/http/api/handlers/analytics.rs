//! Click analytics handlers

use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;

use crate::infra::http::admin::AdminState;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::WindowQuery;

pub async fn click_summary(
    State(state): State<AdminState>,
    Query(query): Query<WindowQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state.link_service.click_summary(query.days).await?;
    Ok(Json(summary))
}
