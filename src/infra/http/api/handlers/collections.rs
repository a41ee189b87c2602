//! Collection handlers, shared by every ordered collection.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::infra::http::admin::{AdminResource, AdminState};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{DeleteQuery, MoveRequest, MoveResponse, ReorderRequest};

pub async fn list_records<E: AdminResource>(
    State(state): State<AdminState>,
) -> Result<impl IntoResponse, ApiError> {
    let items = E::service(&state).list().await?;
    Ok(Json(items))
}

pub async fn get_record<E: AdminResource>(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = E::service(&state).find(id).await?;
    Ok(Json(record))
}

pub async fn create_record<E: AdminResource>(
    State(state): State<AdminState>,
    Json(draft): Json<E::Draft>,
) -> Result<impl IntoResponse, ApiError> {
    let record = E::service(&state).create(draft).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_record<E: AdminResource>(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<E::Patch>,
) -> Result<impl IntoResponse, ApiError> {
    let record = E::service(&state).update(id, patch).await?;
    Ok(Json(record))
}

pub async fn delete_record<E: AdminResource>(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> Result<impl IntoResponse, ApiError> {
    E::service(&state).delete(id, query.confirm).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder_records<E: AdminResource>(
    State(state): State<AdminState>,
    Json(request): Json<ReorderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let items = E::service(&state).reorder(&request.ids).await?;
    Ok(Json(items))
}

pub async fn move_record<E: AdminResource>(
    State(state): State<AdminState>,
    Json(request): Json<MoveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (outcome, items) = E::service(&state)
        .move_item(request.dragged_id, request.target_id)
        .await?;
    Ok(Json(MoveResponse::new(&outcome, items)))
}
