//! Profile handlers

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;

use crate::domain::profile::UpdateProfileCommand;
use crate::infra::http::admin::AdminState;
use crate::infra::http::api::error::ApiError;

pub async fn get_profile(State(state): State<AdminState>) -> Result<impl IntoResponse, ApiError> {
    let profile = state.profile.load().await?;
    Ok(Json(profile))
}

pub async fn put_profile(
    State(state): State<AdminState>,
    Json(command): Json<UpdateProfileCommand>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.profile.update(command).await?;
    Ok(Json(profile))
}
