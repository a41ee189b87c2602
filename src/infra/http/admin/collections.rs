use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::infra::http::api::error::ApiError;
use crate::presentation::{admin::views as admin_views, views::render_template_response};

use super::{AdminResource, AdminState};

/// Drag-and-drop manager page for one collection.
pub(super) async fn admin_collection<E: AdminResource>(
    State(state): State<AdminState>,
) -> Response {
    let items = match E::service(&state).list().await {
        Ok(items) => items,
        Err(err) => return ApiError::from(err).into_response(),
    };

    let chrome = state.chrome(&format!("/{}", E::KIND.collection_path()));
    let view = admin_views::AdminLayout::new(chrome, admin_views::CollectionPageView::new(&items));
    render_template_response(admin_views::AdminCollectionTemplate { view }, StatusCode::OK)
}

/// One rendered manager row, used by the page script to append a created
/// record or patch an edited one without reloading.
pub(super) async fn admin_collection_row<E: AdminResource>(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Response {
    let items = match E::service(&state).list().await {
        Ok(items) => items,
        Err(err) => return ApiError::from(err).into_response(),
    };

    let Some((index, item)) = items.iter().enumerate().find(|(_, item)| item.id() == id) else {
        return ApiError::not_found("record not found").into_response();
    };
    let row = admin_views::ManagerRowView::new(item, index + 1);
    render_template_response(admin_views::AdminRowTemplate { row }, StatusCode::OK)
}
