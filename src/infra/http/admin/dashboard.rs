use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::infra::http::api::{error::ApiError, models::WindowQuery};
use crate::presentation::{admin::views as admin_views, views::render_template_response};

use super::AdminState;

pub(super) async fn admin_dashboard(
    State(state): State<AdminState>,
    Query(query): Query<WindowQuery>,
) -> Response {
    let snapshot = match state.dashboard.snapshot(query.days).await {
        Ok(snapshot) => snapshot,
        Err(err) => return ApiError::from(err).into_response(),
    };

    let chrome = state.chrome("/");
    let view = admin_views::AdminLayout::new(chrome, admin_views::DashboardView::from(&snapshot));
    render_template_response(admin_views::AdminDashboardTemplate { view }, StatusCode::OK)
}
