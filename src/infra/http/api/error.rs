use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::admin::{
    collection::AdminCollectionError, dashboard::AdminDashboardError, profile::AdminProfileError,
};
use crate::application::error::ErrorReport;
use crate::application::links::LinkServiceError;
use crate::application::repos::RepoError;
use crate::domain::error::DomainError;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const VALIDATION: &str = "validation_error";
    pub const NOT_FOUND: &str = "not_found";
    pub const DECLINED: &str = "declined";
    pub const EMPTY_PATCH: &str = "empty_patch";
    pub const INVALID_ORDER: &str = "invalid_order";
    pub const REORDER_FAILED: &str = "reorder_failed";
    pub const DUPLICATE: &str = "duplicate";
    pub const INVALID_INPUT: &str = "invalid_input";
    pub const INTEGRITY: &str = "integrity_error";
    pub const DB_TIMEOUT: &str = "db_timeout";
    pub const REPO: &str = "repo_error";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
    hint: Option<String>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: &'static str,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message,
            hint,
        }
    }

    pub fn bad_request(message: &'static str, hint: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message, hint)
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message, None)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let hint = self.hint.clone();
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message.to_string(),
                hint: self.hint,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        ErrorReport::from_message(
            "infra::http::api",
            self.status,
            format!("{}: {}", self.code, hint.as_deref().unwrap_or(self.message)),
        )
        .attach(&mut response);
        response
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Duplicate { constraint } => ApiError::new(
                StatusCode::CONFLICT,
                codes::DUPLICATE,
                "Duplicate record",
                Some(constraint),
            ),
            RepoError::NotFound => ApiError::not_found("resource not found"),
            RepoError::InvalidInput { message } => ApiError::new(
                StatusCode::BAD_REQUEST,
                codes::INVALID_INPUT,
                "Invalid input",
                Some(message),
            ),
            RepoError::Integrity { message } => ApiError::new(
                StatusCode::CONFLICT,
                codes::INTEGRITY,
                "Integrity constraint violated",
                Some(message),
            ),
            RepoError::Timeout => ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                codes::DB_TIMEOUT,
                "Database timeout",
                None,
            ),
            RepoError::Persistence(message) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::REPO,
                "Persistence error",
                Some(message),
            ),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { .. } => ApiError::not_found("resource not found"),
            other => ApiError::new(
                StatusCode::BAD_REQUEST,
                codes::VALIDATION,
                "Validation failed",
                Some(other.to_string()),
            ),
        }
    }
}

impl From<AdminCollectionError> for ApiError {
    fn from(err: AdminCollectionError) -> Self {
        match err {
            AdminCollectionError::Domain(domain) => domain.into(),
            AdminCollectionError::NotFound => ApiError::not_found("record not found"),
            AdminCollectionError::EmptyPatch => ApiError::new(
                StatusCode::BAD_REQUEST,
                codes::EMPTY_PATCH,
                "Update contains no fields",
                None,
            ),
            AdminCollectionError::Declined => ApiError::new(
                StatusCode::CONFLICT,
                codes::DECLINED,
                "Deletion was not confirmed",
                Some("repeat the request with ?confirm=true".to_string()),
            ),
            AdminCollectionError::InvalidOrder(reason) => ApiError::new(
                StatusCode::BAD_REQUEST,
                codes::INVALID_ORDER,
                "Order must list every record exactly once",
                Some(reason),
            ),
            AdminCollectionError::ReorderFailed { source, restored } => {
                let restored = restored
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                ApiError::new(
                    StatusCode::BAD_GATEWAY,
                    codes::REORDER_FAILED,
                    "Reorder could not be saved",
                    Some(format!("{source}; order restored to [{restored}]")),
                )
            }
            AdminCollectionError::Repo(repo) => repo.into(),
        }
    }
}

impl From<AdminProfileError> for ApiError {
    fn from(err: AdminProfileError) -> Self {
        match err {
            AdminProfileError::Domain(domain) => domain.into(),
            AdminProfileError::Repo(repo) => repo.into(),
        }
    }
}

impl From<LinkServiceError> for ApiError {
    fn from(err: LinkServiceError) -> Self {
        match err {
            LinkServiceError::NotFound => ApiError::not_found("link not found"),
            LinkServiceError::Repo(repo) => repo.into(),
        }
    }
}

impl From<AdminDashboardError> for ApiError {
    fn from(err: AdminDashboardError) -> Self {
        match err {
            AdminDashboardError::Collection(inner) => inner.into(),
            AdminDashboardError::Links(inner) => inner.into(),
        }
    }
}
