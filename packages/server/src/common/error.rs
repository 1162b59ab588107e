use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::common::phone::UNSUPPORTED_REGION_MESSAGE;
use crate::domains::invites::models::InviteStatus;
use crate::kernel::SmsError;

/// Errors returned by actions and rendered by the HTTP layer.
///
/// Client errors carry a human-readable message. Dependency failures are
/// logged and collapse to a generic 500 body.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{}", UNSUPPORTED_REGION_MESSAGE)]
    UnsupportedRegion,

    #[error("You already have a pending invite with this phone number")]
    AlreadyPending,

    #[error("Invalid verification code")]
    InvalidCode,

    #[error("This invite is no longer active")]
    InviteNotActive(InviteStatus),

    #[error("{0}")]
    Conflict(String),

    #[error("User not authenticated")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("SMS delivery failed: {0}")]
    Delivery(#[from] SmsError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::UnsupportedRegion
            | ApiError::AlreadyPending
            | ApiError::InvalidCode
            | ApiError::InviteNotActive(_)
            | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Delivery(_) | ApiError::Database(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            ApiError::InviteNotActive(invite_status) => json!({
                "error": self.to_string(),
                "status": invite_status,
            }),
            ApiError::Delivery(e) => {
                tracing::error!(error = %e, "SMS delivery failed");
                json!({ "error": "Failed to send verification code. Please try again." })
            }
            ApiError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                json!({ "error": "Internal server error" })
            }
            ApiError::Internal(e) => {
                tracing::error!(error = ?e, "Internal error");
                json!({ "error": "Internal server error" })
            }
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// True if `err` wraps a Postgres unique-constraint violation (SQLSTATE 23505).
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| match e {
            sqlx::Error::Database(db) => db.code(),
            _ => None,
        })
        .is_some_and(|code| code == "23505")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::AlreadyPending.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidCode.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Delivery(SmsError::NotConfigured).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_inactive_invite_reports_status() {
        let (status, body) = body_json(ApiError::InviteNotActive(InviteStatus::Cancelled)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "This invite is no longer active");
        assert_eq!(body["status"], "CANCELLED");
    }

    #[tokio::test]
    async fn test_internal_errors_hide_detail() {
        let (status, body) =
            body_json(ApiError::Internal(anyhow::anyhow!("code 1234 leaked"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[test]
    fn test_non_database_error_is_not_unique_violation() {
        assert!(!is_unique_violation(&anyhow::anyhow!("boom")));
        assert!(!is_unique_violation(&anyhow::Error::new(sqlx::Error::RowNotFound)));
    }
}
