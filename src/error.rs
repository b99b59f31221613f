use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures surfaced by the ledger and account stores.
///
/// Validation, not-found and conflict outcomes carry enough detail for the
/// caller to act on. Storage and internal failures are logged here and
/// surfaced without detail. Authentication is deliberately uniform so the
/// response never reveals whether the username existed.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("invalid username or password")]
    Authentication,
    #[error("storage failure")]
    Storage(#[from] sqlx::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Authentication => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Storage(e) => {
                error!(error = %e, "storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
            }
            AppError::Internal(e) => {
                error!(error = %e, "internal failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_message_is_uniform() {
        assert_eq!(
            AppError::Authentication.to_string(),
            "invalid username or password"
        );
    }

    #[test]
    fn storage_message_is_opaque() {
        let err = AppError::Storage(sqlx::Error::RowNotFound);
        assert_eq!(err.to_string(), "storage failure");
    }
}
