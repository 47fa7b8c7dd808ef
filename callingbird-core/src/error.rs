use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::sync::SyncError;

/// Application-level error returned by HTTP handlers.
///
/// Controllers are the last line of error handling: validation problems map
/// to 400, missing resources to 404, upstream provider failures keep the
/// upstream status where one is available, and everything else becomes a
/// logged 500.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or malformed request fields
    #[error("{0}")]
    Validation(String),

    /// A referenced resource does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// A third-party call failed; carries the upstream status where known
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// Assistant sync failure, surfaced verbatim as a JSON body
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// Database error, surfaced unmodified by the repositories
    #[error(transparent)]
    Db(#[from] sqlx::Error),

    /// Anything else
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            AppError::Sync(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            AppError::Db(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Unhandled error in handler: {:?}", self);
        }

        let body = match &self {
            AppError::Sync(e) => json!({ "messages": e.messages(), "statusCode": e.status_code() }),
            _ => json!({ "message": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let err = AppError::validation("month is required");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = AppError::not_found("appointment type");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "appointment type not found");
    }

    #[test]
    fn test_upstream_keeps_status() {
        let err = AppError::Upstream {
            status: 502,
            message: "provider unavailable".to_string(),
        };
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_unknown_upstream_status_falls_back_to_500() {
        let err = AppError::Upstream {
            status: 99,
            message: "bogus".to_string(),
        };
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
