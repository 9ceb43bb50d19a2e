use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use shared::ErrorBody;

use crate::db::DbError;

/// Every way a task request can fail. Converted to a JSON [`ErrorBody`] at
/// the handler boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Not found")]
    NotFound,
    #[error("{context}")]
    Storage {
        context: &'static str,
        #[source]
        source: DbError,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let details = match &self {
            ApiError::Storage { context, source } => {
                tracing::error!(error = %source, "{context}");
                Some(source.to_string())
            }
            _ => None,
        };
        let body = ErrorBody {
            error: self.to_string(),
            details,
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// Attaches the failed operation's name to a storage error.
pub trait StorageContext<T> {
    fn context(self, context: &'static str) -> Result<T, ApiError>;
}

impl<T> StorageContext<T> for Result<T, DbError> {
    fn context(self, context: &'static str) -> Result<T, ApiError> {
        self.map_err(|source| ApiError::Storage { context, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(ApiError::validation("Missing title").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        let storage: Result<(), DbError> = Err(DbError::Sqlx(sqlx::Error::PoolClosed));
        let err = storage.context("Failed to get tasks").unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to get tasks");
    }

    #[tokio::test]
    async fn storage_error_body_carries_details() {
        let err = ApiError::Storage {
            context: "Failed to delete",
            source: DbError::Sqlx(sqlx::Error::PoolClosed),
        };
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        let parsed: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.error, "Failed to delete");
        assert!(parsed.details.is_some());
    }
}
