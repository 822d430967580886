use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use crate::application::books::BookError;
use crate::application::repos::RepoError;
use crate::application::reviews::ReviewError;

/// Error reply rendered as `{"error": ..., "message": ...}`.
///
/// `error` is the broad category, `message` the human detail; the 415 reply
/// carries the whole sentence in `error` and no `message`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: String,
    message: Option<String>,
}

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "Bad request".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: "Resource not found".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: "Internal server error".to_string(),
            message: Some("An unexpected error occurred".to_string()),
        }
    }

    pub fn unsupported_media_type() -> Self {
        Self {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            error: "Unsupported Media Type. Content-Type must be application/json".to_string(),
            message: None,
        }
    }

    /// Body extraction failures: wrong content type is 415, everything else
    /// (malformed JSON, read errors) is a plain 400.
    pub fn from_rejection(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => Self::unsupported_media_type(),
            other => Self::bad_request(other.body_text()),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.error,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        error!(target = "recensio::http", error = %err, "Persistence failure");
        Self::internal()
    }
}

impl From<BookError> for ApiError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::Validation(message) => Self::bad_request(message),
            duplicate @ BookError::DuplicateIsbn(_) => Self::bad_request(duplicate.to_string()),
            BookError::Repo(repo) => repo.into(),
        }
    }
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::Validation(message) => Self::bad_request(message),
            missing @ ReviewError::BookNotFound(_) => Self::not_found(missing.to_string()),
            ReviewError::Repo(repo) => repo.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_isbn_maps_to_bad_request() {
        let err = ApiError::from(BookError::DuplicateIsbn("978-0-452-28423-4".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error, "Bad request");
        assert_eq!(
            err.message.as_deref(),
            Some("Book with ISBN '978-0-452-28423-4' already exists")
        );
    }

    #[test]
    fn missing_book_maps_to_not_found() {
        let err = ApiError::from(ReviewError::BookNotFound(42));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message.as_deref(), Some("Book with id 42 not found"));
    }

    #[test]
    fn repo_failures_hide_detail() {
        let err = ApiError::from(RepoError::from_persistence("disk on fire"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.message.as_deref(),
            Some("An unexpected error occurred")
        );
    }

    #[test]
    fn unsupported_media_type_has_no_message_field() {
        let err = ApiError::unsupported_media_type();
        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(err.message.is_none());
    }
}
