use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::instrument;

use super::AppState;
use super::error::ApiError;
use super::models::{
    BookCreateRequest, BookCreatedResponse, BooksResponse, ReviewCreateRequest,
    ReviewCreatedResponse, ReviewsResponse,
};

#[instrument(skip_all)]
pub async fn list_books(State(state): State<AppState>) -> Result<Json<BooksResponse>, ApiError> {
    let (books, source) = state.books.list_books().await?;
    Ok(Json(BooksResponse { books, source }))
}

#[instrument(skip_all)]
pub async fn add_book(
    State(state): State<AppState>,
    payload: Result<Json<BookCreateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookCreatedResponse>), ApiError> {
    let Json(request) = payload.map_err(ApiError::from_rejection)?;
    let book = state.books.add_book(request.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(BookCreatedResponse {
            message: "Book added successfully",
            book,
        }),
    ))
}

#[instrument(skip_all)]
pub async fn list_book_reviews(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
) -> Result<Json<ReviewsResponse>, ApiError> {
    let listing = state.reviews.list_reviews(book_id).await?;
    Ok(Json(ReviewsResponse::from(listing)))
}

#[instrument(skip_all)]
pub async fn add_book_review(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
    payload: Result<Json<ReviewCreateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ReviewCreatedResponse>), ApiError> {
    let Json(request) = payload.map_err(ApiError::from_rejection)?;
    let review = state.reviews.add_review(book_id, request.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ReviewCreatedResponse {
            message: "Review added successfully",
            review,
        }),
    ))
}

/// Liveness probe covering the store and the cache backend. A broken cache
/// never makes the service unhealthy; it is reported as `disconnected`.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    match state.db.health_check().await {
        Ok(()) => {
            let cache = state.cache.status().await;
            (
                StatusCode::OK,
                Json(json!({
                    "status": "healthy",
                    "database": "connected",
                    "cache": cache.as_str(),
                    "timestamp": timestamp,
                })),
            )
        }
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "unhealthy",
                "error": err.to_string(),
                "timestamp": timestamp,
            })),
        ),
    }
}
