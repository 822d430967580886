use async_trait::async_trait;
use time::OffsetDateTime;

use crate::application::repos::{NewReview, RepoError, ReviewsRepo};
use crate::domain::entities::ReviewRecord;

use super::{SqliteRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    book_id: i64,
    reviewer_name: String,
    rating: i64,
    review_text: Option<String>,
    created_at: OffsetDateTime,
}

impl From<ReviewRow> for ReviewRecord {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            book_id: row.book_id,
            reviewer_name: row.reviewer_name,
            rating: row.rating,
            review_text: row.review_text,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ReviewsRepo for SqliteRepositories {
    async fn insert_review(&self, review: NewReview) -> Result<ReviewRecord, RepoError> {
        let result = sqlx::query(
            "INSERT INTO reviews (book_id, reviewer_name, rating, review_text, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(review.book_id)
        .bind(&review.reviewer_name)
        .bind(review.rating)
        .bind(&review.review_text)
        .bind(review.created_at)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(ReviewRecord {
            id: result.last_insert_rowid(),
            book_id: review.book_id,
            reviewer_name: review.reviewer_name,
            rating: review.rating,
            review_text: review.review_text,
            created_at: review.created_at,
        })
    }

    async fn list_reviews_for_book(&self, book_id: i64) -> Result<Vec<ReviewRecord>, RepoError> {
        let rows: Vec<ReviewRow> = sqlx::query_as(
            "SELECT id, book_id, reviewer_name, rating, review_text, created_at \
             FROM reviews WHERE book_id = ?1 ORDER BY created_at DESC, id DESC",
        )
        .bind(book_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ReviewRecord::from).collect())
    }
}
