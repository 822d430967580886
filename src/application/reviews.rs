//! Review listing and creation for a single book.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;

use crate::cache::{CacheKey, SideCache, Source};

use super::fields::{integer_value, optional_text};
use super::repos::{BooksRepo, NewReview, RepoError, ReviewsRepo};
use super::views::ReviewView;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("{0}")]
    Validation(String),
    #[error("Book with id {0} not found")]
    BookNotFound(i64),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl ReviewError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct AddReview {
    pub reviewer_name: Option<String>,
    pub rating: Option<Value>,
    pub review_text: Option<String>,
}

/// A book's review listing plus the source tag for the response envelope.
#[derive(Debug)]
pub struct BookReviews {
    pub book_id: i64,
    pub book_title: String,
    pub reviews: Vec<ReviewView>,
    pub source: Source,
}

pub struct ReviewService {
    books: Arc<dyn BooksRepo>,
    reviews: Arc<dyn ReviewsRepo>,
    cache: Arc<SideCache>,
}

impl ReviewService {
    pub fn new(
        books: Arc<dyn BooksRepo>,
        reviews: Arc<dyn ReviewsRepo>,
        cache: Arc<SideCache>,
    ) -> Self {
        Self {
            books,
            reviews,
            cache,
        }
    }

    /// List a book's reviews, newest first, through the side cache.
    ///
    /// The book lookup itself is not a cached path; only the review
    /// collection is.
    pub async fn list_reviews(&self, book_id: i64) -> Result<BookReviews, ReviewError> {
        let book = self
            .books
            .find_book(book_id)
            .await?
            .ok_or(ReviewError::BookNotFound(book_id))?;

        let (reviews, source) = self
            .cache
            .read_through(CacheKey::ReviewsForBook(book_id), || async {
                let records = self.reviews.list_reviews_for_book(book_id).await?;
                Ok::<_, ReviewError>(records
                    .into_iter()
                    .map(ReviewView::from)
                    .collect::<Vec<_>>())
            })
            .await?;

        Ok(BookReviews {
            book_id,
            book_title: book.title,
            reviews,
            source,
        })
    }

    /// Validate and insert a review, then invalidate that book's review
    /// listing only; the book collection is never touched.
    pub async fn add_review(
        &self,
        book_id: i64,
        command: AddReview,
    ) -> Result<ReviewView, ReviewError> {
        if self.books.find_book(book_id).await?.is_none() {
            return Err(ReviewError::BookNotFound(book_id));
        }

        let reviewer_name = match command.reviewer_name {
            None => return Err(ReviewError::validation("'reviewer_name' is required")),
            Some(name) => {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    return Err(ReviewError::validation("Reviewer name cannot be empty"));
                }
                trimmed.to_string()
            }
        };

        let rating = validate_rating(command.rating.as_ref())?;
        let review_text = optional_text(command.review_text);

        let record = self
            .reviews
            .insert_review(NewReview {
                book_id,
                reviewer_name,
                rating,
                review_text,
                created_at: OffsetDateTime::now_utc(),
            })
            .await
            .map_err(|err| match err {
                // The book vanished between the existence check and the
                // insert; the foreign key is the final arbiter.
                RepoError::ForeignKey => ReviewError::BookNotFound(book_id),
                other => ReviewError::from(other),
            })?;

        self.cache.invalidate(CacheKey::ReviewsForBook(book_id)).await;

        Ok(ReviewView::from(record))
    }
}

fn validate_rating(value: Option<&Value>) -> Result<i64, ReviewError> {
    let value = value
        .filter(|value| !value.is_null())
        .ok_or_else(|| ReviewError::validation("'rating' is required"))?;

    let rating = integer_value(value).ok_or_else(|| {
        ReviewError::validation("Rating must be a valid integer between 1 and 5")
    })?;

    if !(1..=5).contains(&rating) {
        return Err(ReviewError::validation("Rating must be between 1 and 5"));
    }

    Ok(rating)
}
