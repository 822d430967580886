//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::entities::{BookRecord, ReviewRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("referenced row does not exist")]
    ForeignKey,
    #[error("integrity error: {message}")]
    Integrity { message: String },
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub publication_year: Option<i64>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub book_id: i64,
    pub reviewer_name: String,
    pub rating: i64,
    pub review_text: Option<String>,
    pub created_at: OffsetDateTime,
}

#[async_trait]
pub trait BooksRepo: Send + Sync {
    /// Insert a book; `RepoError::Duplicate` when the isbn is already taken.
    async fn insert_book(&self, book: NewBook) -> Result<BookRecord, RepoError>;

    async fn find_book(&self, id: i64) -> Result<Option<BookRecord>, RepoError>;

    async fn find_book_by_isbn(&self, isbn: &str) -> Result<Option<BookRecord>, RepoError>;

    /// All books in insertion order.
    async fn list_books(&self) -> Result<Vec<BookRecord>, RepoError>;
}

#[async_trait]
pub trait ReviewsRepo: Send + Sync {
    /// Insert a review; `RepoError::ForeignKey` when the book does not exist.
    async fn insert_review(&self, review: NewReview) -> Result<ReviewRecord, RepoError>;

    /// Reviews for one book, newest first.
    async fn list_reviews_for_book(&self, book_id: i64) -> Result<Vec<ReviewRecord>, RepoError>;
}
