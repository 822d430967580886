//! JSON-facing projections of the domain records.
//!
//! These views are both the HTTP response shapes and the payloads stored in
//! the cache, so they derive `Deserialize` as well as `Serialize`.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::entities::{BookRecord, ReviewRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookView {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub publication_year: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<BookRecord> for BookView {
    fn from(record: BookRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            author: record.author,
            isbn: record.isbn,
            publication_year: record.publication_year,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewView {
    pub id: i64,
    pub book_id: i64,
    pub reviewer_name: String,
    pub rating: i64,
    pub review_text: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<ReviewRecord> for ReviewView {
    fn from(record: ReviewRecord) -> Self {
        Self {
            id: record.id,
            book_id: record.book_id,
            reviewer_name: record.reviewer_name,
            rating: record.rating,
            review_text: record.review_text,
            created_at: record.created_at,
        }
    }
}
