//! Persistent records for the two entities the service manages.

use time::OffsetDateTime;

/// A book as stored in the `books` table.
///
/// `id` is assigned by the store; `created_at` is set once at creation and
/// never updated.
#[derive(Debug, Clone, PartialEq)]
pub struct BookRecord {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub publication_year: Option<i64>,
    pub created_at: OffsetDateTime,
}

/// A review as stored in the `reviews` table.
///
/// A review never exists without its book: `book_id` carries a foreign key
/// with cascade delete, so deleting a book removes its reviews.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRecord {
    pub id: i64,
    pub book_id: i64,
    pub reviewer_name: String,
    pub rating: i64,
    pub review_text: Option<String>,
    pub created_at: OffsetDateTime,
}
