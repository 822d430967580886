//! Wire types for the JSON API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::books::AddBook;
use crate::application::reviews::{AddReview, BookReviews};
use crate::application::views::{BookView, ReviewView};
use crate::cache::Source;

/// Body of `POST /books`. Fields arrive untyped so validation can produce
/// the API's own messages instead of a deserializer rejection.
#[derive(Debug, Deserialize)]
pub struct BookCreateRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub publication_year: Option<Value>,
}

impl From<BookCreateRequest> for AddBook {
    fn from(request: BookCreateRequest) -> Self {
        Self {
            title: request.title,
            author: request.author,
            isbn: request.isbn,
            publication_year: request.publication_year,
        }
    }
}

/// Body of `POST /books/{book_id}/reviews`.
#[derive(Debug, Deserialize)]
pub struct ReviewCreateRequest {
    pub reviewer_name: Option<String>,
    pub rating: Option<Value>,
    pub review_text: Option<String>,
}

impl From<ReviewCreateRequest> for AddReview {
    fn from(request: ReviewCreateRequest) -> Self {
        Self {
            reviewer_name: request.reviewer_name,
            rating: request.rating,
            review_text: request.review_text,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BooksResponse {
    pub books: Vec<BookView>,
    pub source: Source,
}

#[derive(Debug, Serialize)]
pub struct BookCreatedResponse {
    pub message: &'static str,
    pub book: BookView,
}

#[derive(Debug, Serialize)]
pub struct ReviewsResponse {
    pub book_id: i64,
    pub book_title: String,
    pub reviews: Vec<ReviewView>,
    pub source: Source,
}

impl From<BookReviews> for ReviewsResponse {
    fn from(listing: BookReviews) -> Self {
        Self {
            book_id: listing.book_id,
            book_title: listing.book_title,
            reviews: listing.reviews,
            source: listing.source,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewCreatedResponse {
    pub message: &'static str,
    pub review: ReviewView,
}
