//! Cache key definitions.
//!
//! Two logical collections are cached, each under its own key. There is no
//! per-book key: single-book reads always go to the store. The book list and
//! per-book review lists are invalidated independently of each other.

use std::fmt;

const BOOKS_KEY: &str = "books:all";
const REVIEWS_KEY_PREFIX: &str = "reviews:book:";

/// Identifies a cached collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The full book listing (`books:all`).
    Books,
    /// The review listing for one book (`reviews:book:<id>`).
    ReviewsForBook(i64),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Books => f.write_str(BOOKS_KEY),
            CacheKey::ReviewsForBook(book_id) => {
                write!(f, "{REVIEWS_KEY_PREFIX}{book_id}")
            }
        }
    }
}
