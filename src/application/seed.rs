//! Demo data for local development.
//!
//! `recensio seed` pushes a handful of classics and reviews through the
//! normal service layer, so validation and cache invalidation behave exactly
//! as they do for real requests. Re-seeding an existing database skips the
//! books whose isbn is already present.

use serde_json::json;
use tracing::{info, warn};

use super::books::{AddBook, BookError, BookService};
use super::error::AppError;
use super::reviews::{AddReview, ReviewService};

const SAMPLE_BOOKS: &[(&str, &str, &str, i64)] = &[
    ("The Great Gatsby", "F. Scott Fitzgerald", "978-0-7432-7356-5", 1925),
    ("To Kill a Mockingbird", "Harper Lee", "978-0-06-112008-4", 1960),
    ("1984", "George Orwell", "978-0-452-28423-4", 1949),
    ("Pride and Prejudice", "Jane Austen", "978-0-14-143951-8", 1813),
    ("The Catcher in the Rye", "J.D. Salinger", "978-0-316-76948-0", 1951),
];

const SAMPLE_REVIEWS: &[(&str, i64, &str)] = &[
    ("Alice Johnson", 5, "Absolutely magnificent! A timeless classic."),
    ("Bob Smith", 4, "Great book, very engaging story."),
    ("Carol Davis", 5, "One of the best books I've ever read."),
    ("David Wilson", 3, "Good book but a bit slow in places."),
    ("Emma Brown", 4, "Beautiful prose and compelling characters."),
    ("Frank Miller", 5, "Incredible storytelling."),
];

const REVIEWS_PER_BOOK: usize = 3;

pub async fn run(books: &BookService, reviews: &ReviewService) -> Result<(), AppError> {
    let mut created_books = 0usize;
    let mut created_reviews = 0usize;
    let mut review_cursor = 0usize;

    for (title, author, isbn, year) in SAMPLE_BOOKS {
        let book = match books
            .add_book(AddBook {
                title: Some((*title).to_string()),
                author: Some((*author).to_string()),
                isbn: Some((*isbn).to_string()),
                publication_year: Some(json!(year)),
            })
            .await
        {
            Ok(book) => book,
            Err(BookError::DuplicateIsbn(isbn)) => {
                warn!(target = "recensio::seed", isbn, "Book already seeded, skipping");
                continue;
            }
            Err(other) => return Err(other.into()),
        };
        created_books += 1;

        for _ in 0..REVIEWS_PER_BOOK {
            let (reviewer, rating, text) = SAMPLE_REVIEWS[review_cursor % SAMPLE_REVIEWS.len()];
            review_cursor += 1;

            reviews
                .add_review(
                    book.id,
                    AddReview {
                        reviewer_name: Some(reviewer.to_string()),
                        rating: Some(json!(rating)),
                        review_text: Some(text.to_string()),
                    },
                )
                .await
                .map_err(AppError::from)?;
            created_reviews += 1;
        }
    }

    info!(
        target = "recensio::seed",
        books = created_books,
        reviews = created_reviews,
        "Seed completed"
    );

    Ok(())
}
