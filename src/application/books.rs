//! Book listing and creation.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;

use crate::cache::{CacheKey, SideCache, Source};

use super::fields::{integer_value, optional_text, required_text};
use super::repos::{BooksRepo, NewBook, RepoError};
use super::views::BookView;

#[derive(Debug, Error)]
pub enum BookError {
    #[error("{0}")]
    Validation(String),
    #[error("Book with ISBN '{0}' already exists")]
    DuplicateIsbn(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl BookError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Raw fields of a book submission; validation happens here, not at the
/// HTTP boundary, so every caller (handlers, the seeder) gets the same rules.
#[derive(Debug, Clone, Default)]
pub struct AddBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub publication_year: Option<Value>,
}

pub struct BookService {
    books: Arc<dyn BooksRepo>,
    cache: Arc<SideCache>,
}

impl BookService {
    pub fn new(books: Arc<dyn BooksRepo>, cache: Arc<SideCache>) -> Self {
        Self { books, cache }
    }

    /// List all books through the side cache.
    pub async fn list_books(&self) -> Result<(Vec<BookView>, Source), RepoError> {
        self.cache
            .read_through(CacheKey::Books, || async {
                let records = self.books.list_books().await?;
                Ok(records.into_iter().map(BookView::from).collect::<Vec<_>>())
            })
            .await
    }

    /// Validate and insert a book, then invalidate the book listing.
    ///
    /// The isbn pre-check gives a friendly error on the common path; the
    /// UNIQUE constraint at the store is the authoritative arbiter when two
    /// writers race past the check.
    pub async fn add_book(&self, command: AddBook) -> Result<BookView, BookError> {
        let title = required_text(command.title.as_deref())
            .ok_or_else(|| BookError::validation("'title' is required and cannot be empty"))?;
        let author = required_text(command.author.as_deref())
            .ok_or_else(|| BookError::validation("'author' is required and cannot be empty"))?;
        let isbn = optional_text(command.isbn);
        let publication_year = validate_publication_year(command.publication_year.as_ref())?;

        if let Some(isbn) = isbn.as_deref() {
            if self.books.find_book_by_isbn(isbn).await?.is_some() {
                return Err(BookError::DuplicateIsbn(isbn.to_string()));
            }
        }

        let conflict_isbn = isbn.clone().unwrap_or_default();
        let record = self
            .books
            .insert_book(NewBook {
                title,
                author,
                isbn,
                publication_year,
                created_at: OffsetDateTime::now_utc(),
            })
            .await
            .map_err(|err| match err {
                RepoError::Duplicate { .. } => BookError::DuplicateIsbn(conflict_isbn),
                other => BookError::from(other),
            })?;

        // Invalidate only the book listing; review collections are cached
        // independently and a new book cannot have reviews yet.
        self.cache.invalidate(CacheKey::Books).await;

        Ok(BookView::from(record))
    }
}

fn validate_publication_year(value: Option<&Value>) -> Result<Option<i64>, BookError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value {
        Value::Null => return Ok(None),
        Value::String(text) if text.trim().is_empty() => return Ok(None),
        _ => {}
    }

    let year = integer_value(value)
        .ok_or_else(|| BookError::validation("Publication year must be a valid integer"))?;

    let max_year = i64::from(OffsetDateTime::now_utc().year()) + 1;
    if !(0..=max_year).contains(&year) {
        return Err(BookError::validation("Invalid publication year"));
    }

    Ok(Some(year))
}
