use async_trait::async_trait;
use time::OffsetDateTime;

use crate::application::repos::{BooksRepo, NewBook, RepoError};
use crate::domain::entities::BookRecord;

use super::{SqliteRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct BookRow {
    id: i64,
    title: String,
    author: String,
    isbn: Option<String>,
    publication_year: Option<i64>,
    created_at: OffsetDateTime,
}

impl From<BookRow> for BookRecord {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            author: row.author,
            isbn: row.isbn,
            publication_year: row.publication_year,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl BooksRepo for SqliteRepositories {
    async fn insert_book(&self, book: NewBook) -> Result<BookRecord, RepoError> {
        let result = sqlx::query(
            "INSERT INTO books (title, author, isbn, publication_year, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.publication_year)
        .bind(book.created_at)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(BookRecord {
            id: result.last_insert_rowid(),
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            publication_year: book.publication_year,
            created_at: book.created_at,
        })
    }

    async fn find_book(&self, id: i64) -> Result<Option<BookRecord>, RepoError> {
        let row: Option<BookRow> = sqlx::query_as(
            "SELECT id, title, author, isbn, publication_year, created_at \
             FROM books WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(BookRecord::from))
    }

    async fn find_book_by_isbn(&self, isbn: &str) -> Result<Option<BookRecord>, RepoError> {
        let row: Option<BookRow> = sqlx::query_as(
            "SELECT id, title, author, isbn, publication_year, created_at \
             FROM books WHERE isbn = ?1",
        )
        .bind(isbn)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(BookRecord::from))
    }

    async fn list_books(&self) -> Result<Vec<BookRecord>, RepoError> {
        let rows: Vec<BookRow> = sqlx::query_as(
            "SELECT id, title, author, isbn, publication_year, created_at \
             FROM books ORDER BY id",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(BookRecord::from).collect())
    }
}
