//! HTTP surface: router, handlers, wire models and error mapping.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::application::books::BookService;
use crate::application::reviews::ReviewService;
use crate::cache::SideCache;
use crate::infra::db::SqliteRepositories;

pub mod error;
mod handlers;
pub mod models;

#[derive(Clone)]
pub struct AppState {
    pub books: Arc<BookService>,
    pub reviews: Arc<ReviewService>,
    pub db: Arc<SqliteRepositories>,
    pub cache: Arc<SideCache>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/books", get(handlers::list_books).post(handlers::add_book))
        .route(
            "/books/{book_id}/reviews",
            get(handlers::list_book_reviews).post(handlers::add_book_review),
        )
        .route("/health", get(handlers::health))
        .with_state(state)
}
