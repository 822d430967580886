//! Cache-aside behavior observed through the HTTP surface: the `source` tag,
//! invalidation on write, and the independence of the two key families.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use recensio::application::books::BookService;
use recensio::application::repos::{BooksRepo, ReviewsRepo};
use recensio::application::reviews::ReviewService;
use recensio::cache::{MemoryBackend, SideCache};
use recensio::infra::db::SqliteRepositories;
use recensio::infra::http::{AppState, build_router};

async fn test_app_with_ttl(ttl: Duration) -> Router {
    let repos = Arc::new(
        SqliteRepositories::connect("sqlite::memory:", NonZeroU32::new(1).unwrap())
            .await
            .unwrap(),
    );
    repos.run_migrations().await.unwrap();

    let cache = Arc::new(SideCache::new(Arc::new(MemoryBackend::new()), ttl));

    let books_repo: Arc<dyn BooksRepo> = repos.clone();
    let reviews_repo: Arc<dyn ReviewsRepo> = repos.clone();
    let books = Arc::new(BookService::new(books_repo.clone(), cache.clone()));
    let reviews = Arc::new(ReviewService::new(books_repo, reviews_repo, cache.clone()));

    build_router(AppState {
        books,
        reviews,
        db: repos,
        cache,
    })
}

async fn test_app() -> Router {
    test_app_with_ttl(Duration::from_secs(10)).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

#[tokio::test]
async fn second_read_is_served_from_the_cache() {
    let app = test_app().await;

    let (_, body) = get(&app, "/books").await;
    assert_eq!(body["source"], "database");

    let (_, body) = get(&app, "/books").await;
    assert_eq!(body["source"], "cache");
}

#[tokio::test]
async fn adding_a_book_invalidates_the_book_listing() {
    let app = test_app().await;

    get(&app, "/books").await;
    let (_, body) = get(&app, "/books").await;
    assert_eq!(body["source"], "cache");

    post_json(
        &app,
        "/books",
        json!({"title": "1984", "author": "George Orwell"}),
    )
    .await;

    // The stale listing was dropped; the fresh one includes the new book.
    let (_, body) = get(&app, "/books").await;
    assert_eq!(body["source"], "database");
    assert_eq!(body["books"].as_array().unwrap().len(), 1);

    let (_, body) = get(&app, "/books").await;
    assert_eq!(body["source"], "cache");
}

#[tokio::test]
async fn adding_a_review_invalidates_only_that_books_reviews() {
    let app = test_app().await;

    post_json(
        &app,
        "/books",
        json!({"title": "1984", "author": "George Orwell"}),
    )
    .await;
    post_json(
        &app,
        "/books",
        json!({"title": "Animal Farm", "author": "George Orwell"}),
    )
    .await;

    // Warm every key.
    get(&app, "/books").await;
    get(&app, "/books/1/reviews").await;
    get(&app, "/books/2/reviews").await;

    post_json(
        &app,
        "/books/1/reviews",
        json!({"reviewer_name": "John Doe", "rating": 5}),
    )
    .await;

    // Book 1's reviews reload, book 2's and the book listing stay cached.
    let (_, body) = get(&app, "/books/1/reviews").await;
    assert_eq!(body["source"], "database");
    assert_eq!(body["reviews"].as_array().unwrap().len(), 1);

    let (_, body) = get(&app, "/books/2/reviews").await;
    assert_eq!(body["source"], "cache");

    let (_, body) = get(&app, "/books").await;
    assert_eq!(body["source"], "cache");
}

#[tokio::test]
async fn adding_a_book_leaves_cached_reviews_alone() {
    let app = test_app().await;

    post_json(
        &app,
        "/books",
        json!({"title": "1984", "author": "George Orwell"}),
    )
    .await;

    get(&app, "/books/1/reviews").await;
    let (_, body) = get(&app, "/books/1/reviews").await;
    assert_eq!(body["source"], "cache");

    post_json(
        &app,
        "/books",
        json!({"title": "Animal Farm", "author": "George Orwell"}),
    )
    .await;

    let (_, body) = get(&app, "/books/1/reviews").await;
    assert_eq!(body["source"], "cache");
}

#[tokio::test]
async fn rejected_writes_do_not_invalidate() {
    let app = test_app().await;

    post_json(
        &app,
        "/books",
        json!({"title": "1984", "author": "George Orwell", "isbn": "978-0-452-28423-4"}),
    )
    .await;

    get(&app, "/books").await;
    let (_, body) = get(&app, "/books").await;
    assert_eq!(body["source"], "cache");

    // A failed insert leaves the cached listing untouched.
    let (status, _) = post_json(
        &app,
        "/books",
        json!({"title": "1984", "author": "George Orwell", "isbn": "978-0-452-28423-4"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = get(&app, "/books").await;
    assert_eq!(body["source"], "cache");
}

#[tokio::test]
async fn entries_expire_after_the_ttl() {
    let app = test_app_with_ttl(Duration::ZERO).await;

    let (_, body) = get(&app, "/books").await;
    assert_eq!(body["source"], "database");

    // With a zero lifetime every entry is already expired on the next read.
    let (_, body) = get(&app, "/books").await;
    assert_eq!(body["source"], "database");
}
