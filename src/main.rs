use std::{process, sync::Arc};

use recensio::{
    application::{
        books::BookService,
        error::AppError,
        repos::{BooksRepo, ReviewsRepo},
        reviews::ReviewService,
        seed,
    },
    cache::{CacheBackend, MemoryBackend, RedisBackend, SideCache},
    config,
    infra::{
        db::SqliteRepositories,
        error::InfraError,
        http::{self, AppState},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(config::ServeArgs::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Seed(_) => run_seed(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let context = build_application_context(&settings, true).await?;

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(target = "recensio::serve", addr, "Listening");

    let router = http::build_router(context.state);
    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn run_seed(settings: config::Settings) -> Result<(), AppError> {
    // Seeding runs against the store directly; a live cache would only be
    // invalidated key by key, and the memory backend starts empty anyway.
    let context = build_application_context(&settings, false).await?;
    seed::run(&context.state.books, &context.state.reviews).await
}

struct ApplicationContext {
    state: AppState,
}

async fn build_application_context(
    settings: &config::Settings,
    use_redis: bool,
) -> Result<ApplicationContext, AppError> {
    let repositories = Arc::new(
        SqliteRepositories::connect(&settings.database.url, settings.database.max_connections)
            .await?,
    );
    repositories.run_migrations().await?;

    let backend: Arc<dyn CacheBackend> = if use_redis {
        match RedisBackend::connect(&settings.cache.url).await {
            Ok(redis) => Arc::new(redis),
            Err(err) => {
                warn!(
                    target = "recensio::cache",
                    error = %err,
                    "Redis unavailable, falling back to in-process cache"
                );
                Arc::new(MemoryBackend::new())
            }
        }
    } else {
        Arc::new(MemoryBackend::new())
    };

    let cache = Arc::new(SideCache::new(backend, settings.cache.ttl));

    let books_repo: Arc<dyn BooksRepo> = repositories.clone();
    let reviews_repo: Arc<dyn ReviewsRepo> = repositories.clone();

    let books = Arc::new(BookService::new(books_repo.clone(), cache.clone()));
    let reviews = Arc::new(ReviewService::new(books_repo, reviews_repo, cache.clone()));

    Ok(ApplicationContext {
        state: AppState {
            books,
            reviews,
            db: repositories,
            cache,
        },
    })
}
