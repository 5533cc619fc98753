//! HTTP handlers for the books module.
//!
//! Lookups always answer 200 with a (possibly empty) `books` array; 404 is
//! reserved for update and delete requests whose target does not exist.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use catalog_http::AppError;
use serde::Serialize;

use super::catalog::{BookCatalog, CatalogError};
use super::models::{Book, BookDraft, BookPatch};
use super::validation::{parse_genre, parse_release_year};

#[derive(Debug, Serialize)]
pub struct BookCreated {
    pub message: &'static str,
    pub book: Book,
}

#[derive(Debug, Serialize)]
pub struct BooksFetched {
    pub message: &'static str,
    pub books: Vec<Book>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookUpdated {
    pub message: &'static str,
    pub updated_book: Book,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDeleted {
    pub message: &'static str,
    pub deleted_book: Book,
}

/// Build the books router; paths are relative to the module mount point
pub fn router(catalog: BookCatalog) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/health", get(health_check))
        .route("/title/{title}", get(find_by_title).post(update_by_title))
        .route("/author/{author}", get(find_by_author))
        .route("/genre/{genre}", get(find_by_genre))
        .route("/releaseYear/{year}", get(find_by_release_year))
        .route("/id/{id}", post(update_by_id).delete(delete_by_id))
        .with_state(catalog)
}

/// Map a catalog failure to a response; `failure` is what clients see for
/// store-side errors
fn reject(err: CatalogError, failure: &'static str) -> AppError {
    match err {
        CatalogError::Validation(invalid) => {
            AppError::validation(invalid.details(), invalid.to_string())
        }
        missing @ CatalogError::NotFound { .. } => AppError::not_found(missing.to_string()),
        other => AppError::internal(other, failure),
    }
}

fn fetched(message: &'static str, books: Vec<Book>) -> Json<BooksFetched> {
    Json(BooksFetched { message, books })
}

async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn create_book(
    State(catalog): State<BookCatalog>,
    payload: Result<Json<BookDraft>, JsonRejection>,
) -> Result<Json<BookCreated>, AppError> {
    let Json(draft) = payload?;
    let book = catalog
        .create(draft)
        .await
        .map_err(|e| reject(e, "Failed to create new book data"))?;

    Ok(Json(BookCreated {
        message: "Book created successfully.",
        book,
    }))
}

async fn list_books(State(catalog): State<BookCatalog>) -> Result<Json<BooksFetched>, AppError> {
    let books = catalog
        .list_all()
        .await
        .map_err(|e| reject(e, "Failed to get books."))?;
    Ok(fetched("Books fetched successfully.", books))
}

async fn find_by_title(
    State(catalog): State<BookCatalog>,
    Path(title): Path<String>,
) -> Result<Json<BooksFetched>, AppError> {
    let books = catalog
        .find_by_title(&title)
        .await
        .map_err(|e| reject(e, "Failed to fetch books by title."))?;
    Ok(fetched("Books fetched successfully by title", books))
}

async fn find_by_author(
    State(catalog): State<BookCatalog>,
    Path(author): Path<String>,
) -> Result<Json<BooksFetched>, AppError> {
    let books = catalog
        .find_by_author(&author)
        .await
        .map_err(|e| reject(e, "Failed to fetch books by author."))?;
    Ok(fetched("Books successfully fetched by author name.", books))
}

async fn find_by_genre(
    State(catalog): State<BookCatalog>,
    Path(genre): Path<String>,
) -> Result<Json<BooksFetched>, AppError> {
    let genre = parse_genre(&genre).map_err(|e| reject(e.into(), "Failed to fetch books by genre."))?;
    let books = catalog
        .find_by_genre(genre)
        .await
        .map_err(|e| reject(e, "Failed to fetch books by genre."))?;
    Ok(fetched("Books successfully fetched by genre.", books))
}

async fn find_by_release_year(
    State(catalog): State<BookCatalog>,
    Path(year): Path<String>,
) -> Result<Json<BooksFetched>, AppError> {
    let year = parse_release_year(&year)
        .map_err(|e| reject(e.into(), "Failed to fetch books by release year."))?;
    let books = catalog
        .find_by_release_year(year)
        .await
        .map_err(|e| reject(e, "Failed to fetch books by release year."))?;
    Ok(fetched("Successfully fetched books by release year.", books))
}

async fn update_by_id(
    State(catalog): State<BookCatalog>,
    Path(id): Path<String>,
    payload: Result<Json<BookPatch>, JsonRejection>,
) -> Result<Json<BookUpdated>, AppError> {
    let Json(patch) = payload?;
    let updated_book = catalog
        .update_by_id(&id, patch)
        .await
        .map_err(|e| reject(e, "Failed to update book by Id."))?;

    Ok(Json(BookUpdated {
        message: "Successfully updated the book by its Id.",
        updated_book,
    }))
}

async fn update_by_title(
    State(catalog): State<BookCatalog>,
    Path(title): Path<String>,
    payload: Result<Json<BookPatch>, JsonRejection>,
) -> Result<Json<BookUpdated>, AppError> {
    let Json(patch) = payload?;
    let updated_book = catalog
        .update_by_title(&title, patch)
        .await
        .map_err(|e| reject(e, "Failed to update book by title."))?;

    Ok(Json(BookUpdated {
        message: "Successfully updated the book by its title.",
        updated_book,
    }))
}

async fn delete_by_id(
    State(catalog): State<BookCatalog>,
    Path(id): Path<String>,
) -> Result<Json<BookDeleted>, AppError> {
    let deleted_book = catalog
        .delete_by_id(&id)
        .await
        .map_err(|e| reject(e, "Failed to delete book by Id."))?;

    Ok(Json(BookDeleted {
        message: "Book successfully deleted by Id.",
        deleted_book,
    }))
}
