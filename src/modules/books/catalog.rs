//! Catalog operations over the `books` collection.

use std::sync::Arc;

use catalog_db::{Collection, Document, Filter, Store, StoreError};
use serde::Serialize;
use thiserror::Error;

use super::models::{Book, BookDraft, BookPatch, Genre};
use super::validation::ValidationError;

/// Collection holding book documents.
pub const COLLECTION: &str = "books";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no book with {field} '{value}'")]
    NotFound { field: &'static str, value: String },

    #[error("document store operation failed")]
    Store(#[from] StoreError),

    #[error("stored book document is malformed")]
    Decode(#[from] serde_json::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Book catalog backed by a document store collection.
#[derive(Clone)]
pub struct BookCatalog {
    books: Arc<dyn Collection>,
}

impl BookCatalog {
    pub fn new(store: &Store) -> Self {
        Self {
            books: store.collection(COLLECTION),
        }
    }

    /// Validate and insert a new book
    pub async fn create(&self, draft: BookDraft) -> CatalogResult<Book> {
        let book = draft.validate()?;
        let stored = self.books.insert_one(to_document(&book)?).await?;
        let book = decode(stored)?;

        tracing::debug!(id = %book.id, title = %book.title, "book created");
        Ok(book)
    }

    /// Every book in store order
    pub async fn list_all(&self) -> CatalogResult<Vec<Book>> {
        self.find(Filter::all()).await
    }

    pub async fn find_by_title(&self, title: &str) -> CatalogResult<Vec<Book>> {
        self.find(Filter::eq("title", title)).await
    }

    pub async fn find_by_author(&self, author: &str) -> CatalogResult<Vec<Book>> {
        self.find(Filter::eq("author", author)).await
    }

    /// Books whose genre list contains `genre`
    pub async fn find_by_genre(&self, genre: Genre) -> CatalogResult<Vec<Book>> {
        self.find(Filter::eq("genre", genre.as_str())).await
    }

    pub async fn find_by_release_year(&self, year: i32) -> CatalogResult<Vec<Book>> {
        self.find(Filter::eq("publishedYear", year)).await
    }

    /// Patch the book with the given id and return it as updated
    pub async fn update_by_id(&self, id: &str, patch: BookPatch) -> CatalogResult<Book> {
        let changes = to_document(&patch.validate()?)?;

        match self.books.find_by_id_and_update(id, changes).await? {
            Some(document) => decode(document),
            None => Err(CatalogError::NotFound {
                field: "id",
                value: id.to_string(),
            }),
        }
    }

    /// Patch the first book (in store order) titled `title`.
    ///
    /// Titles are not unique: when several books share a title only the
    /// first one is changed.
    pub async fn update_by_title(&self, title: &str, patch: BookPatch) -> CatalogResult<Book> {
        let changes = to_document(&patch.validate()?)?;

        match self
            .books
            .find_one_and_update(&Filter::eq("title", title), changes)
            .await?
        {
            Some(document) => {
                let book = decode(document)?;
                tracing::debug!(id = %book.id, %title, "updated first book matching title");
                Ok(book)
            }
            None => Err(CatalogError::NotFound {
                field: "title",
                value: title.to_string(),
            }),
        }
    }

    /// Remove the book with the given id, returning it as it was
    pub async fn delete_by_id(&self, id: &str) -> CatalogResult<Book> {
        match self.books.find_by_id_and_delete(id).await? {
            Some(document) => decode(document),
            None => Err(CatalogError::NotFound {
                field: "id",
                value: id.to_string(),
            }),
        }
    }

    async fn find(&self, filter: Filter) -> CatalogResult<Vec<Book>> {
        self.books
            .find(&filter)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }
}

fn to_document<T: Serialize>(value: &T) -> CatalogResult<Document> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(document) => Ok(document),
        _ => Err(StoreError::NotAnObject.into()),
    }
}

fn decode(document: Document) -> CatalogResult<Book> {
    Ok(serde_json::from_value(serde_json::Value::Object(document))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_db::MemoryStore;
    use std::collections::HashSet;

    fn catalog() -> (Store, BookCatalog) {
        let store: Store = Arc::new(MemoryStore::new("test"));
        let catalog = BookCatalog::new(&store);
        (store, catalog)
    }

    fn draft(title: &str, author: &str, year: i32, genre: &[&str]) -> BookDraft {
        BookDraft {
            title: Some(title.to_string()),
            author: Some(author.to_string()),
            published_year: Some(year),
            genre: Some(genre.iter().map(|g| g.to_string()).collect()),
            ..BookDraft::default()
        }
    }

    fn rating(value: f64) -> BookPatch {
        BookPatch {
            rating: Some(value),
            ..BookPatch::default()
        }
    }

    #[tokio::test]
    async fn create_then_list_returns_defaulted_book() {
        let (_store, catalog) = catalog();

        let created = catalog
            .create(draft("Dune", "Herbert", 1965, &["Non-fiction"]))
            .await
            .unwrap();

        let books = catalog.list_all().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0], created);
        assert!(!created.id.is_empty());
        assert_eq!(created.rating, 0.0);
        assert_eq!(created.genre, vec![Genre::NonFiction]);
    }

    #[tokio::test]
    async fn repeated_creates_get_distinct_ids() {
        let (_store, catalog) = catalog();

        let mut ids = HashSet::new();
        for _ in 0..20 {
            let book = catalog
                .create(draft("Dune", "Herbert", 1965, &["Non-fiction"]))
                .await
                .unwrap();
            assert!(ids.insert(book.id));
        }
    }

    #[tokio::test]
    async fn invalid_create_persists_nothing() {
        let (_store, catalog) = catalog();

        let missing_genre = BookDraft {
            genre: None,
            ..draft("Dune", "Herbert", 1965, &[])
        };
        let out_of_range = BookDraft {
            rating: Some(9.0),
            ..draft("Dune", "Herbert", 1965, &["Business"])
        };

        for candidate in [BookDraft::default(), missing_genre, out_of_range] {
            let err = catalog.create(candidate).await.unwrap_err();
            assert!(matches!(err, CatalogError::Validation(_)));
        }
        assert!(catalog.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let (_store, catalog) = catalog();
        assert!(catalog.list_all().await.unwrap().is_empty());
        assert!(catalog.find_by_title("Dune").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn title_and_author_match_exactly() {
        let (_store, catalog) = catalog();
        catalog
            .create(draft("Dune", "Herbert", 1965, &["Non-fiction"]))
            .await
            .unwrap();
        catalog
            .create(draft("Dune Messiah", "Herbert", 1969, &["Non-fiction"]))
            .await
            .unwrap();

        let titles: Vec<_> = catalog
            .find_by_title("Dune")
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["Dune"]);

        assert!(catalog.find_by_title("dune").await.unwrap().is_empty());
        assert_eq!(catalog.find_by_author("Herbert").await.unwrap().len(), 2);
        assert!(catalog.find_by_author("Herb").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn genre_matches_any_tag() {
        let (_store, catalog) = catalog();
        let memoir = catalog
            .create(draft("Shoe Dog", "Phil Knight", 2016, &["Autobiography", "Business"]))
            .await
            .unwrap();

        assert_eq!(catalog.find_by_genre(Genre::Business).await.unwrap(), vec![memoir.clone()]);
        assert_eq!(catalog.find_by_genre(Genre::Autobiography).await.unwrap(), vec![memoir]);
        assert!(catalog.find_by_genre(Genre::NonFiction).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn release_year_matches_exactly() {
        let (_store, catalog) = catalog();
        catalog
            .create(draft("Dune", "Herbert", 1965, &["Non-fiction"]))
            .await
            .unwrap();

        assert_eq!(catalog.find_by_release_year(1965).await.unwrap().len(), 1);
        assert!(catalog.find_by_release_year(1966).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_by_id_changes_only_patched_fields() {
        let (_store, catalog) = catalog();
        let original = catalog
            .create(draft("Dune", "Herbert", 1965, &["Non-fiction"]))
            .await
            .unwrap();

        let updated = catalog.update_by_id(&original.id, rating(4.0)).await.unwrap();

        assert_eq!(updated.rating, 4.0);
        assert_eq!(
            updated,
            Book {
                rating: 4.0,
                ..original
            }
        );
    }

    #[tokio::test]
    async fn update_rejects_invalid_patch_without_writing() {
        let (_store, catalog) = catalog();
        let original = catalog
            .create(draft("Dune", "Herbert", 1965, &["Non-fiction"]))
            .await
            .unwrap();

        let err = catalog.update_by_id(&original.id, rating(6.0)).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert_eq!(catalog.list_all().await.unwrap(), vec![original]);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let (_store, catalog) = catalog();
        let err = catalog.update_by_id("missing", rating(4.0)).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { field: "id", .. }));
    }

    #[tokio::test]
    async fn update_by_title_touches_first_match_only() {
        let (_store, catalog) = catalog();
        let first = catalog
            .create(draft("Echoes", "Alpha", 2001, &["Business"]))
            .await
            .unwrap();
        let second = catalog
            .create(draft("Echoes", "Beta", 2002, &["Business"]))
            .await
            .unwrap();

        let updated = catalog.update_by_title("Echoes", rating(5.0)).await.unwrap();
        assert_eq!(updated.id, first.id);

        let books = catalog.find_by_title("Echoes").await.unwrap();
        assert_eq!(books[0].rating, 5.0);
        assert_eq!(books[1], second);

        let err = catalog.update_by_title("Silence", rating(1.0)).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { field: "title", .. }));
    }

    #[tokio::test]
    async fn delete_then_delete_again_is_not_found() {
        let (_store, catalog) = catalog();
        let book = catalog
            .create(draft("Dune", "Herbert", 1965, &["Non-fiction"]))
            .await
            .unwrap();

        let deleted = catalog.delete_by_id(&book.id).await.unwrap();
        assert_eq!(deleted, book);
        assert!(catalog.find_by_title("Dune").await.unwrap().is_empty());

        let err = catalog.delete_by_id(&book.id).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { .. }));
    }

    #[tokio::test]
    async fn store_failures_surface_as_errors() {
        let (store, catalog) = catalog();
        store.close().await.unwrap();

        assert!(matches!(
            catalog.list_all().await.unwrap_err(),
            CatalogError::Store(StoreError::Closed)
        ));
        assert!(matches!(
            catalog
                .create(draft("Dune", "Herbert", 1965, &["Non-fiction"]))
                .await
                .unwrap_err(),
            CatalogError::Store(StoreError::Closed)
        ));
    }
}
