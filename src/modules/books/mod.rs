pub mod catalog;
pub mod models;
pub mod routes;
pub mod validation;

use async_trait::async_trait;
use axum::Router;
use catalog_db::Store;
use catalog_kernel::{InitCtx, Module};
use serde_json::json;

use catalog::BookCatalog;

/// Books module: the catalog's HTTP surface over the `books` collection
pub struct BooksModule {
    catalog: BookCatalog,
}

impl BooksModule {
    pub fn new(store: &Store) -> Self {
        Self {
            catalog: BookCatalog::new(store),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            backend = ctx.store.backend(),
            collection = catalog::COLLECTION,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.catalog.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

fn json_content(schema: serde_json::Value) -> serde_json::Value {
    json!({ "application/json": { "schema": schema } })
}

fn response(description: &str, schema: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": json_content(json!({ "$ref": format!("#/components/schemas/{}", schema) }))
    })
}

fn path_param(name: &str, schema_type: &str) -> serde_json::Value {
    json!({
        "name": name,
        "in": "path",
        "required": true,
        "schema": { "type": schema_type }
    })
}

fn lookup(summary: &str, param: serde_json::Value) -> serde_json::Value {
    json!({
        "parameters": [param],
        "get": {
            "summary": summary,
            "tags": ["Books"],
            "responses": {
                "200": response("Matching books; empty when nothing matches", "BookList"),
                "422": response("Invalid lookup parameter", "ErrorResponse"),
                "500": response("Store failure", "ErrorResponse")
            }
        }
    })
}

fn patch_operation(summary: &str) -> serde_json::Value {
    json!({
        "summary": summary,
        "tags": ["Books"],
        "requestBody": {
            "required": true,
            "content": json_content(json!({ "$ref": "#/components/schemas/BookPatch" }))
        },
        "responses": {
            "200": response("Book after the update", "BookUpdated"),
            "404": response("No matching book", "ErrorResponse"),
            "422": response("Invalid patch", "ErrorResponse"),
            "500": response("Store failure", "ErrorResponse")
        }
    })
}

fn book_properties() -> serde_json::Value {
    json!({
        "title": { "type": "string" },
        "author": { "type": "string" },
        "publishedYear": { "type": "integer" },
        "genre": {
            "type": "array",
            "items": { "$ref": "#/components/schemas/Genre" }
        },
        "language": { "type": "string" },
        "country": { "type": "string" },
        "rating": { "type": "number", "minimum": 0, "maximum": 5, "default": 0 },
        "summary": { "type": "string" },
        "coverImageUrl": { "type": "string", "format": "uri" }
    })
}

/// OpenAPI paths and schemas contributed by this module
fn openapi_fragment() -> serde_json::Value {
    let mut book_properties_with_id = book_properties();
    book_properties_with_id["id"] = json!({ "type": "string", "description": "Store-assigned identifier" });

    let mut title_path = lookup("Find books by exact title", path_param("title", "string"));
    title_path["post"] = patch_operation("Update the first book with this title");

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "responses": {
                        "200": response("All books", "BookList"),
                        "500": response("Store failure", "ErrorResponse")
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": {
                        "required": true,
                        "content": json_content(json!({ "$ref": "#/components/schemas/CreateBook" }))
                    },
                    "responses": {
                        "200": response("Created book", "BookCreated"),
                        "422": response("Validation error", "ErrorResponse"),
                        "500": response("Store failure", "ErrorResponse")
                    }
                }
            },
            "/title/{title}": title_path,
            "/author/{author}": lookup("Find books by exact author", path_param("author", "string")),
            "/genre/{genre}": lookup("Find books carrying a genre tag", json!({
                "name": "genre",
                "in": "path",
                "required": true,
                "schema": { "$ref": "#/components/schemas/Genre" }
            })),
            "/releaseYear/{year}": lookup("Find books by publication year", path_param("year", "integer")),
            "/id/{id}": {
                "parameters": [path_param("id", "string")],
                "post": patch_operation("Update a book by id"),
                "delete": {
                    "summary": "Delete a book by id",
                    "tags": ["Books"],
                    "responses": {
                        "200": response("Book as it was before deletion", "BookDeleted"),
                        "404": response("No matching book", "ErrorResponse"),
                        "500": response("Store failure", "ErrorResponse")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Genre": {
                    "type": "string",
                    "enum": models::Genre::ALL.map(models::Genre::as_str)
                },
                "Book": {
                    "type": "object",
                    "properties": book_properties_with_id,
                    "required": ["id", "title", "author", "publishedYear", "genre", "rating"]
                },
                "CreateBook": {
                    "type": "object",
                    "properties": book_properties(),
                    "required": ["title", "author", "publishedYear", "genre"]
                },
                "BookPatch": {
                    "type": "object",
                    "properties": book_properties()
                },
                "BookList": {
                    "type": "object",
                    "properties": {
                        "message": { "type": "string" },
                        "books": { "type": "array", "items": { "$ref": "#/components/schemas/Book" } }
                    }
                },
                "BookCreated": {
                    "type": "object",
                    "properties": {
                        "message": { "type": "string" },
                        "book": { "$ref": "#/components/schemas/Book" }
                    }
                },
                "BookUpdated": {
                    "type": "object",
                    "properties": {
                        "message": { "type": "string" },
                        "updatedBook": { "$ref": "#/components/schemas/Book" }
                    }
                },
                "BookDeleted": {
                    "type": "object",
                    "properties": {
                        "message": { "type": "string" },
                        "deletedBook": { "$ref": "#/components/schemas/Book" }
                    }
                }
            }
        }
    })
}

/// Create a new instance of the books module
pub fn create_module(store: &Store) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(store))
}
