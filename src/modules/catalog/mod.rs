pub mod models;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use bookstand_http::error::AppError;
use bookstand_kernel::{InitCtx, Module};

use crate::state::{lock, AppState};
use self::models::{Book, BookDraft};

/// Catalog module: the in-memory book store and its editor surface.
pub struct CatalogModule {
    state: Arc<AppState>,
}

impl CatalogModule {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for CatalogModule {
    fn name(&self) -> &'static str {
        "catalog"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "catalog module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_books).post(upsert_book))
            .route("/status", get(catalog_status))
            .route("/{id}", delete(remove_book))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List catalog entries",
                        "tags": ["Catalog"],
                        "responses": {
                            "200": {
                                "description": "Ordered book list; empty while the catalog is faulted",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create or edit a catalog entry (admin mode)",
                        "tags": ["Catalog"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookDraft" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "The saved book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "403": {
                                "description": "Admin mode is not unlocked",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            },
                            "422": {
                                "description": "Required field missing",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/status": {
                    "get": {
                        "summary": "Catalog generation status",
                        "tags": ["Catalog"],
                        "responses": {
                            "200": {
                                "description": "Current state, fault message if any, and entry count",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/CatalogStatus" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}": {
                    "delete": {
                        "summary": "Delete a catalog entry (admin mode)",
                        "tags": ["Catalog"],
                        "parameters": [{
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "integer", "format": "int64" }
                        }],
                        "responses": {
                            "204": { "description": "Deleted, or no such entry (no-op)" },
                            "403": {
                                "description": "Admin mode is not unlocked",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "description": { "type": "string" },
                            "price": { "type": "number", "minimum": 0 },
                            "coverColor": {
                                "type": "string",
                                "description": "Display color assigned at creation, e.g. #1a2b3c"
                            }
                        },
                        "required": ["id", "title", "author", "description", "price", "coverColor"]
                    },
                    "BookDraft": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "integer",
                                "format": "int64",
                                "description": "Present when editing an existing entry"
                            },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "description": { "type": "string" },
                            "price": {
                                "description": "Number or form text; unparseable input is stored as 0"
                            }
                        },
                        "required": ["title", "author"]
                    },
                    "CatalogStatus": {
                        "type": "object",
                        "properties": {
                            "state": { "type": "string", "enum": ["ready", "unavailable", "failed"] },
                            "message": { "type": "string" },
                            "count": { "type": "integer" }
                        },
                        "required": ["state", "count"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let count = lock(&self.state.catalog).books().len();
        tracing::info!(module = self.name(), count, "catalog module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "catalog module stopped");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct CatalogStatusBody {
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    count: usize,
}

/// Ordered book list. Read-only; available without admin mode.
async fn list_books(State(state): State<Arc<AppState>>) -> Json<Vec<Book>> {
    let catalog = lock(&state.catalog);
    Json(catalog.books().to_vec())
}

/// Generation status for the storefront banner.
async fn catalog_status(State(state): State<Arc<AppState>>) -> Json<CatalogStatusBody> {
    let catalog = lock(&state.catalog);
    let body = match catalog.fault() {
        Some(fault) => CatalogStatusBody {
            state: fault.state(),
            message: Some(fault.message()),
            count: 0,
        },
        None => CatalogStatusBody {
            state: "ready",
            message: None,
            count: catalog.books().len(),
        },
    };
    Json(body)
}

/// Save an editor draft: in-place edit when the id matches, append otherwise.
async fn upsert_book(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<BookDraft>,
) -> Result<Json<Book>, AppError> {
    require_admin(&state)?;

    let mut catalog = lock(&state.catalog);
    match catalog.upsert(draft) {
        Ok(book) => Ok(Json(book)),
        Err(store::EditorError::MissingFields(fields)) => {
            let details = fields
                .iter()
                .map(|field| json!({ "field": field, "error": "required" }))
                .collect();
            Err(AppError::validation(details, "Title and author are required"))
        }
    }
}

/// Delete by id. Deleting an absent id is a no-op; the response is 204
/// either way. The delete confirmation dialog is the caller's concern.
async fn remove_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    require_admin(&state)?;

    let removed = lock(&state.catalog).remove(id);
    if removed {
        tracing::info!(id, "catalog entry deleted");
    }
    Ok(StatusCode::NO_CONTENT)
}

fn require_admin(state: &AppState) -> Result<(), AppError> {
    if lock(&state.session).admin {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Admin mode is required to modify the catalog",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use bookstand_kernel::settings::Settings;
    use super::models::NewBook;
    use tower::ServiceExt;

    fn test_state(admin: bool) -> Arc<AppState> {
        let state = Arc::new(AppState::new(&Settings::default()));
        lock(&state.session).admin = admin;
        state
    }

    fn seeded(state: &AppState, count: usize) {
        let entries = (0..count)
            .map(|i| NewBook {
                title: format!("Book {i}"),
                author: format!("Author {i}"),
                description: "A one-sentence description.".to_string(),
                price: 7.5,
            })
            .collect();
        lock(&state.catalog).replace_all(entries);
    }

    fn router(state: Arc<AppState>) -> Router {
        CatalogModule::new(state).routes()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn list_returns_ordered_books() {
        let state = test_state(false);
        seeded(&state, 3);

        let response = router(state)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let books = body_json(response).await;
        assert_eq!(books.as_array().unwrap().len(), 3);
        assert_eq!(books[0]["title"], "Book 0");
        assert!(books[0]["coverColor"].as_str().unwrap().starts_with('#'));
    }

    #[tokio::test]
    async fn status_reports_fault_message() {
        let state = test_state(false);
        lock(&state.catalog).set_fault(store::CatalogFault::Failed);

        let response = router(state)
            .oneshot(Request::get("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = body_json(response).await;
        assert_eq!(status["state"], "failed");
        assert_eq!(status["count"], 0);
        assert_eq!(
            status["message"],
            "Failed to generate the book library. Please try refreshing the page."
        );
    }

    #[tokio::test]
    async fn upsert_without_admin_is_forbidden() {
        let state = test_state(false);

        let payload = serde_json::json!({
            "title": "Sneaky Insert",
            "author": "Nobody",
            "description": "",
            "price": 1
        });
        let response = router(state.clone())
            .oneshot(
                Request::post("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(lock(&state.catalog).books().is_empty());
    }

    #[tokio::test]
    async fn admin_upsert_appends_book() {
        let state = test_state(true);
        seeded(&state, 2);

        let payload = serde_json::json!({
            "title": "Added via editor",
            "author": "Admin",
            "description": "Fresh entry",
            "price": "19.99"
        });
        let response = router(state.clone())
            .oneshot(
                Request::post("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let book = body_json(response).await;
        assert_eq!(book["price"], 19.99);
        assert_eq!(lock(&state.catalog).books().len(), 3);
    }

    #[tokio::test]
    async fn admin_upsert_blank_title_is_rejected() {
        let state = test_state(true);

        let payload = serde_json::json!({
            "title": "",
            "author": "Admin",
            "price": 1
        });
        let response = router(state)
            .oneshot(
                Request::post("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn delete_without_admin_is_forbidden() {
        let state = test_state(false);
        seeded(&state, 2);
        let victim = lock(&state.catalog).books()[0].id;

        let response = router(state.clone())
            .oneshot(
                Request::delete(format!("/{victim}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let catalog = lock(&state.catalog);
        assert_eq!(catalog.books().len(), 2);
        assert!(catalog.books().iter().any(|b| b.id == victim));
    }

    #[tokio::test]
    async fn delete_absent_id_is_no_op() {
        let state = test_state(true);
        seeded(&state, 2);

        let response = router(state.clone())
            .oneshot(Request::delete("/12345").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(lock(&state.catalog).books().len(), 2);
    }

    #[tokio::test]
    async fn delete_removes_matching_book() {
        let state = test_state(true);
        seeded(&state, 2);
        let victim = lock(&state.catalog).books()[0].id;

        let response = router(state.clone())
            .oneshot(
                Request::delete(format!("/{victim}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let catalog = lock(&state.catalog);
        assert_eq!(catalog.books().len(), 1);
        assert!(catalog.books().iter().all(|b| b.id != victim));
    }
}

/// Create a new instance of the catalog module.
pub fn create_module(state: Arc<AppState>) -> Arc<dyn Module> {
    Arc::new(CatalogModule::new(state))
}
