//! Storefront session module: view switching, no-op sign-in/sign-up, and
//! the cosmetic admin gate.
//!
//! None of this is authentication. Credentials are never verified or stored;
//! the flags only shape what the storefront renders.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use bookstand_http::error::AppError;
use bookstand_kernel::{InitCtx, Module};

use crate::state::{lock, AppState};

/// The three mutually exclusive storefront views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Home,
    SignIn,
    SignUp,
}

/// Per-process session flags. Reset on restart, never persisted.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub view: View,
    pub logged_in: bool,
    pub admin: bool,
}

/// Storefront module implementation.
pub struct StorefrontModule {
    state: Arc<AppState>,
}

impl StorefrontModule {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for StorefrontModule {
    fn name(&self) -> &'static str {
        "storefront"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "storefront module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(current_session))
            .route("/view", post(set_view))
            .route("/signin", post(sign_in))
            .route("/signup", post(sign_up))
            .route("/signout", post(sign_out))
            .route("/admin/unlock", post(unlock_admin))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "Current session flags",
                        "tags": ["Storefront"],
                        "responses": {
                            "200": {
                                "description": "View and session flags",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Session" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/view": {
                    "post": {
                        "summary": "Switch the active view",
                        "tags": ["Storefront"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "view": { "type": "string", "enum": ["home", "signin", "signup"] }
                                        },
                                        "required": ["view"]
                                    }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Updated session",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Session" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/signin": {
                    "post": {
                        "summary": "Sign in (accepts any credentials)",
                        "tags": ["Storefront"],
                        "responses": {
                            "200": {
                                "description": "Signed in; back on the home view",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Session" }
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
                "/signup": {
                    "post": {
                        "summary": "Sign up (accepts any credentials)",
                        "tags": ["Storefront"],
                        "responses": {
                            "200": {
                                "description": "Signed in; back on the home view",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Session" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/signout": {
                    "post": {
                        "summary": "Sign out and drop admin mode",
                        "tags": ["Storefront"],
                        "responses": {
                            "200": {
                                "description": "Cleared session",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Session" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/admin/unlock": {
                    "post": {
                        "summary": "Unlock admin mode with the gate password",
                        "tags": ["Storefront"],
                        "responses": {
                            "200": {
                                "description": "Admin access granted",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Session" }
                                    }
                                }
                            },
                            "401": {
                                "description": "Incorrect password",
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
                    "Session": {
                        "type": "object",
                        "properties": {
                            "view": { "type": "string", "enum": ["home", "signin", "signup"] },
                            "loggedIn": { "type": "boolean" },
                            "admin": { "type": "boolean" },
                            "message": { "type": "string" }
                        },
                        "required": ["view", "loggedIn", "admin"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "storefront module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "storefront module stopped");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionBody {
    view: View,
    logged_in: bool,
    admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

impl SessionBody {
    fn from_session(session: &Session) -> Self {
        Self {
            view: session.view,
            logged_in: session.logged_in,
            admin: session.admin,
            message: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ViewRequest {
    view: View,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CredentialsRequest {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct UnlockRequest {
    password: String,
}

async fn current_session(State(state): State<Arc<AppState>>) -> Json<SessionBody> {
    let session = lock(&state.session);
    Json(SessionBody::from_session(&session))
}

async fn set_view(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ViewRequest>,
) -> Json<SessionBody> {
    let mut session = lock(&state.session);
    session.view = request.view;
    Json(SessionBody::from_session(&session))
}

/// Accepts any credentials once the required fields are present. Sets the
/// logged-in flag and returns to the home view.
async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<SessionBody>, AppError> {
    require_fields(&[("email", &request.email), ("password", &request.password)])?;

    let mut session = lock(&state.session);
    session.logged_in = true;
    session.view = View::Home;
    Ok(Json(SessionBody::from_session(&session)))
}

/// Same as sign-in, plus a required name field. No account is created.
async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<SessionBody>, AppError> {
    require_fields(&[
        ("name", &request.name),
        ("email", &request.email),
        ("password", &request.password),
    ])?;

    let mut session = lock(&state.session);
    session.logged_in = true;
    session.view = View::Home;
    Ok(Json(SessionBody::from_session(&session)))
}

/// Clears both flags and returns to the home view.
async fn sign_out(State(state): State<Arc<AppState>>) -> Json<SessionBody> {
    let mut session = lock(&state.session);
    session.logged_in = false;
    session.admin = false;
    session.view = View::Home;
    Json(SessionBody::from_session(&session))
}

/// The admin gate: a verbatim comparison against the configured password.
/// Cosmetic only; a correct guess merely changes what the UI renders.
async fn unlock_admin(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UnlockRequest>,
) -> Result<Json<SessionBody>, AppError> {
    if request.password != state.admin_password {
        return Err(AppError::unauthorized("Incorrect password."));
    }

    let mut session = lock(&state.session);
    session.admin = true;
    let mut body = SessionBody::from_session(&session);
    body.message = Some("Admin access granted!");
    Ok(Json(body))
}

fn require_fields(fields: &[(&'static str, &str)]) -> Result<(), AppError> {
    let details: Vec<serde_json::Value> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| json!({ "field": name, "error": "required" }))
        .collect();

    if details.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(details, "All fields are required"))
    }
}

/// Create a new instance of the storefront module.
pub fn create_module(state: Arc<AppState>) -> Arc<dyn Module> {
    Arc::new(StorefrontModule::new(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use bookstand_kernel::settings::Settings;
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(&Settings::default()))
    }

    fn router(state: Arc<AppState>) -> Router {
        StorefrontModule::new(state).routes()
    }

    async fn post_json(
        state: Arc<AppState>,
        path: &str,
        payload: serde_json::Value,
    ) -> axum::response::Response {
        router(state)
            .oneshot(
                Request::post(path)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn default_session_is_logged_out_home() {
        let response = router(test_state())
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["view"], "home");
        assert_eq!(body["loggedIn"], false);
        assert_eq!(body["admin"], false);
    }

    #[tokio::test]
    async fn view_switch_is_unguarded() {
        let state = test_state();
        let response = post_json(state.clone(), "/view", json!({ "view": "signup" })).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(lock(&state.session).view, View::SignUp);
    }

    #[tokio::test]
    async fn sign_in_accepts_any_credentials() {
        let state = test_state();
        lock(&state.session).view = View::SignIn;

        let response = post_json(
            state.clone(),
            "/signin",
            json!({ "email": "anyone@example.com", "password": "whatever" }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let session = lock(&state.session);
        assert!(session.logged_in);
        assert_eq!(session.view, View::Home);
    }

    #[tokio::test]
    async fn sign_in_requires_fields() {
        let state = test_state();
        let response = post_json(
            state.clone(),
            "/signin",
            json!({ "email": "", "password": "" }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(!lock(&state.session).logged_in);
    }

    #[tokio::test]
    async fn sign_up_accepts_any_credentials() {
        let state = test_state();
        lock(&state.session).view = View::SignUp;

        let response = post_json(
            state.clone(),
            "/signup",
            json!({
                "name": "Jane Reader",
                "email": "jane@example.com",
                "password": "whatever"
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let session = lock(&state.session);
        assert!(session.logged_in);
        assert_eq!(session.view, View::Home);
    }

    #[tokio::test]
    async fn sign_up_requires_name() {
        let state = test_state();
        let response = post_json(
            state.clone(),
            "/signup",
            json!({ "email": "jane@example.com", "password": "whatever" }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["details"][0]["field"], "name");
        assert!(!lock(&state.session).logged_in);
    }

    #[tokio::test]
    async fn sign_out_clears_both_flags() {
        let state = test_state();
        {
            let mut session = lock(&state.session);
            session.logged_in = true;
            session.admin = true;
            session.view = View::SignIn;
        }

        let response = post_json(state.clone(), "/signout", json!({})).await;

        assert_eq!(response.status(), StatusCode::OK);
        let session = lock(&state.session);
        assert!(!session.logged_in);
        assert!(!session.admin);
        assert_eq!(session.view, View::Home);
    }

    #[tokio::test]
    async fn unlock_with_correct_password_grants_admin() {
        let state = test_state();
        let response = post_json(
            state.clone(),
            "/admin/unlock",
            json!({ "password": "2086" }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["admin"], true);
        assert_eq!(body["message"], "Admin access granted!");
        assert!(lock(&state.session).admin);
    }

    #[tokio::test]
    async fn unlock_with_wrong_password_is_unauthorized() {
        let state = test_state();
        let response = post_json(
            state.clone(),
            "/admin/unlock",
            json!({ "password": "guess" }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "Incorrect password.");
        assert!(!lock(&state.session).admin);
    }
}
