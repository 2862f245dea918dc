//! HTTP server facade for Bookstand with Axum, error handling, and a merged
//! OpenAPI document assembled from module fragments.

use anyhow::Context;
use axum::{routing::get, Router};

use bookstand_kernel::ModuleRegistry;

pub mod error;
pub mod router;

use router::RouterBuilder;

/// Start the HTTP server with the given module registry.
///
/// Runs until the listener fails or the process is terminated.
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &bookstand_kernel::settings::Settings,
) -> anyhow::Result<()> {
    let app = build_router(registry, settings);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.server.host, settings.server.port))
            .await
            .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    Ok(())
}

/// Build the main HTTP router with every module's routes mounted under
/// `/api/{module_name}`. Exposed separately so tests can drive the router
/// in-process without binding a socket.
pub fn build_router(
    registry: &ModuleRegistry,
    settings: &bookstand_kernel::settings::Settings,
) -> Router {
    let mut builder = RouterBuilder::new()
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms)
        .route("/healthz", get(health_check));

    for module in registry.modules() {
        tracing::info!(
            module = module.name(),
            "mounting module routes under /api/{}",
            module.name()
        );
        builder = builder.mount_module(module.name(), module.routes());
    }

    builder.with_openapi(registry).build()
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
