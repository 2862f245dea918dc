//! Application startup sequence.

use std::sync::Arc;

use anyhow::Context;
use bookstand_generator::GeminiClient;
use bookstand_kernel::settings::Settings;
use bookstand_kernel::{InitCtx, ModuleRegistry};

use crate::modules;
use crate::modules::catalog::models::NewBook;
use crate::modules::catalog::store::CatalogFault;
use crate::state::{lock, AppState};

/// Run the storefront service until the server exits.
pub async fn run() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Bookstand settings")?;
    bookstand_telemetry::init(&settings.telemetry);

    tracing::info!(env = ?settings.environment, "bookstand bootstrap starting");

    let state = Arc::new(AppState::new(&settings));
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, state.clone());

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;

    // One-shot generation before the server accepts requests, so a partial
    // catalog can never be observed.
    populate_catalog(&settings, &state).await;

    registry.start_all(&ctx).await?;

    tracing::info!("bookstand bootstrap complete");
    bookstand_http::start_server(&registry, &settings).await?;

    registry.stop_all().await?;
    Ok(())
}

/// Fetch the generated catalog and initialize the store, degrading every
/// generator failure to a single visible fault. Never returns an error: a
/// failed generation leaves the storefront up with an empty, faulted
/// catalog.
pub async fn populate_catalog(settings: &Settings, state: &AppState) {
    let client = match GeminiClient::from_settings(&settings.generator) {
        Ok(client) => client,
        Err(err) => {
            tracing::error!(error = %err, "generator client unavailable");
            lock(&state.catalog).set_fault(CatalogFault::Unavailable);
            return;
        }
    };

    match client.generate_catalog().await {
        Ok(books) => {
            let entries: Vec<NewBook> = books.into_iter().map(NewBook::from).collect();
            lock(&state.catalog).replace_all(entries);
        }
        Err(err) => {
            tracing::error!(error = %err, "catalog generation failed");
            lock(&state.catalog).set_fault(CatalogFault::Failed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Absent credential degrades to the terminal unavailable fault instead
    // of crashing the bootstrap.
    #[tokio::test]
    async fn missing_credential_faults_the_catalog() {
        let mut settings = Settings::default();
        settings.generator.api_key = None;
        let state = AppState::new(&settings);

        populate_catalog(&settings, &state).await;

        let catalog = lock(&state.catalog);
        assert!(catalog.books().is_empty());
        assert_eq!(catalog.fault(), Some(CatalogFault::Unavailable));
    }

    // A reachable-but-broken endpoint is a generation failure: empty store,
    // exactly one fault, no partial catalog.
    #[tokio::test]
    async fn unreachable_service_faults_as_failed() {
        let mut settings = Settings::default();
        settings.generator.api_key = Some("test-key".to_string());
        settings.generator.api_base = "http://127.0.0.1:9".to_string();
        settings.generator.timeout_ms = 500;
        let state = AppState::new(&settings);

        populate_catalog(&settings, &state).await;

        let catalog = lock(&state.catalog);
        assert!(catalog.books().is_empty());
        assert_eq!(catalog.fault(), Some(CatalogFault::Failed));
    }
}
