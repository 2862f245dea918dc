pub mod catalog;
pub mod storefront;

use std::sync::Arc;

use bookstand_kernel::ModuleRegistry;

use crate::state::AppState;

/// Register every application module with the registry.
pub fn register_all(registry: &mut ModuleRegistry, state: Arc<AppState>) {
    registry.register(catalog::create_module(state.clone()));
    registry.register(storefront::create_module(state));
}
