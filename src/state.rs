use std::sync::{Mutex, MutexGuard};

use bookstand_kernel::settings::Settings;

use crate::modules::catalog::store::CatalogStore;
use crate::modules::storefront::Session;

/// Shared in-process state. Everything is memory-resident and discarded on
/// shutdown; the mutexes only serialize the handful of short, synchronous
/// operations the storefront performs.
pub struct AppState {
    pub catalog: Mutex<CatalogStore>,
    pub session: Mutex<Session>,
    pub admin_password: String,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            catalog: Mutex::new(CatalogStore::new()),
            session: Mutex::new(Session::default()),
            admin_password: settings.storefront.admin_password.clone(),
        }
    }
}

/// Lock a state mutex, recovering the inner value if a panicking handler
/// poisoned it. The guarded state stays consistent because every mutation
/// completes before the guard drops.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
