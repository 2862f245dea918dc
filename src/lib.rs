//! Bookstand application library.
//!
//! Wires the catalog and storefront modules into the kernel registry and
//! drives the startup sequence: settings, telemetry, one-shot catalog
//! generation, HTTP server.

pub mod bootstrap;
pub mod modules;
pub mod state;

pub use bootstrap::{populate_catalog, run};
