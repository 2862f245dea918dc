//! Catalog generator client for the Gemini `generateContent` API.
//!
//! One-shot structured-output request: ask the service for a fixed-size batch
//! of fictional book metadata and validate the reply against the catalog
//! contract at the boundary. Anything that deviates from the contract is a
//! hard failure with zero records; a partial catalog is never produced.

pub mod client;
pub mod error;
pub mod protocol;

pub use client::GeminiClient;
pub use error::GeneratorError;
pub use protocol::{GeneratedBook, CATALOG_BATCH_SIZE};
