//! In-memory catalog store and editor operations.
//!
//! The store is an ordered sequence; insertion order is rendering order.
//! Ids come from a collision-checked millisecond-timestamp generator so two
//! creations inside the same tick still get distinct, increasing ids.

use rand::Rng;
use time::OffsetDateTime;

use super::models::{Book, BookDraft, NewBook};

/// User-facing fault left behind by a failed generation. At most one fault
/// is ever visible, and a faulted store holds zero books.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFault {
    /// The generator client could not be constructed. Terminal.
    Unavailable,
    /// The generation call failed or returned a malformed response.
    Failed,
}

impl CatalogFault {
    pub fn message(&self) -> &'static str {
        match self {
            CatalogFault::Unavailable => "The AI service is not available.",
            CatalogFault::Failed => {
                "Failed to generate the book library. Please try refreshing the page."
            }
        }
    }

    pub fn state(&self) -> &'static str {
        match self {
            CatalogFault::Unavailable => "unavailable",
            CatalogFault::Failed => "failed",
        }
    }
}

/// Editor rejection from the required-field check.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("missing required fields: {0:?}")]
    MissingFields(Vec<&'static str>),
}

/// Ordered in-memory collection of catalog entries.
pub struct CatalogStore {
    books: Vec<Book>,
    fault: Option<CatalogFault>,
    last_id: i64,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            books: Vec::new(),
            fault: None,
            last_id: 0,
        }
    }

    /// Ordered read-only view for rendering.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn fault(&self) -> Option<CatalogFault> {
        self.fault
    }

    /// Initialize the store from a successful generation, assigning each
    /// entry a fresh id and cover color in response order. Clears any fault.
    pub fn replace_all(&mut self, entries: Vec<NewBook>) {
        self.fault = None;
        let books = entries
            .into_iter()
            .map(|entry| self.make_book(entry))
            .collect();
        self.books = books;
    }

    /// Record a generation fault. The store stays empty; a partial catalog
    /// is never mixed in.
    pub fn set_fault(&mut self, fault: CatalogFault) {
        self.books.clear();
        self.fault = Some(fault);
    }

    /// Save an editor draft.
    ///
    /// A draft whose `id` matches an existing book replaces that book's
    /// fields at its original position, keeping id and cover color.
    /// Otherwise the draft is appended as a new book with a fresh id and
    /// color. Unparseable price input is silently stored as `0`.
    pub fn upsert(&mut self, draft: BookDraft) -> Result<Book, EditorError> {
        let mut missing = Vec::new();
        if draft.title.trim().is_empty() {
            missing.push("title");
        }
        if draft.author.trim().is_empty() {
            missing.push("author");
        }
        if !missing.is_empty() {
            return Err(EditorError::MissingFields(missing));
        }

        let price = coerce_price(&draft.price);

        if let Some(existing) = draft
            .id
            .and_then(|id| self.books.iter_mut().find(|book| book.id == id))
        {
            existing.title = draft.title;
            existing.author = draft.author;
            existing.description = draft.description;
            existing.price = price;
            return Ok(existing.clone());
        }

        let book = self.make_book(NewBook {
            title: draft.title,
            author: draft.author,
            description: draft.description,
            price,
        });
        self.books.push(book.clone());
        Ok(book)
    }

    /// Delete the book with the given id. Removing an absent id is a no-op.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.books.len();
        self.books.retain(|book| book.id != id);
        self.books.len() != before
    }

    fn make_book(&mut self, entry: NewBook) -> Book {
        Book {
            id: self.next_id(),
            title: entry.title,
            author: entry.author,
            description: entry.description,
            price: entry.price.max(0.0),
            cover_color: synthesize_cover_color(),
        }
    }

    /// Millisecond timestamp, bumped past the previous id when two
    /// creations land in the same tick.
    fn next_id(&mut self) -> i64 {
        let now_ms = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
        let id = now_ms.max(self.last_id + 1);
        self.last_id = id;
        id
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Coerce free-form price input to a stored price. Unparseable, missing, or
/// negative input becomes `0`; this is silent recovery, not an error.
fn coerce_price(value: &serde_json::Value) -> f64 {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|price| price.is_finite() && *price >= 0.0)
        .unwrap_or(0.0)
}

/// Pseudo-random display color, formatted as a fixed-width hex string.
fn synthesize_cover_color() -> String {
    let rgb: u32 = rand::rng().random_range(0..0x100_0000);
    format!("#{:06x}", rgb)
}
