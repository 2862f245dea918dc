use serde::{Deserialize, Serialize};

use bookstand_generator::GeneratedBook;

/// One book entry in the catalog. Serialized in the camelCase shape the
/// storefront renders from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique within the store; assigned once at creation.
    pub id: i64,
    pub title: String,
    pub author: String,
    pub description: String,
    /// Always `>= 0`.
    pub price: f64,
    /// `#rrggbb` display color, assigned at creation and never changed.
    pub cover_color: String,
}

/// A not-yet-stored entry: generated or entered through the editor, before
/// the store assigns its id and cover color.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub description: String,
    pub price: f64,
}

impl From<GeneratedBook> for NewBook {
    fn from(book: GeneratedBook) -> Self {
        Self {
            title: book.title,
            author: book.author,
            description: book.description,
            price: book.price,
        }
    }
}

/// Editor form submission. An `id` matching an existing book means edit in
/// place; otherwise the draft becomes a new entry. The price arrives as
/// free-form JSON because the form submits text; coercion happens in the
/// store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDraft {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: serde_json::Value,
}
