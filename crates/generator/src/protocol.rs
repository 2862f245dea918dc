//! Wire contract for the `generateContent` catalog request.
//!
//! The request pins a JSON response schema so the service returns exactly an
//! array of four-field book objects. The title field travels as `recipeName`
//! on the wire; that is the shipped contract and renaming it would break
//! recorded fixtures, so it is mapped back to `title` at the serde boundary.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::GeneratorError;

/// Number of catalog entries requested per generation. The contract is a
/// fixed-size batch; any other count in the reply is a contract violation.
pub const CATALOG_BATCH_SIZE: usize = 12;

/// Fixed instruction sent with every generation request.
pub const CATALOG_PROMPT: &str = "Generate a list of 12 fictional e-book titles, authors, \
     brief one-sentence descriptions, and prices for a fantasy and sci-fi bookstore.";

/// One validated catalog entry as returned by the service.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GeneratedBook {
    #[serde(rename = "recipeName")]
    pub title: String,
    pub author: String,
    pub description: String,
    pub price: f64,
}

/// Response envelope for `generateContent`. Only the text path is used;
/// everything else the service sends is ignored.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    text: Option<String>,
}

/// Build the `generateContent` request body: the fixed prompt plus a pinned
/// JSON response schema for the array-of-books shape.
pub fn request_body() -> Value {
    json!({
        "contents": [{
            "parts": [{ "text": CATALOG_PROMPT }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "recipeName":  { "type": "STRING", "description": "The title of the book." },
                        "author":      { "type": "STRING", "description": "The name of the author." },
                        "description": { "type": "STRING", "description": "A short, one-sentence description." },
                        "price":       { "type": "NUMBER", "description": "The price of the book." },
                    },
                    "required": ["recipeName", "author", "description", "price"]
                }
            }
        }
    })
}

/// Pull the generated JSON text out of the response envelope.
///
/// The structured-output reply arrives as the first text part of the first
/// candidate; an envelope without one is a contract violation.
pub fn extract_text(body: &str) -> Result<String, GeneratorError> {
    let envelope: GenerateContentResponse = serde_json::from_str(body)?;

    envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| GeneratorError::Contract("response contained no text candidate".into()))
}

/// Parse the generated JSON payload into catalog entries and enforce the
/// contract: exactly [`CATALOG_BATCH_SIZE`] entries, non-empty title and
/// author, non-negative price. Any violation fails the whole batch.
pub fn parse_catalog(payload: &str) -> Result<Vec<GeneratedBook>, GeneratorError> {
    let books: Vec<GeneratedBook> = serde_json::from_str(payload.trim())?;

    if books.len() != CATALOG_BATCH_SIZE {
        return Err(GeneratorError::Contract(format!(
            "expected {} entries, got {}",
            CATALOG_BATCH_SIZE,
            books.len()
        )));
    }

    for (index, book) in books.iter().enumerate() {
        if book.title.trim().is_empty() || book.author.trim().is_empty() {
            return Err(GeneratorError::Contract(format!(
                "entry {} is missing a title or author",
                index
            )));
        }
        if book.price < 0.0 {
            return Err(GeneratorError::Contract(format!(
                "entry {} has a negative price",
                index
            )));
        }
    }

    Ok(books)
}
