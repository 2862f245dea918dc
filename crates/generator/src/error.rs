/// Errors from the catalog generator client.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The client could not be constructed, typically because the service
    /// credential is missing. Terminal for the session.
    #[error("generator client unavailable: {0}")]
    Unavailable(&'static str),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("generation service error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body failed to parse as the expected structured shape.
    #[error("malformed generation response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The response parsed but violated the catalog contract (wrong entry
    /// count, empty required field, negative price, no text candidate).
    #[error("generation response violated the catalog contract: {0}")]
    Contract(String),
}

impl GeneratorError {
    /// True for the terminal "service unavailable" condition, as opposed to
    /// a failed generation attempt.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, GeneratorError::Unavailable(_))
    }
}
