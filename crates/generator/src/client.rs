//! HTTP client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use bookstand_kernel::settings::GeneratorSettings;

use crate::error::GeneratorError;
use crate::protocol::{self, GeneratedBook};

/// One-shot catalog generator client.
///
/// Holds a pooled [`reqwest::Client`] with a bounded request timeout; a
/// timed-out or failed call surfaces as [`GeneratorError::Request`] and is
/// never retried here.
pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Build a client from settings.
    ///
    /// A missing credential yields [`GeneratorError::Unavailable`] so the
    /// caller can degrade to its terminal error state instead of crashing.
    pub fn from_settings(settings: &GeneratorSettings) -> Result<Self, GeneratorError> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or(GeneratorError::Unavailable("missing GEMINI_API_KEY"))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()?;

        Ok(Self {
            http,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key,
        })
    }

    /// Request one batch of generated catalog entries.
    ///
    /// Exactly one outbound call per invocation. Returns either the complete
    /// validated batch or an error with zero records.
    pub async fn generate_catalog(&self) -> Result<Vec<GeneratedBook>, GeneratorError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        );

        tracing::debug!(model = %self.model, "requesting catalog generation");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&protocol::request_body())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let payload = protocol::extract_text(&body)?;
        let books = protocol::parse_catalog(&payload)?;

        tracing::info!(count = books.len(), "catalog generation succeeded");
        Ok(books)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_is_unavailable() {
        let settings = GeneratorSettings::default();
        match GeminiClient::from_settings(&settings) {
            Err(err) => assert!(err.is_unavailable()),
            Ok(_) => panic!("expected Unavailable without a credential"),
        }
    }

    #[test]
    fn api_base_trailing_slash_is_normalized() {
        let settings = GeneratorSettings {
            api_key: Some("test-key".to_string()),
            api_base: "https://example.test/".to_string(),
            ..GeneratorSettings::default()
        };

        let client = GeminiClient::from_settings(&settings).unwrap();
        assert_eq!(client.api_base, "https://example.test");
    }
}
