//! `TextGenerator` implementation for GeminiClient (single-shot requests).

use async_trait::async_trait;
use base64::Engine as _;
use tracing::debug;

use crate::generate::{GenerateRequest, TextGenerator};
use crate::AiError;

use super::client::{parse_response_text, GeminiClient};

impl GeminiClient {
    /// Build the JSON request body for a single-shot request.
    pub(crate) fn build_generate_body(&self, request: &GenerateRequest) -> serde_json::Value {
        let mut parts = Vec::new();
        if let Some(image) = &request.image {
            parts.push(serde_json::json!({
                "inlineData": {
                    "mimeType": image.mime_type,
                    "data": base64::engine::general_purpose::STANDARD.encode(&image.data),
                }
            }));
        }
        parts.push(serde_json::json!({ "text": request.prompt }));

        let mut generation_config = serde_json::json!({
            "maxOutputTokens": self.config.max_tokens,
            "temperature": request.temperature.unwrap_or(self.config.temperature),
        });
        if let Some(schema) = &request.response_schema {
            generation_config["responseMimeType"] = "application/json".into();
            generation_config["responseSchema"] = schema.clone();
        }

        serde_json::json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": generation_config,
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_text(&self, request: GenerateRequest) -> Result<String, AiError> {
        let model = request.model.as_deref().unwrap_or(&self.config.model);
        let url = self.api_url(model, false);
        let body = self.build_generate_body(&request);

        debug!(
            model,
            has_image = request.image.is_some(),
            has_schema = request.response_schema.is_some(),
            "Gemini API request"
        );

        let response = self
            .post(&url, &body, Some(self.config.request_timeout))
            .await?;
        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        Ok(parse_response_text(&json)?.trim().to_string())
    }
}
