//! Gemini API client struct, request building, and response parsing.

use std::time::Duration;

use tracing::debug;

use crate::session::{ChatMessage, ChatRole};
use crate::AiError;

use super::config::GeminiConfig;

/// Gemini API client. Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .connect_timeout(config.connect_timeout)
                .build()
                .expect("failed to build HTTP client"),
            config,
        }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    pub(crate) fn api_url(&self, model: &str, stream: bool) -> String {
        if stream {
            format!("{}/{}:streamGenerateContent?alt=sse", self.config.base_url, model)
        } else {
            format!("{}/{}:generateContent", self.config.base_url, model)
        }
    }

    /// Build a JSON POST. `timeout` bounds the whole exchange, body included,
    /// so streamed replies pass `None` and are bounded by the connect timeout
    /// only.
    pub(crate) fn build_post(
        &self,
        url: &str,
        body: &serde_json::Value,
        timeout: Option<Duration>,
    ) -> reqwest::RequestBuilder {
        let request = self
            .http
            .post(url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(body);
        match timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    /// Send a JSON POST and map non-success statuses to `AiError`.
    pub(crate) async fn post(
        &self,
        url: &str,
        body: &serde_json::Value,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Response, AiError> {
        let response = self.build_post(url, body, timeout).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
        }
        Ok(response)
    }

    /// Build the JSON request body for one chat turn.
    pub(crate) fn build_chat_body(
        &self,
        system_instruction: &str,
        history: &[ChatMessage],
        user_text: &str,
    ) -> serde_json::Value {
        let mut contents: Vec<serde_json::Value> = history
            .iter()
            .map(|msg| {
                serde_json::json!({
                    "role": msg.role.as_str(),
                    "parts": [{ "text": msg.text }]
                })
            })
            .collect();
        contents.push(serde_json::json!({
            "role": ChatRole::User.as_str(),
            "parts": [{ "text": user_text }]
        }));

        serde_json::json!({
            "contents": contents,
            "systemInstruction": {
                "parts": [{ "text": system_instruction }]
            },
            "generationConfig": {
                "maxOutputTokens": self.config.max_tokens,
                "temperature": self.config.temperature,
            }
        })
    }
}

/// Concatenate the text parts of the first candidate.
pub(crate) fn parse_response_text(json: &serde_json::Value) -> Result<String, AiError> {
    if let Some(message) = api_error_message(json) {
        return Err(AiError::ApiError(message));
    }

    let candidates = json["candidates"]
        .as_array()
        .ok_or_else(|| AiError::ParseError("no candidates in response".to_string()))?;

    let first = candidates
        .first()
        .ok_or_else(|| AiError::ParseError("empty candidates".to_string()))?;

    let mut content = String::new();
    if let Some(parts) = first["content"]["parts"].as_array() {
        for part in parts {
            if let Some(text) = part["text"].as_str() {
                content.push_str(text);
            }
        }
    }
    Ok(content)
}

/// Extract the text carried by one streamed SSE `data:` payload.
///
/// Returns `Ok(None)` for payloads without text (usage-only frames, safety
/// stops, keep-alives).
pub(crate) fn extract_chunk_text(data: &str) -> Result<Option<String>, AiError> {
    let json: serde_json::Value = match serde_json::from_str(data) {
        Ok(json) => json,
        Err(e) => {
            debug!(error = %e, "Skipping non-JSON stream frame");
            return Ok(None);
        }
    };

    if let Some(message) = api_error_message(&json) {
        return Err(AiError::ApiError(message));
    }

    let mut chunk = String::new();
    if let Some(candidates) = json["candidates"].as_array() {
        for candidate in candidates {
            if let Some(parts) = candidate["content"]["parts"].as_array() {
                for part in parts {
                    if let Some(t) = part["text"].as_str() {
                        chunk.push_str(t);
                    }
                }
            }
        }
    }

    Ok((!chunk.is_empty()).then_some(chunk))
}

fn api_error_message(json: &serde_json::Value) -> Option<String> {
    let error = json.get("error")?;
    let message = error["message"].as_str().unwrap_or("unknown error");
    Some(match error["code"].as_u64() {
        Some(code) => format!("{code}: {message}"),
        None => message.to_string(),
    })
}
