//! Gemini backend configuration.

use serde::{Deserialize, Serialize};

/// Environment variable that takes precedence over `[gemini] api_key`.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini API settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSection {
    /// API key. Leave empty and set `GEMINI_API_KEY` instead where possible.
    pub api_key: String,
    /// Model used for chat sessions.
    pub chat_model: String,
    /// Model used for single-shot image understanding.
    pub vision_model: String,
    /// Maximum output tokens per reply (valid range: 1-65536).
    pub max_tokens: u32,
    /// Sampling temperature (valid range: 0.0-2.0).
    pub temperature: f64,
    /// Connect timeout in seconds (valid range: 1-120).
    pub connect_timeout_secs: u32,
    /// Whole-request timeout in seconds for single-shot requests such as
    /// ingredient identification (valid range: 1-600). Streamed chat replies
    /// are bounded by the connect timeout only.
    pub request_timeout_secs: u32,
    pub base_url: String,
}

impl std::fmt::Debug for GeminiSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiSection")
            .field("api_key", &"[REDACTED]")
            .field("chat_model", &self.chat_model)
            .field("vision_model", &self.vision_model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for GeminiSection {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            chat_model: "gemini-2.5-flash".to_string(),
            vision_model: "gemini-2.5-flash".to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
        }
    }
}

impl GeminiSection {
    /// Resolve the API key: the environment first, then the config file.
    pub fn resolve_api_key(&self) -> Option<String> {
        Self::pick_api_key(std::env::var(API_KEY_ENV).ok(), &self.api_key)
    }

    fn pick_api_key(from_env: Option<String>, from_file: &str) -> Option<String> {
        from_env
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .or_else(|| {
                let k = from_file.trim();
                (!k.is_empty()).then(|| k.to_string())
            })
    }
}
