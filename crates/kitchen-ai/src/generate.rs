//! Single-shot generation: a prompt, an optional image, an optional output
//! schema, and one reply.

use std::path::Path;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::AiError;

const IDENTIFY_INGREDIENTS_PROMPT: &str = "Identify all the food ingredients in this image. \
List them as a comma-separated string. If there are no identifiable food items, return an empty string.";

/// Raw image bytes sent inline with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl InlineImage {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Read an image file, guessing its MIME type from the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let data = std::fs::read(path)?;
        Ok(Self::new(mime_for_path(path), data))
    }
}

/// Guess an image MIME type from a file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        _ => "application/octet-stream",
    }
}

/// One single-shot request.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub prompt: String,
    pub image: Option<InlineImage>,
    /// When set, the model must answer with JSON matching this schema.
    pub response_schema: Option<serde_json::Value>,
    pub temperature: Option<f64>,
    /// Overrides the client's default model.
    pub model: Option<String>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one request and return the reply text, trimmed.
    async fn generate_text(&self, request: GenerateRequest) -> Result<String, AiError>;
}

/// Run a schema-constrained request and parse the reply into `T`.
pub async fn generate_json<T: DeserializeOwned>(
    generator: &dyn TextGenerator,
    request: GenerateRequest,
) -> Result<T, AiError> {
    let text = generator.generate_text(request).await?;
    serde_json::from_str(strip_code_fence(&text))
        .map_err(|e| AiError::ParseError(format!("reply is not the expected JSON: {e}")))
}

/// List the food ingredients visible in a photo.
pub async fn identify_ingredients(
    generator: &dyn TextGenerator,
    image: InlineImage,
    model: Option<&str>,
) -> Result<Vec<String>, AiError> {
    let mut request = GenerateRequest::new(IDENTIFY_INGREDIENTS_PROMPT).with_image(image);
    if let Some(model) = model {
        request = request.with_model(model);
    }
    let text = generator.generate_text(request).await?;
    Ok(parse_ingredient_list(&text))
}

/// Split a comma-separated ingredient reply, dropping blanks.
pub fn parse_ingredient_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(|item| item.trim().trim_end_matches('.').trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Models sometimes wrap JSON in a markdown fence despite being told not to.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CannedGenerator {
        reply: Result<String, ()>,
        seen: Mutex<Vec<GenerateRequest>>,
    }

    impl CannedGenerator {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate_text(&self, request: GenerateRequest) -> Result<String, AiError> {
            self.seen.lock().unwrap().push(request);
            self.reply
                .clone()
                .map_err(|_| AiError::NetworkError("offline".into()))
        }
    }

    #[derive(Debug, serde::Deserialize, PartialEq)]
    struct Pantry {
        items: Vec<String>,
    }

    #[test]
    fn ingredient_list_is_split_and_trimmed() {
        assert_eq!(
            parse_ingredient_list("tomatoes, basil ,  mozzarella, olive oil."),
            ["tomatoes", "basil", "mozzarella", "olive oil"]
        );
    }

    #[test]
    fn empty_reply_means_no_ingredients() {
        assert!(parse_ingredient_list("").is_empty());
        assert!(parse_ingredient_list(" , ,").is_empty());
    }

    #[test]
    fn mime_guess_from_extension() {
        assert_eq!(mime_for_path(Path::new("fridge.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("plate.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn code_fence_is_stripped() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
    }

    #[tokio::test]
    async fn identify_sends_image_and_fixed_prompt() {
        let generator = CannedGenerator::replying("eggs, flour, milk");
        let image = InlineImage::new("image/png", vec![1, 2, 3]);

        let items = identify_ingredients(&generator, image.clone(), Some("gemini-2.5-flash"))
            .await
            .unwrap();

        assert_eq!(items, ["eggs", "flour", "milk"]);
        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].image.as_ref(), Some(&image));
        assert!(seen[0].prompt.contains("comma-separated"));
        assert_eq!(seen[0].model.as_deref(), Some("gemini-2.5-flash"));
    }

    #[tokio::test]
    async fn generate_json_parses_fenced_reply() {
        let generator = CannedGenerator::replying("```json\n{\"items\":[\"rice\"]}\n```");
        let pantry: Pantry = generate_json(&generator, GenerateRequest::new("list"))
            .await
            .unwrap();
        assert_eq!(pantry.items, ["rice"]);
    }

    #[tokio::test]
    async fn generate_json_rejects_wrong_shape() {
        let generator = CannedGenerator::replying("{\"title\":\"oops\"}");
        let result: Result<Pantry, _> = generate_json(&generator, GenerateRequest::new("list")).await;
        assert!(matches!(result, Err(AiError::ParseError(_))));
    }

    #[tokio::test]
    async fn backend_failure_propagates() {
        let generator = CannedGenerator::failing();
        let image = InlineImage::new("image/jpeg", vec![0xff]);
        let result = identify_ingredients(&generator, image, None).await;
        assert!(matches!(result, Err(AiError::NetworkError(_))));
    }
}
