use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum KitchenError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("ai error: {0}")]
    Ai(String),

    #[error("session error: {0}")]
    Session(String),

    #[error("missing api key: set GEMINI_API_KEY or [gemini] api_key")]
    MissingApiKey,

    #[error("{0}")]
    Other(String),
}
