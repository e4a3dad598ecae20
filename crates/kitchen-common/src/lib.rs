//! Shared types for the AI Kitchen workspace: error enums and identifiers.

pub mod errors;
pub mod id;

pub use errors::{ConfigError, KitchenError};
pub use id::{new_correlation_id, new_id, SessionId};

pub type Result<T> = std::result::Result<T, KitchenError>;
