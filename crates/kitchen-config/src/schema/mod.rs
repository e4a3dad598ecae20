//! Configuration schema types for AI Kitchen.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod assistant;
mod gemini;
mod system;

pub use assistant::*;
pub use gemini::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for AI Kitchen.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KitchenConfig {
    pub gemini: GeminiSection,
    pub assistant: AssistantConfig,
    pub logging: LoggingConfig,
}
