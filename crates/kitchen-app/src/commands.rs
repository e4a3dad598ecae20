//! Subcommand dispatch: builds the Gemini client and sessions from config.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use kitchen_ai::generate::identify_ingredients;
use kitchen_ai::{
    ChatSession, FailurePolicy, GeminiClient, GeminiConfig, InlineImage, Persona, Recipe,
};
use kitchen_common::{KitchenError, Result};
use kitchen_config::KitchenConfig;

use crate::chat;
use crate::cli::Command;

pub async fn run(command: Command, config: KitchenConfig) -> Result<()> {
    match command {
        Command::Chef { recipe, model } => {
            let recipe = load_recipe(&recipe)?;
            tracing::info!(recipe = %recipe.recipe_name, "Recipe loaded");
            let session = open_session(&config, Persona::chef(&recipe), model)?;
            chat::run(session).await
        }
        Command::Study { model } => {
            let session = open_session(&config, Persona::study_buddy(), model)?;
            chat::run(session).await
        }
        Command::Identify { image, mime } => {
            let image = match mime {
                Some(mime) => InlineImage::new(mime, std::fs::read(&image)?),
                None => InlineImage::from_path(&image)?,
            };
            let client = gemini_client(&config)?;
            let model = config.gemini.vision_model.as_str();
            let ingredients = identify_ingredients(&client, image, Some(model))
                .await
                .map_err(|e| KitchenError::Ai(e.to_string()))?;

            if ingredients.is_empty() {
                println!("No ingredients found.");
            }
            for ingredient in ingredients {
                println!("{ingredient}");
            }
            Ok(())
        }
        Command::Config => {
            println!("{}", kitchen_config::config_to_json(&config));
            Ok(())
        }
    }
}

fn load_recipe(path: &Path) -> Result<Recipe> {
    let json = std::fs::read_to_string(path)?;
    Ok(Recipe::from_json(&json)?)
}

fn open_session(
    config: &KitchenConfig,
    persona: Persona,
    model: Option<String>,
) -> Result<ChatSession> {
    let model = model.unwrap_or_else(|| config.gemini.chat_model.clone());
    let client = gemini_client(config)?;
    let session = ChatSession::create(Arc::new(client), persona, model)
        .map_err(|e| KitchenError::Session(e.to_string()))?;
    Ok(session.with_failure_policy(failure_policy(config)))
}

fn gemini_client(config: &KitchenConfig) -> Result<GeminiClient> {
    let gemini = &config.gemini;
    let api_key = gemini.resolve_api_key().ok_or(KitchenError::MissingApiKey)?;
    let client_config = GeminiConfig::new(api_key)
        .with_model(&gemini.chat_model)
        .with_max_tokens(gemini.max_tokens)
        .with_temperature(gemini.temperature)
        .with_base_url(&gemini.base_url)
        .with_timeouts(
            Duration::from_secs(gemini.connect_timeout_secs.into()),
            Duration::from_secs(gemini.request_timeout_secs.into()),
        );
    tracing::debug!(config = ?client_config, "Gemini client configured");
    Ok(GeminiClient::new(client_config))
}

fn failure_policy(config: &KitchenConfig) -> FailurePolicy {
    match config.assistant.failure_policy {
        kitchen_config::FailurePolicy::Discard => FailurePolicy::Discard,
        kitchen_config::FailurePolicy::KeepPartial => FailurePolicy::KeepPartial,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_policy_follows_config() {
        let mut config = KitchenConfig::default();
        assert_eq!(failure_policy(&config), FailurePolicy::Discard);
        config.assistant.failure_policy = kitchen_config::FailurePolicy::KeepPartial;
        assert_eq!(failure_policy(&config), FailurePolicy::KeepPartial);
    }

    #[test]
    fn missing_recipe_file_is_io_error() {
        let err = load_recipe(Path::new("/nonexistent/pancakes.json")).unwrap_err();
        assert!(matches!(err, KitchenError::Io(_)));
    }

    #[test]
    fn malformed_recipe_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"recipeName\": 3}").unwrap();
        let err = load_recipe(&path).unwrap_err();
        assert!(matches!(err, KitchenError::Json(_)));
    }
}
