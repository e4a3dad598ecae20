//! Validation for the `[gemini]` section.

use crate::schema::KitchenConfig;

use super::helpers::{validate_model_id, validate_range, validate_range_f64};

pub(crate) fn validate_gemini(errors: &mut Vec<String>, config: &KitchenConfig) {
    let gemini = &config.gemini;

    validate_model_id(errors, "gemini.chat_model", &gemini.chat_model);
    validate_model_id(errors, "gemini.vision_model", &gemini.vision_model);
    validate_range(errors, "gemini.max_tokens", gemini.max_tokens, 1, 65536);
    validate_range_f64(errors, "gemini.temperature", gemini.temperature, 0.0, 2.0);
    validate_range(
        errors,
        "gemini.connect_timeout_secs",
        gemini.connect_timeout_secs,
        1,
        120,
    );
    validate_range(
        errors,
        "gemini.request_timeout_secs",
        gemini.request_timeout_secs,
        1,
        600,
    );

    if !(gemini.base_url.starts_with("https://") || gemini.base_url.starts_with("http://")) {
        errors.push(format!(
            "gemini.base_url = {:?} must start with http:// or https://",
            gemini.base_url
        ));
    }
}
