//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# AI Kitchen Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[gemini]
# api_key = ""                 # prefer the GEMINI_API_KEY environment variable
# chat_model = "gemini-2.5-flash"
# vision_model = "gemini-2.5-flash"
# max_tokens = 4096            # 1-65536
# temperature = 0.7            # 0.0-2.0
# connect_timeout_secs = 10    # 1-120
# request_timeout_secs = 120   # 1-600, single-shot requests only
# base_url = "https://generativelanguage.googleapis.com/v1beta/models"

[assistant]
# failure_policy = "discard"   # discard, keep_partial

[logging]
# level = "INFO"               # DEBUG, INFO, WARNING, ERROR
"##
}
