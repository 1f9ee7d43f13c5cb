//! Agent error types.

use thiserror::Error;

/// Format an API error for display, extracting the message from a JSON body.
///
/// - `HTTP 429: {"error": {"message": "Rate limit"}}` → `HTTP 429: Rate limit`
/// - plain text is returned as-is
#[must_use]
pub fn format_api_error(error: &str) -> String {
    if let Some(json_start) = error.find('{')
        && let Ok(json) = serde_json::from_str::<serde_json::Value>(&error[json_start..])
        && let Some(msg) = extract_error_message(&json)
    {
        let prefix = error[..json_start].trim();
        if prefix.is_empty() {
            return msg;
        }
        return format!("{prefix} {msg}");
    }
    error.to_string()
}

fn extract_error_message(json: &serde_json::Value) -> Option<String> {
    if let Some(error_obj) = json.get("error") {
        if let Some(msg) = error_obj.get("message").and_then(|v| v.as_str()) {
            return Some(match error_obj.get("code").and_then(|v| v.as_str()) {
                Some(code) => format!("{msg} (code: {code})"),
                None => msg.to_string(),
            });
        }
        if let Some(msg) = error_obj.as_str() {
            return Some(msg.to_string());
        }
    }
    json.get("message")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Missing API key. Set {env_var} or agent.api_key in the config file")]
    MissingApiKey { env_var: String },

    #[error("{0}")]
    Api(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("The agent returned no messages")]
    EmptyResponse,
}
