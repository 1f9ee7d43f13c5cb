//! The conversational agent seam.
//!
//! The prompt loop only depends on [`Agent`]; [`ChatCompletionsAgent`] is the
//! production implementation backed by an OpenAI-compatible endpoint.

mod chat_completions;
mod error;
mod types;

pub use chat_completions::ChatCompletionsAgent;
pub use error::{AgentError, format_api_error};
pub use types::{ChatMessage, Role};

use async_trait::async_trait;

/// A request/response conversational capability.
///
/// `invoke` receives the new messages for this turn and returns the agent's
/// full message sequence, whose final element is the reply. Implementations
/// must return a non-empty sequence on success.
#[async_trait]
pub trait Agent: Send + Sync {
    async fn invoke(&self, messages: Vec<ChatMessage>) -> Result<Vec<ChatMessage>, AgentError>;

    /// Replace the standing instructions that precede every turn, e.g. after
    /// the reply language changed. Agents without instructions ignore this.
    async fn set_system_prompt(&self, _prompt: String) {}
}

/// The reply of an agent turn: the last message of the returned sequence.
pub fn final_message(messages: &[ChatMessage]) -> Result<&ChatMessage, AgentError> {
    messages.last().ok_or(AgentError::EmptyResponse)
}
