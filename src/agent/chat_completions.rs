//! OpenAI-compatible chat completions agent.

use super::error::{AgentError, format_api_error};
use super::types::{ChatMessage, Role};
use super::Agent;
use crate::config::AgentConfig;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;

/// HTTP request timeout.
const TIMEOUT: Duration = Duration::from_secs(120);
/// Connection timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Agent that keeps the whole conversation in memory and replays it on every
/// request. The system prompt is always the first message.
pub struct ChatCompletionsAgent {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: Option<f32>,
    memory: Mutex<Vec<ChatMessage>>,
}

impl std::fmt::Debug for ChatCompletionsAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsAgent")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ChatCompletionsAgent {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: None,
            memory: Mutex::new(vec![ChatMessage::system(system_prompt)]),
        }
    }

    /// Build from config. Fails when no API key can be resolved.
    pub fn from_config(config: &AgentConfig, system_prompt: impl Into<String>) -> Result<Self, AgentError> {
        let api_key = config
            .resolve_api_key()
            .ok_or_else(|| AgentError::MissingApiKey {
                env_var: config.api_key_env.clone(),
            })?;
        let mut agent = Self::new(&config.base_url, api_key, &config.model, system_prompt);
        agent.temperature = config.temperature;
        Ok(agent)
    }

    fn build_headers(&self) -> Result<HeaderMap, AgentError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let value = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|_| AgentError::Api("API key contains invalid header characters".into()))?;
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatMessage, AgentError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = CompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };

        tracing::debug!(model = %self.model, messages = messages.len(), "Chat completion request");

        let response = self
            .client
            .post(&url)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(AgentError::Api(format_api_error(&format!(
                "HTTP {status}: {text}"
            ))));
        }

        let parsed: CompletionResponse = serde_json::from_str(&text)
            .map_err(|e| AgentError::Api(format!("Failed to parse response: {e}")))?;
        parse_reply(parsed)
    }
}

fn parse_reply(response: CompletionResponse) -> Result<ChatMessage, AgentError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(AgentError::EmptyResponse)?;
    Ok(ChatMessage::new(
        Role::Assistant,
        choice.message.content.unwrap_or_default(),
    ))
}

#[async_trait]
impl Agent for ChatCompletionsAgent {
    async fn invoke(&self, messages: Vec<ChatMessage>) -> Result<Vec<ChatMessage>, AgentError> {
        let mut memory = self.memory.lock().await;
        let checkpoint = memory.len();
        memory.extend(messages);

        match self.complete(&memory).await {
            Ok(reply) => {
                memory.push(reply);
                Ok(memory.clone())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Chat completion failed");
                memory.truncate(checkpoint);
                Err(e)
            }
        }
    }

    async fn set_system_prompt(&self, prompt: String) {
        let mut memory = self.memory.lock().await;
        match memory.first_mut() {
            Some(first) if first.role == Role::System => first.content = prompt,
            _ => memory.insert(0, ChatMessage::system(prompt)),
        }
        tracing::debug!("System prompt replaced");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_roles_lowercase() {
        let messages = vec![ChatMessage::system("be brief"), ChatMessage::user("hi")];
        let body = CompletionRequest {
            model: "gpt-4o-mini",
            messages: &messages,
            temperature: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn reply_takes_first_choice() {
        let response: CompletionResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"hello"}}]}"#,
        )
        .unwrap();
        let reply = parse_reply(response).unwrap();
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.content, "hello");
    }

    #[test]
    fn no_choices_is_empty_response() {
        let response: CompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(parse_reply(response), Err(AgentError::EmptyResponse)));
    }

    #[test]
    fn missing_key_is_reported_with_env_var() {
        let config = AgentConfig {
            api_key: None,
            api_key_env: "TUBECHAT_TEST_NO_SUCH_KEY".to_string(),
            ..AgentConfig::default()
        };
        let err = ChatCompletionsAgent::from_config(&config, "prompt").unwrap_err();
        assert!(err.to_string().contains("TUBECHAT_TEST_NO_SUCH_KEY"));
    }

    /// Serve one HTTP exchange with `reply` as the JSON body and hand back
    /// the request body.
    async fn serve_once(reply: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            let body_start = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let head = String::from_utf8_lossy(&buf[..body_start]).to_ascii_lowercase();
            let length: usize = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .map(|v| v.trim().parse().unwrap())
                .unwrap_or(0);
            while buf.len() < body_start + length {
                let n = socket.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{reply}",
                reply.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&buf[body_start..body_start + length]).into_owned()
        });
        (base_url, handle)
    }

    #[tokio::test]
    async fn replaced_system_prompt_is_sent_with_the_next_turn() {
        let (base_url, request) =
            serve_once(r#"{"choices":[{"message":{"role":"assistant","content":"hola"}}]}"#).await;
        let agent = ChatCompletionsAgent::new(base_url, "sk-test", "m", "Always answer in English.");

        agent
            .set_system_prompt("Always answer in Spanish.".to_string())
            .await;
        let messages = agent.invoke(vec![ChatMessage::user("hola")]).await.unwrap();

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].content, "hola");
        let body: serde_json::Value = serde_json::from_str(&request.await.unwrap()).unwrap();
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "Always answer in Spanish.");
        assert_eq!(body["messages"][1]["content"], "hola");
    }

    #[tokio::test]
    async fn system_prompt_stays_first_in_memory() {
        let agent = ChatCompletionsAgent::new("http://127.0.0.1:9", "sk-test", "m", "old");
        agent.memory.lock().await.push(ChatMessage::user("earlier"));

        agent.set_system_prompt("new".to_string()).await;

        let memory = agent.memory.lock().await;
        assert_eq!(memory.len(), 2);
        assert_eq!(memory[0].role, Role::System);
        assert_eq!(memory[0].content, "new");
    }

    #[tokio::test]
    async fn failed_request_rolls_back_memory() {
        // Nothing listens on port 9; the request fails fast.
        let agent = ChatCompletionsAgent::new("http://127.0.0.1:9", "sk-test", "m", "system");
        let result = agent.invoke(vec![ChatMessage::user("hello")]).await;
        assert!(result.is_err());
        assert_eq!(agent.memory.lock().await.len(), 1);
    }
}
