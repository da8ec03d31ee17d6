use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;

const DEFAULT_BASE_URL: &str = "https://api.dedaluslabs.ai";
const DEFAULT_MODEL: &str = "anthropic/claude-3-5-sonnet";

#[derive(Debug, Clone)]
pub struct DedalusConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub project: Option<String>,
}

impl DedalusConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("DEDALUS_API_KEY").ok(),
            base_url: std::env::var("DEDALUS_API_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            project: std::env::var("DEDALUS_PROJECT").ok(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub system_prompt: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            system_prompt: None,
            max_tokens: 512,
            temperature: 0.0,
        }
    }
}

/// Chat-completions gateway shared by the extraction, reasoning, and
/// summarization passes.
///
/// Upstream 5xx and unparseable bodies are soft failures (`Ok(None)`);
/// 4xx responses are hard failures that abort the caller's run.
#[async_trait]
pub trait ChatCompletions: Send + Sync {
    async fn chat(
        &self,
        user_prompt: &str,
        options: &ChatOptions,
    ) -> Result<Option<String>, AppError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Dedalus AI gateway client (OpenAI-compatible chat completions).
pub struct DedalusClient {
    client: Client,
    config: DedalusConfig,
}

impl DedalusClient {
    pub fn new(config: DedalusConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ChatCompletions for DedalusClient {
    async fn chat(
        &self,
        user_prompt: &str,
        options: &ChatOptions,
    ) -> Result<Option<String>, AppError> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("DEDALUS_API_KEY is not set".to_string()))?;

        let body = ChatRequest {
            model: DEFAULT_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: user_prompt,
            }],
            system: options.system_prompt.as_deref(),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let mut request = self
            .client
            .post(format!("{}/v1/chat/completions", self.config.base_url))
            .bearer_auth(key)
            .json(&body);
        if let Some(project) = &self.config.project {
            request = request.header("X-Dedalus-Project", project);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::External(format!("chat completions request failed: {e}")))?;

        let status = response.status();
        if status.is_server_error() {
            let detail: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(200)
                .collect();
            warn!("chat completions returned {status}: {detail}");
            return Ok(None);
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::External(format!(
                "chat completions returned {status}: {detail}"
            )));
        }

        let parsed: ChatResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("unexpected chat completions body: {e}");
                return Ok(None);
            }
        };

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty());

        Ok(content)
    }
}
