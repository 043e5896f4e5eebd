//! OpenAI-compatible chat-completions client.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use trendfeed_core::AppConfig;

use crate::error::LlmError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o";

/// Longest slice of an error body kept in [`LlmError::UpstreamStatus`].
const ERROR_BODY_LIMIT: usize = 500;

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: 10,
            timeout_secs: 120,
        }
    }
}

impl ChatConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
            base_url: config.openai_base_url.clone(),
            connect_timeout_secs: config.llm_connect_timeout_secs,
            timeout_secs: config.llm_timeout_secs,
        }
    }
}

/// One system + user exchange.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub system: &'a str,
    pub user: &'a str,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Long-lived chat client, built once per process and shared by reference.
///
/// No retries are attempted; a failed call is reported once and the calling
/// flow's failure policy decides what happens next.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    endpoint: Url,
}

impl ChatClient {
    /// # Errors
    ///
    /// Returns [`LlmError::Transport`] if the `reqwest::Client` cannot be
    /// built, or [`LlmError::InvalidBaseUrl`] if the base URL does not parse.
    pub fn new(config: &ChatConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("trendfeed/0.1 (feed-generation)")
            .build()?;

        let raw = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        let endpoint = Url::parse(&raw).map_err(|e| LlmError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: config
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(ToOwned::to_owned),
            model: config.model.clone(),
            endpoint,
        })
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one chat exchange and return the trimmed assistant message.
    ///
    /// # Errors
    ///
    /// - [`LlmError::NotConfigured`] when no API key is set (no request is sent).
    /// - [`LlmError::Transport`] on connect/read failure or timeout.
    /// - [`LlmError::UpstreamStatus`] on a non-2xx response.
    /// - [`LlmError::MalformedJson`] if the response envelope is not JSON.
    /// - [`LlmError::ContractViolation`] if the envelope has no message text.
    pub async fn complete(&self, request: &ChatRequest<'_>) -> Result<String, LlmError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(LlmError::NotConfigured);
        };

        let body = CompletionBody {
            model: &self.model,
            messages: [
                Message {
                    role: "system",
                    content: request.system,
                },
                Message {
                    role: "user",
                    content: request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::UpstreamStatus {
                status: status.as_u16(),
                body: text.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let parsed: CompletionResponse =
            serde_json::from_str(&text).map_err(|e| LlmError::MalformedJson(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| LlmError::ContractViolation("response has no message content".into()))
    }
}
