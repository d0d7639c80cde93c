use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::LlmError;

const SYSTEM_PROMPT: &str = "You are a professional long-term value investing analyst. \
You focus on objective analysis and risk assessment, and you never give buy/sell \
recommendations or price targets.";

/// Configuration for the narrative-generation capability.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
    pub max_tokens: usize,
    pub temperature: f32,
}

impl LlmConfig {
    pub fn from_env() -> Self {
        let timeout_secs = std::env::var("AI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);
        Self {
            base_url: std::env::var("AI_SERVICE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key: std::env::var("AI_SERVICE_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .ok(),
            model: std::env::var("AI_SERVICE_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            timeout: Duration::from_secs(timeout_secs),
            max_tokens: 800,
            temperature: 0.7,
        }
    }
}

/// The external narrative-generation capability. Opaque to the core: one
/// prompt in, one text out, bounded by the client timeout. The core never
/// retries internally; failures surface to the caller as retryable errors.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn generate(&self, prompt: String) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// OpenAI-compatible chat-completions client (custom base URLs supported).
pub struct OpenAiProvider {
    config: LlmConfig,
    api_key: String,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let api_key = config.api_key.clone().ok_or(LlmError::NotConfigured)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;
        Ok(Self { config, api_key, client })
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate(&self, prompt: String) -> Result<String, LlmError> {
        info!(
            "Calling LLM (model: {}, max_tokens: {})",
            self.config.model, self.config.max_tokens
        );

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage { role: "system".to_string(), content: SYSTEM_PROMPT.to_string() },
                ChatMessage { role: "user".to_string(), content: prompt },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if status == 429 {
            return Err(LlmError::RateLimited);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::ApiError(format!("HTTP {}: {}", status, error_text)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        if let Some(usage) = &parsed.usage {
            info!(
                "LLM completion generated. Tokens: {} prompt + {} completion = {} total",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        let content = parsed
            .choices
            .first()
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?
            .message
            .content
            .trim()
            .to_string();

        Ok(content)
    }
}

/// Stand-in when no API key is configured: every call fails with
/// `NotConfigured` so triggers surface a clear 503 instead of hanging.
pub struct DisabledProvider;

#[async_trait]
impl LlmProvider for DisabledProvider {
    async fn generate(&self, _prompt: String) -> Result<String, LlmError> {
        Err(LlmError::NotConfigured)
    }
}
