// recommend-service-rs/src/llm_client.rs
//
// HTTP client for the recommendation model endpoint (OpenAI-compatible
// chat completions API).
//
// Configuration (.env file):
// - LLM_API_KEY: bearer credential for the model endpoint (required before any call)
// - LLM_API_URL: chat completions URL (defaults to the HuggingFace router)
// - LLM_MODEL: model identifier
// - LLM_MAX_TOKENS: output token ceiling (default: 700)
// - LLM_TIMEOUT_SECS: outbound request timeout (default: 60)

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::prompt::PromptPayload;

/// Fixed system instruction pinning the model to the recommendation domain
/// and JSON-only output.
const SYSTEM_PROMPT: &str = "You are a specialist assistant that ONLY answers DSA questions. \
    Return only valid JSON. Absolutely nothing else. \
    Keep the entire response under 800 characters. \
    Do not add extra text, comments, or explanations.";

const DEFAULT_API_URL: &str = "https://router.huggingface.co/v1/chat/completions";
const DEFAULT_MODEL: &str = "moonshotai/Kimi-K2-Thinking";
const DEFAULT_MAX_TOKENS: u32 = 700;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    role: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

// The response structs default every field: a body of any shape (error
// envelopes included) deserializes, and a missing message degrades to an
// empty string instead of an error.
#[derive(Debug, Default, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: ChatMessage,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u32,
}

/// Errors that abort a model call before dispatch. Transport and status
/// failures after dispatch degrade to an empty reply instead.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM_API_KEY is not set; cannot call the model endpoint")]
    MissingApiKey,

    #[error("Failed to serialize prompt payload: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    model: String,
    max_tokens: u32,
    api_key: Option<String>,
}

impl LlmClient {
    /// Creates a client configured from environment variables.
    pub fn new() -> Self {
        let api_url = config_rs::get_external_api_url("LLM_API_URL", DEFAULT_API_URL);
        let model = env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let max_tokens = env::var("LLM_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);
        let timeout_secs = env::var("LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let api_key = env::var("LLM_API_KEY").ok().filter(|key| !key.is_empty());

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_url,
            model,
            max_tokens,
            api_key,
        }
    }

    /// Constructor with explicit settings, bypassing the environment.
    pub fn with_settings(api_url: String, model: String, max_tokens: u32, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_url,
            model,
            max_tokens,
            api_key,
        }
    }

    /// Whether a credential is available for model calls.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Submit the assembled payload as the sole user message and return the
    /// model's raw text reply.
    ///
    /// Decoding is deterministic (temperature 0) and output is capped at the
    /// configured token ceiling. A missing credential fails before any
    /// network I/O; once dispatched, transport failures and non-success
    /// statuses degrade to an empty reply after a lenient body parse.
    pub async fn generate(&self, payload: &PromptPayload) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: serde_json::to_string(payload)?,
                },
            ],
            temperature: 0.0,
            max_tokens: self.max_tokens,
        };

        log::info!("Dispatching model request to {} (model: {})", self.api_url, self.model);

        let response = match self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                log::error!("Model request failed in transit: {}", err);
                return Ok(String::new());
            }
        };

        let status = response.status();
        if !status.is_success() {
            log::warn!("Model endpoint returned non-success status {}", status);
        }

        let body = response.text().await.unwrap_or_default();
        Ok(Self::extract_content(&body))
    }

    /// Pull `choices[0].message.content` out of a chat completions body,
    /// tolerating whatever shape the endpoint sent back.
    fn extract_content(body: &str) -> String {
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap_or_default();
        if let Some(usage) = &parsed.usage {
            log::info!("Model request completed. Used {} tokens", usage.total_tokens);
        }
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default()
    }
}
