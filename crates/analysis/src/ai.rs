//! Model endpoint client
//!
//! Provides:
//! - `AiClient` trait used by the orchestrator
//! - Anthropic Messages API client (single attempt, bounded by a timeout)
//! - Deterministic mock client for local development

use crate::errors::{AnalysisError, Result};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use thesisai_common::config::AiConfig;
use tracing::{debug, instrument};

/// Raw model output plus reported token usage
#[derive(Debug, Clone, PartialEq)]
pub struct AiCompletion {
    pub text: String,
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
}

impl AiCompletion {
    /// Input plus output tokens, when the endpoint reported any
    pub fn total_tokens(&self) -> Option<u64> {
        match (self.input_tokens, self.output_tokens) {
            (None, None) => None,
            (input, output) => Some(input.unwrap_or(0) + output.unwrap_or(0)),
        }
    }
}

/// Trait for model calls
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Wait until the request budget allows another call
    async fn ready(&self) {}

    /// Send one prompt and wait for the full response
    async fn call(&self, prompt: &str) -> Result<AiCompletion>;

    /// Get the model name
    fn model_name(&self) -> &str;
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: Option<u64>,
    output_tokens: Option<u64>,
}

/// Anthropic Messages API client
pub struct AnthropicClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    api_version: String,
    model: String,
    max_tokens: u32,
    timeout_secs: u64,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl AnthropicClient {
    pub fn new(config: &AiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AnalysisError::Configuration("ai.api_key is required".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AnalysisError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        let limiter = NonZeroU32::new(config.requests_per_minute)
            .map(|rpm| RateLimiter::direct(Quota::per_minute(rpm)));

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key,
            api_version: config.api_version.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout_secs: config.timeout_secs,
            limiter,
        })
    }

    fn map_send_error(&self, e: reqwest::Error) -> AnalysisError {
        if e.is_timeout() {
            AnalysisError::Timeout { timeout_secs: self.timeout_secs }
        } else {
            AnalysisError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl AiClient for AnthropicClient {
    async fn ready(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_chars = prompt.len()))]
    async fn call(&self, prompt: &str) -> Result<AiCompletion> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message { role: "user", content: prompt }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            return Err(AnalysisError::upstream_status(status.as_u16(), &body));
        }

        let envelope: MessagesResponse = serde_json::from_str(&body).map_err(|e| {
            AnalysisError::MalformedResponse(format!("unreadable response envelope: {}", e))
        })?;

        let text = envelope
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .ok_or_else(|| {
                AnalysisError::MalformedResponse("response envelope has no text content".to_string())
            })?;

        let (input_tokens, output_tokens) = envelope
            .usage
            .map(|u| (u.input_tokens, u.output_tokens))
            .unwrap_or((None, None));

        debug!(chars = text.len(), ?input_tokens, ?output_tokens, "Model call complete");

        Ok(AiCompletion { text, input_tokens, output_tokens })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

const MOCK_RESPONSE: &str = r#"```json
{
  "scores": {
    "structure": 72,
    "argumentation": 68,
    "methodology": 65,
    "writingQuality": 74,
    "examinability": 70,
    "overall": 70
  },
  "feedback": [
    {
      "section": "Introduction",
      "type": "STRENGTH",
      "severity": "LOW",
      "title": "Clear motivation",
      "content": "The problem statement is well motivated.",
      "pageReference": "1"
    },
    {
      "section": "Methodology",
      "type": "WEAKNESS",
      "severity": "HIGH",
      "title": "Sampling not justified",
      "content": "Explain why the chosen sample answers the research question.",
      "pageReference": "Section 3.2"
    },
    {
      "section": "Conclusion",
      "type": "SUGGESTION",
      "severity": "MEDIUM",
      "title": "State limitations",
      "content": "Add a short limitations paragraph before the conclusion."
    }
  ],
  "vivaQuestions": [
    {
      "question": "How would your findings change with a larger sample?",
      "category": "Methodology",
      "difficulty": "MEDIUM",
      "preparation": "Prepare a short sensitivity argument."
    }
  ],
  "summary": "A coherent draft whose methodology needs stronger justification."
}
```"#;

/// Mock client returning a fixed, well-formed evaluation
pub struct MockAiClient;

#[async_trait]
impl AiClient for MockAiClient {
    async fn call(&self, prompt: &str) -> Result<AiCompletion> {
        Ok(AiCompletion {
            text: MOCK_RESPONSE.to_string(),
            input_tokens: Some((prompt.len() / 4) as u64),
            output_tokens: Some((MOCK_RESPONSE.len() / 4) as u64),
        })
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

/// Create a model client based on configuration
pub fn create_ai_client(config: &AiConfig) -> Result<Arc<dyn AiClient>> {
    match config.provider.as_str() {
        "anthropic" => Ok(Arc::new(AnthropicClient::new(config)?)),
        "mock" => {
            tracing::warn!("Using mock AI client; analyses will not reflect document content");
            Ok(Arc::new(MockAiClient))
        }
        other => Err(AnalysisError::Configuration(format!("unknown AI provider: {}", other))),
    }
}
