// ABOUTME: OpenAI-compatible chat completion adapter for OpenAI, Groq and local endpoints
// ABOUTME: Maps HTTP and transport failures onto structured error codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI`-Compatible Provider
//!
//! One adapter covers every supported backend because `OpenAI`, Groq, Ollama,
//! vLLM and `LocalAI` all speak the same `chat/completions` dialect.
//!
//! ## Example
//!
//! ```rust,no_run
//! use thucdon::config::LlmConfig;
//! use thucdon::errors::AppError;
//! use thucdon::llm::{ChatMessage, ChatRequest, LlmProvider, OpenAiCompatibleProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let provider = OpenAiCompatibleProvider::from_llm_config(&LlmConfig::from_env()?)?;
//!     let request = ChatRequest::new(vec![ChatMessage::user("Xin chào")]);
//!     let response = provider.complete(&request).await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Value;
use tracing::{debug, error, instrument};

use super::{
    classify_http_status, classify_provider_message, ChatMessage, ChatRequest, ChatResponse,
    LlmCapabilities, LlmProvider, TokenUsage,
};
use crate::config::{LlmConfig, LlmProviderType};
use crate::errors::{AppError, ErrorCode};

/// Connection timeout applied on top of the request timeout
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Maximum characters of a non-JSON error body kept in messages
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

// ============================================================================
// Configuration
// ============================================================================

/// Resolved adapter settings
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Which backend this adapter talks to
    pub provider: LlmProviderType,
    /// Base URL, without the trailing `chat/completions`
    pub base_url: String,
    /// Bearer token, if the backend requires one
    pub api_key: Option<String>,
    /// Model used when a request does not name one
    pub default_model: String,
    /// Temperature used when a request does not set one
    pub default_temperature: f32,
    /// Overall request timeout
    pub timeout: Duration,
    /// Capabilities advertised to callers
    pub capabilities: LlmCapabilities,
}

impl From<&LlmConfig> for OpenAiCompatibleConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            provider: config.provider,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            default_model: config.model.clone(),
            default_temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_secs),
            capabilities: LlmCapabilities::JSON_MODE | LlmCapabilities::SYSTEM_MESSAGES,
        }
    }
}

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    model: Option<String>,
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl From<OpenAiUsage> for TokenUsage {
    fn from(usage: OpenAiUsage) -> Self {
        Self {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
    code: Option<Value>,
}

// ============================================================================
// Provider
// ============================================================================

/// Chat completion client for any `OpenAI`-compatible endpoint
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a provider from resolved settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        debug!(
            provider = config.provider.as_str(),
            base_url = %config.base_url,
            model = %config.default_model,
            "Initialized OpenAI-compatible provider"
        );

        Ok(Self { client, config })
    }

    /// Create a provider from the environment-derived LLM configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the settings are invalid, or an
    /// error if the HTTP client cannot be built.
    pub fn from_llm_config(config: &LlmConfig) -> Result<Self, AppError> {
        config.validate()?;
        Self::new(OpenAiCompatibleConfig::from(config))
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.config.base_url)
    }

    fn add_auth_header(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) if !key.is_empty() => builder.bearer_auth(key),
            _ => builder,
        }
    }

    fn service_name(&self) -> &'static str {
        self.config.provider.display_name()
    }

    /// Turn a non-success response into a structured error
    fn parse_error_response(&self, status: StatusCode, body: &str) -> AppError {
        let service = self.service_name();

        let (message, hint) = match serde_json::from_str::<OpenAiErrorResponse>(body) {
            Ok(parsed) => {
                let code_text = parsed
                    .error
                    .code
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                let hint = format!(
                    "{} {} {code_text}",
                    parsed.error.message,
                    parsed.error.error_type.as_deref().unwrap_or_default()
                );
                (parsed.error.message, hint)
            }
            Err(_) => {
                let preview: String = body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
                (format!("API error ({status}): {preview}"), preview)
            }
        };

        // Quota exhaustion arrives as 429 on most backends; the body tells it apart.
        let code = match classify_http_status(status.as_u16()) {
            Some(ErrorCode::ExternalRateLimited)
                if classify_provider_message(&hint) == ErrorCode::QuotaExceeded =>
            {
                ErrorCode::QuotaExceeded
            }
            Some(code) => code,
            None => classify_provider_message(&hint),
        };

        error!(
            provider = self.config.provider.as_str(),
            status = status.as_u16(),
            code = ?code,
            "LLM request failed"
        );

        AppError::new(code, format!("{service}: {message}"))
    }

    fn transport_error(&self, err: &reqwest::Error) -> AppError {
        let service = self.service_name();
        if err.is_timeout() {
            AppError::timeout(service, format!("Request timed out: {err}"))
        } else if err.is_connect() {
            AppError::new(
                ErrorCode::ExternalServiceUnavailable,
                format!(
                    "{service}: cannot connect to {}: {err}",
                    self.config.base_url
                ),
            )
        } else {
            AppError::new(
                classify_provider_message(&err.to_string()),
                format!("{service}: {err}"),
            )
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        self.config.provider.as_str()
    }

    fn display_name(&self) -> &'static str {
        self.config.provider.display_name()
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.config.capabilities
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(provider = self.config.provider.as_str()))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        let response_format = (request.json_mode && self.config.capabilities.supports_json_mode())
            .then(|| json!({ "type": "json_object" }));

        let openai_request = OpenAiRequest {
            model: model.to_owned(),
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            temperature: request
                .temperature
                .or(Some(self.config.default_temperature)),
            max_tokens: request.max_tokens,
            response_format,
        };

        debug!(
            model,
            message_count = openai_request.messages.len(),
            json_mode = request.json_mode,
            "Sending chat completion request"
        );

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .json(&openai_request);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e))?;

        if !status.is_success() {
            return Err(self.parse_error_response(status, &body));
        }

        let parsed: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            AppError::invalid_response(self.service_name(), format!("Malformed response: {e}"))
        })?;

        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            AppError::invalid_response(self.service_name(), "API returned no choices")
        })?;

        let content = choice.message.content.unwrap_or_default();
        let usage = parsed.usage.map(TokenUsage::from);

        debug!(
            content_len = content.len(),
            total_tokens = usage.map_or(0, |u| u.total_tokens),
            "Received chat completion"
        );

        Ok(ChatResponse {
            content,
            model: parsed.model.unwrap_or_else(|| model.to_owned()),
            usage,
            finish_reason: choice.finish_reason,
        })
    }
}
