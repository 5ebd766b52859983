// ABOUTME: LLM provider abstraction layer for pluggable text generation
// ABOUTME: Defines the provider contract, chat types, and structured failure classification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Provider Service Provider Interface
//!
//! The workflow talks to language models only through [`LlmProvider`]. Adapters
//! translate every upstream failure into an [`ErrorCode`] so the workflow can
//! tell fatal conditions (quota, throttling, credentials) from recoverable ones
//! without inspecting message text.
//!
//! ## Example: Using a Provider
//!
//! ```rust,no_run
//! use thucdon::llm::{ChatMessage, ChatRequest, LlmProvider};
//!
//! async fn example(provider: &dyn LlmProvider) {
//!     let request = ChatRequest::new(vec![ChatMessage::user("Gợi ý bữa trưa 100k")])
//!         .with_json_mode();
//!     let response = provider.complete(&request).await;
//! }
//! ```

mod openai_compatible;
pub mod prompts;

pub use openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, ErrorCode};

// ============================================================================
// Capability Flags
// ============================================================================

bitflags::bitflags! {
    /// LLM provider capability flags
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LlmCapabilities: u8 {
        /// Provider supports JSON mode output
        const JSON_MODE = 0b0000_0001;
        /// Provider supports system messages
        const SYSTEM_MESSAGES = 0b0000_0010;
    }
}

impl LlmCapabilities {
    /// Check if JSON mode is supported
    #[must_use]
    pub const fn supports_json_mode(&self) -> bool {
        self.contains(Self::JSON_MODE)
    }

    /// Check if system messages are supported
    #[must_use]
    pub const fn supports_system_messages(&self) -> bool {
        self.contains(Self::SYSTEM_MESSAGES)
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction message
    System,
    /// User input message
    User,
    /// Assistant response message
    Assistant,
}

impl MessageRole {
    /// Convert to string representation for API calls
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single message in a chat conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Configuration for a chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Model identifier (provider-specific)
    pub model: Option<String>,
    /// Temperature for response randomness (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Ask for a JSON object response when the provider supports it
    pub json_mode: bool,
}

impl ChatRequest {
    /// Create a new chat request with messages
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            max_tokens: None,
            json_mode: false,
        }
    }

    /// Set the model to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Request JSON object output
    #[must_use]
    pub const fn with_json_mode(mut self) -> Self {
        self.json_mode = true;
        self
    }
}

/// Response from a chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated message content
    pub content: String,
    /// Model used for generation
    pub model: String,
    /// Token usage statistics
    pub usage: Option<TokenUsage>,
    /// Finish reason (stop, length, etc.)
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Sum two usage records
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self {
            prompt_tokens: self.prompt_tokens.saturating_add(other.prompt_tokens),
            completion_tokens: self
                .completion_tokens
                .saturating_add(other.completion_tokens),
            total_tokens: self.total_tokens.saturating_add(other.total_tokens),
        }
    }
}

// ============================================================================
// Provider Trait
// ============================================================================

/// LLM provider trait for chat completion
///
/// Implementations must report failures as [`AppError`]s whose code reflects
/// the upstream condition; see [`classify_http_status`] and
/// [`classify_provider_message`].
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Unique provider identifier (e.g., "openai", "groq", "local")
    fn name(&self) -> &'static str;

    /// Human-readable display name for the provider
    fn display_name(&self) -> &'static str;

    /// Provider capabilities
    fn capabilities(&self) -> LlmCapabilities;

    /// Default model to use if not specified in request
    fn default_model(&self) -> &str;

    /// Perform a chat completion
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError>;
}

// ============================================================================
// Failure Classification
// ============================================================================

/// Map an upstream HTTP status to an error code, if it is specific enough
#[must_use]
pub const fn classify_http_status(status: u16) -> Option<ErrorCode> {
    match status {
        401 | 403 => Some(ErrorCode::ExternalAuthFailed),
        429 => Some(ErrorCode::ExternalRateLimited),
        408 | 504 => Some(ErrorCode::ExternalTimeout),
        // upstream rejected our request; never the caller's input
        400 | 422 => Some(ErrorCode::ExternalInvalidResponse),
        502 | 503 => Some(ErrorCode::ExternalServiceUnavailable),
        _ => None,
    }
}

/// Map opaque provider failure text to an error code
///
/// Adapters call this only when no status code is available or the status
/// was not specific; the workflow never inspects message text itself.
#[must_use]
pub fn classify_provider_message(message: &str) -> ErrorCode {
    let lower = message.to_lowercase();
    let any = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if any(&[
        "quota",
        "resource exhausted",
        "resource_exhausted",
        "resourceexhausted",
    ]) {
        ErrorCode::QuotaExceeded
    } else if any(&["429", "rate limit", "rate_limit", "ratelimit", "too many requests"]) {
        ErrorCode::ExternalRateLimited
    } else if any(&[
        "api key",
        "api_key",
        "unauthorized",
        "401",
        "authentication",
        "invalid_api_key",
    ]) {
        ErrorCode::ExternalAuthFailed
    } else if any(&["timed out", "timeout", "deadline"]) {
        ErrorCode::ExternalTimeout
    } else {
        ErrorCode::ExternalServiceError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_provider_message() {
        assert_eq!(
            classify_provider_message("You exceeded your current quota"),
            ErrorCode::QuotaExceeded
        );
        assert_eq!(
            classify_provider_message("HTTP 429 Too Many Requests"),
            ErrorCode::ExternalRateLimited
        );
        assert_eq!(
            classify_provider_message("Incorrect API key provided"),
            ErrorCode::ExternalAuthFailed
        );
        assert_eq!(
            classify_provider_message("operation timed out"),
            ErrorCode::ExternalTimeout
        );
        assert_eq!(
            classify_provider_message("connection reset by peer"),
            ErrorCode::ExternalServiceError
        );
    }

    #[test]
    fn test_token_usage_sum() {
        let a = TokenUsage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        };
        assert_eq!(a.saturating_add(a).total_tokens, 30);
    }
}
