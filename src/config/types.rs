// ABOUTME: Configuration type definitions for LLM provider selection
// ABOUTME: LlmProviderType with per-provider endpoint, model and credential defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// LLM provider selection for intent parsing and menu generation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderType {
    /// `OpenAI` chat completions API (default)
    #[default]
    OpenAi,
    /// Groq `OpenAI`-compatible endpoint
    Groq,
    /// Local `OpenAI`-compatible endpoint (Ollama, vLLM, `LocalAI`)
    Local,
}

impl LlmProviderType {
    /// Environment variable name for LLM provider selection
    pub const ENV_VAR: &'static str = "THUCDON_LLM_PROVIDER";

    /// Parse from string with fallback to default
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "groq" => Self::Groq,
            "local" | "ollama" | "vllm" | "localai" => Self::Local,
            _ => Self::OpenAi, // Default fallback (including "openai")
        }
    }

    /// Load from environment variable
    #[must_use]
    pub fn from_env() -> Self {
        env::var(Self::ENV_VAR)
            .map(|s| Self::from_str_or_default(&s))
            .unwrap_or_default()
    }

    /// Default API base URL
    #[must_use]
    pub const fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Groq => "https://api.groq.com/openai/v1",
            Self::Local => "http://localhost:11434/v1",
        }
    }

    /// Default model identifier
    #[must_use]
    pub const fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::Groq => "llama-3.3-70b-versatile",
            Self::Local => "qwen2.5:14b-instruct",
        }
    }

    /// Provider-specific API key variable, read when `THUCDON_LLM_API_KEY` is unset
    #[must_use]
    pub const fn api_key_env_var(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Groq => "GROQ_API_KEY",
            Self::Local => "LOCAL_LLM_API_KEY",
        }
    }

    /// Whether requests without an API key are rejected upstream
    #[must_use]
    pub const fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Local)
    }

    /// Short identifier used in logs and selection
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Groq => "groq",
            Self::Local => "local",
        }
    }

    /// Human-readable name
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Groq => "Groq",
            Self::Local => "Local LLM",
        }
    }
}

impl Display for LlmProviderType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
