// ABOUTME: Environment-based configuration for the LLM provider and data files
// ABOUTME: ServerConfig aggregates LlmConfig and DataConfig and validates them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-only configuration
//!
//! | Variable                    | Default                          |
//! |-----------------------------|----------------------------------|
//! | `THUCDON_LLM_PROVIDER`      | `openai`                         |
//! | `THUCDON_LLM_BASE_URL`      | provider default                 |
//! | `THUCDON_LLM_API_KEY`       | provider key variable            |
//! | `THUCDON_LLM_MODEL`         | provider default                 |
//! | `THUCDON_LLM_TEMPERATURE`   | `0.7`                            |
//! | `THUCDON_LLM_TIMEOUT_SECS`  | `60`                             |
//! | `THUCDON_CATALOG_PATH`      | `data/catalog.json`              |
//! | `THUCDON_KNOWLEDGE_PATH`    | `data/knowledge.json`            |

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::info;

use super::types::LlmProviderType;
use crate::errors::{AppError, AppResult, ErrorCode};

/// Environment variable for the API base URL
pub const LLM_BASE_URL_ENV: &str = "THUCDON_LLM_BASE_URL";
/// Environment variable for the API key
pub const LLM_API_KEY_ENV: &str = "THUCDON_LLM_API_KEY";
/// Environment variable for the model
pub const LLM_MODEL_ENV: &str = "THUCDON_LLM_MODEL";
/// Environment variable for the sampling temperature
pub const LLM_TEMPERATURE_ENV: &str = "THUCDON_LLM_TEMPERATURE";
/// Environment variable for the request timeout
pub const LLM_TIMEOUT_ENV: &str = "THUCDON_LLM_TIMEOUT_SECS";
/// Environment variable for the catalog file
pub const CATALOG_PATH_ENV: &str = "THUCDON_CATALOG_PATH";
/// Environment variable for the knowledge file
pub const KNOWLEDGE_PATH_ENV: &str = "THUCDON_KNOWLEDGE_PATH";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// Default catalog file
pub const DEFAULT_CATALOG_PATH: &str = "data/catalog.json";
/// Default knowledge file
pub const DEFAULT_KNOWLEDGE_PATH: &str = "data/knowledge.json";

/// LLM endpoint configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Selected provider
    pub provider: LlmProviderType,
    /// API base URL
    pub base_url: String,
    /// API key, if any
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Defaults for `provider` without reading the environment
    #[must_use]
    pub fn for_provider(provider: LlmProviderType) -> Self {
        Self {
            provider,
            base_url: provider.default_base_url().to_owned(),
            api_key: None,
            model: provider.default_model().to_owned(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load from environment variables
    ///
    /// # Errors
    ///
    /// Returns a `ConfigInvalid` error when a numeric variable does not parse.
    pub fn from_env() -> AppResult<Self> {
        let provider = LlmProviderType::from_env();
        let defaults = Self::for_provider(provider);

        let api_key = non_empty_var(LLM_API_KEY_ENV)
            .or_else(|| non_empty_var(provider.api_key_env_var()));

        Ok(Self {
            provider,
            base_url: non_empty_var(LLM_BASE_URL_ENV).unwrap_or(defaults.base_url),
            api_key,
            model: non_empty_var(LLM_MODEL_ENV).unwrap_or(defaults.model),
            temperature: parse_var(LLM_TEMPERATURE_ENV)?.unwrap_or(DEFAULT_TEMPERATURE),
            timeout_secs: parse_var(LLM_TIMEOUT_ENV)?.unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` when a hosted provider has no API key and
    /// `ConfigInvalid` for out-of-range values.
    pub fn validate(&self) -> AppResult<()> {
        if self.provider.requires_api_key() && self.api_key.is_none() {
            return Err(AppError::new(
                ErrorCode::ConfigMissing,
                format!(
                    "{} requires {LLM_API_KEY_ENV} or {}",
                    self.provider.display_name(),
                    self.provider.api_key_env_var()
                ),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AppError::new(
                ErrorCode::ConfigInvalid,
                format!("{LLM_TEMPERATURE_ENV} must be within [0, 2]"),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::new(
                ErrorCode::ConfigInvalid,
                format!("{LLM_TIMEOUT_ENV} must be greater than zero"),
            ));
        }
        Ok(())
    }
}

/// Locations of the catalog and knowledge files
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// Product catalog JSON
    pub catalog_path: PathBuf,
    /// Knowledge documents JSON
    pub knowledge_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            knowledge_path: PathBuf::from(DEFAULT_KNOWLEDGE_PATH),
        }
    }
}

impl DataConfig {
    /// Load from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            catalog_path: non_empty_var(CATALOG_PATH_ENV)
                .map_or(defaults.catalog_path, PathBuf::from),
            knowledge_path: non_empty_var(KNOWLEDGE_PATH_ENV)
                .map_or(defaults.knowledge_path, PathBuf::from),
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// LLM endpoint
    pub llm: LlmConfig,
    /// Data files
    pub data: DataConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but malformed.
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            llm: LlmConfig::from_env()?,
            data: DataConfig::from_env(),
        };
        info!(
            provider = %config.llm.provider,
            model = %config.llm.model,
            catalog = %config.data.catalog_path.display(),
            knowledge = %config.data.knowledge_path.display(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn validate(&self) -> AppResult<()> {
        self.llm.validate()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str) -> AppResult<Option<T>> {
    non_empty_var(name)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|_| {
                AppError::new(
                    ErrorCode::ConfigInvalid,
                    format!("{name} has an invalid value: {raw}"),
                )
            })
        })
        .transpose()
}
