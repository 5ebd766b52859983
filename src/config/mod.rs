// ABOUTME: Configuration management module for provider and data file settings
// ABOUTME: Environment-only configuration with typed provider selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! - **Environment**: LLM endpoint and data file locations from environment variables
//! - **Types**: Provider selection with per-provider defaults

/// Environment and server configuration
pub mod environment;
/// Shared configuration enums
pub mod types;

pub use environment::{DataConfig, LlmConfig, ServerConfig};
pub use types::LlmProviderType;
