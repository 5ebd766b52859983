// ABOUTME: Main library entry point for the Thucdon budget menu planner
// ABOUTME: Exposes collaborator ports, the LLM adapter and the menu workflow
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Thucdon
//!
//! Suggests a Vietnamese meal menu that fits a budget. A request is parsed
//! into an intent, candidate products are retrieved from a knowledge store,
//! a language model proposes a menu, and the menu is repriced against the
//! catalog and adjusted until its total falls inside the budget band or the
//! adjustment limit is reached.
//!
//! ## Architecture
//!
//! - **`thucdon-core`**: errors, models and constants
//! - **`thucdon-intelligence`**: pure algorithms (pricing, validation, filtering)
//! - **llm**: provider trait, `OpenAI`-compatible adapter and prompts
//! - **knowledge** / **catalog**: collaborator ports with local implementations
//! - **workflow**: stages and the orchestrator
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use thucdon::catalog::JsonFileCatalog;
//! use thucdon::config::ServerConfig;
//! use thucdon::errors::AppResult;
//! use thucdon::knowledge::InMemoryKnowledgeStore;
//! use thucdon::llm::OpenAiCompatibleProvider;
//! use thucdon::workflow::{MenuRequest, MenuWorkflow};
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let provider = OpenAiCompatibleProvider::from_llm_config(&config.llm)?;
//!     let knowledge = InMemoryKnowledgeStore::from_json_file(&config.data.knowledge_path).await?;
//!     let catalog = JsonFileCatalog::new(&config.data.catalog_path);
//!
//!     let workflow = MenuWorkflow::new(Arc::new(provider), Arc::new(knowledge), Arc::new(catalog));
//!     let response = workflow.run(MenuRequest::new("Bữa trưa 100k cho 2 người")).await?;
//!     println!("{}", response.message);
//!     Ok(())
//! }
//! ```

/// Product catalog port and implementations
pub mod catalog;

/// Environment-based configuration
pub mod config;

/// Unified error handling re-exported from the core crate
pub mod errors;

/// Knowledge store port and implementations
pub mod knowledge;

/// LLM provider abstraction, adapter and prompts
pub mod llm;

/// Tracing subscriber configuration
pub mod logging;

/// Menu workflow
pub mod workflow;

pub use thucdon_core::{constants, models};
pub use thucdon_intelligence as intelligence;
