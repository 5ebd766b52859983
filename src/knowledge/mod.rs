// ABOUTME: Knowledge store abstraction used to retrieve candidate product documents
// ABOUTME: Pluggable backend support following the provider trait pattern
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// In-memory knowledge store implementation
pub mod memory;

pub use memory::InMemoryKnowledgeStore;

use async_trait::async_trait;

use crate::errors::AppResult;

/// Free-text document search
///
/// The workflow treats results as opaque documents and extracts product
/// lines from them; the store imposes no schema.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Return at most `top_k` documents relevant to `query`, best first
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried.
    async fn search(&self, query: &str, top_k: usize) -> AppResult<Vec<String>>;
}
