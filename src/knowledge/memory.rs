// ABOUTME: In-memory knowledge store ranking documents by lowercase token overlap
// ABOUTME: Loadable from a JSON array of strings for local runs and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use super::KnowledgeStore;
use crate::errors::{AppError, AppResult};

/// Document list searched by token overlap
#[derive(Debug, Clone, Default)]
pub struct InMemoryKnowledgeStore {
    documents: Vec<String>,
}

impl InMemoryKnowledgeStore {
    /// Create a store over `documents`
    #[must_use]
    pub const fn new(documents: Vec<String>) -> Self {
        Self { documents }
    }

    /// Load a JSON array of document strings
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a string array.
    pub async fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).await.map_err(|e| {
            AppError::config(format!("Cannot read knowledge file {}: {e}", path.display()))
        })?;
        let documents: Vec<String> = serde_json::from_str(&raw).map_err(|e| {
            AppError::invalid_format(format!(
                "Knowledge file {} is not a JSON string array: {e}",
                path.display()
            ))
        })?;
        info!(path = %path.display(), documents = documents.len(), "Loaded knowledge documents");
        Ok(Self::new(documents))
    }

    /// Number of stored documents
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store holds no documents
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn tokens(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl KnowledgeStore for InMemoryKnowledgeStore {
    async fn search(&self, query: &str, top_k: usize) -> AppResult<Vec<String>> {
        let query_tokens = tokens(query);

        let mut scored: Vec<(usize, &String)> = self
            .documents
            .iter()
            .map(|doc| (tokens(doc).intersection(&query_tokens).count(), doc))
            .filter(|(score, _)| *score > 0)
            .collect();
        // stable sort keeps file order on ties
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        let results: Vec<String> = scored
            .into_iter()
            .take(top_k)
            .map(|(_, doc)| doc.clone())
            .collect();

        debug!(query, top_k, hits = results.len(), "Knowledge search");
        Ok(results)
    }
}
