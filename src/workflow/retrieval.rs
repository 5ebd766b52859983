// ABOUTME: Candidate retrieval stage: query construction, document search and filtering
// ABOUTME: Produces the bounded, shuffled candidate list handed to the generator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use rand::Rng;
use thucdon_core::constants::retrieval::KNOWLEDGE_TOP_K;
use thucdon_core::models::{Intent, Product};
use thucdon_intelligence::{
    enrich_from_catalog, parse_product_documents, select_candidates, CandidateSelection,
    CatalogSnapshot,
};
use tracing::{info, instrument};

use super::state::StageError;
use crate::errors::WorkflowError;
use crate::knowledge::KnowledgeStore;

/// Documents and the candidates selected from them
#[derive(Debug, Clone)]
pub struct Retrieval {
    /// Query sent to the store
    pub query: String,
    /// Raw documents
    pub documents: Vec<String>,
    /// Filtered candidates and filter counters
    pub selection: CandidateSelection,
}

impl Retrieval {
    /// Final candidate list
    #[must_use]
    pub fn candidates(&self) -> &[Product] {
        &self.selection.candidates
    }
}

/// Knowledge-store query for `intent`
#[must_use]
pub fn build_query(intent: &Intent) -> String {
    let mut query = format!(
        "Sản phẩm giá < {} VND cho bữa {}",
        intent.budget,
        intent.meal_type.label()
    );
    if !intent.preferences.is_empty() {
        query.push_str(", sở thích: ");
        query.push_str(&intent.preferences.join(", "));
    }
    query
}

/// Search, parse, enrich and filter candidates for `intent`
///
/// # Errors
///
/// Fails with `EmptyRetrieval` when the store returns nothing,
/// `NoValidCandidates` when filtering leaves nothing, or a provider failure
/// when the store itself errors.
#[instrument(skip_all, fields(budget = intent.budget))]
pub async fn retrieve<R: Rng + ?Sized + Send>(
    store: &dyn KnowledgeStore,
    catalog: &CatalogSnapshot,
    intent: &Intent,
    rng: &mut R,
) -> Result<Retrieval, StageError> {
    let query = build_query(intent);
    let documents = store
        .search(&query, KNOWLEDGE_TOP_K)
        .await
        .map_err(|e| StageError::from_provider("retrieval", e))?;

    if documents.is_empty() {
        return Err(WorkflowError::EmptyRetrieval { query }.into());
    }

    let parsed = enrich_from_catalog(parse_product_documents(&documents), catalog);
    let retrieved = parsed.len();
    let selection = select_candidates(parsed, intent, rng);

    if selection.candidates.is_empty() {
        return Err(WorkflowError::NoValidCandidates { retrieved }.into());
    }

    info!(
        documents = documents.len(),
        candidates = selection.candidates.len(),
        "Retrieved candidates"
    );

    Ok(Retrieval {
        query,
        documents,
        selection,
    })
}
