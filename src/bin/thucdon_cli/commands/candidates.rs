// ABOUTME: Candidates command showing retrieval output without calling the LLM
// ABOUTME: Resolves the intent from flags and heuristics, then runs retrieval and filtering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thucdon::catalog::{CatalogSource, JsonFileCatalog};
use thucdon::config::ServerConfig;
use thucdon::errors::{AppError, AppResult};
use thucdon::intelligence::{resolve_intent, CatalogSnapshot, IntentFields};
use thucdon::knowledge::InMemoryKnowledgeStore;
use thucdon::workflow::{retrieve, Clock, StageError, SystemClock};

use crate::helpers::display::display_candidates;

pub async fn run(
    config: &ServerConfig,
    query: &str,
    budget: Option<u64>,
    people: u32,
    seed: Option<u64>,
) -> AppResult<()> {
    let fields = IntentFields {
        budget,
        num_people: people.max(1),
        preferences: Vec::new(),
    };
    let intent = resolve_intent(query, SystemClock.current_hour(), fields);

    let knowledge = InMemoryKnowledgeStore::from_json_file(&config.data.knowledge_path).await?;
    let products = JsonFileCatalog::new(&config.data.catalog_path).load().await?;
    let catalog = CatalogSnapshot::new(products);

    let mut rng = seed.map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
    let retrieval = match retrieve(&knowledge, &catalog, &intent, &mut rng).await {
        Ok(retrieval) => retrieval,
        Err(StageError::Fatal(e)) => return Err(e),
        Err(StageError::Failed(e)) => return Err(AppError::new(e.error_code(), e.to_string())),
    };

    display_candidates(&intent, &retrieval);
    Ok(())
}
