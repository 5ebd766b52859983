// ABOUTME: Suggest command running the full menu workflow for one request
// ABOUTME: Prints either a readable menu or the raw JSON response
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use thucdon::catalog::JsonFileCatalog;
use thucdon::config::ServerConfig;
use thucdon::errors::{AppResult, ErrorResponse};
use thucdon::knowledge::InMemoryKnowledgeStore;
use thucdon::llm::OpenAiCompatibleProvider;
use thucdon::workflow::{MenuRequest, MenuWorkflow};
use tracing::info;

use crate::helpers::display::{display_json, display_response};

pub async fn run(
    config: &ServerConfig,
    query: String,
    user_id: Option<String>,
    seed: Option<u64>,
    json: bool,
) -> AppResult<()> {
    config.validate()?;

    let provider = OpenAiCompatibleProvider::from_llm_config(&config.llm)?;
    let knowledge = InMemoryKnowledgeStore::from_json_file(&config.data.knowledge_path).await?;
    let catalog = JsonFileCatalog::new(&config.data.catalog_path);

    let workflow = MenuWorkflow::new(Arc::new(provider), Arc::new(knowledge), Arc::new(catalog))
        .with_temperature(config.llm.temperature);
    let workflow = match seed {
        Some(seed) => workflow.with_seed(seed),
        None => workflow,
    };

    let request = match user_id {
        Some(user_id) => MenuRequest::new(query).with_user_id(user_id),
        None => MenuRequest::new(query),
    };

    let response = match workflow.run(request).await {
        Ok(response) => response,
        Err(error) if json => {
            // keep stdout machine-readable; upstream text stays in the logs
            display_json(&ErrorResponse::from(&error))?;
            return Err(error);
        }
        Err(error) => return Err(error),
    };
    info!(
        status = response.status_code,
        process_time = response.metadata.process_time,
        "Suggestion finished"
    );

    if json {
        display_json(&response)
    } else {
        display_response(&response);
        Ok(())
    }
}
