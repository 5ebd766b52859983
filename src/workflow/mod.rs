// ABOUTME: Budget-constrained menu workflow: stages, state and orchestration
// ABOUTME: Wires the LLM, knowledge store, catalog and user history into one pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Time source for meal-time fallback
pub mod clock;
/// Menu proposal, adjustment and validation
pub mod generation;
/// Intent extraction stage
pub mod intent;
/// Orchestrator
pub mod pipeline;
/// Response builder
pub mod response;
/// Candidate retrieval stage
pub mod retrieval;
/// Per-request state
pub mod state;

pub use clock::{Clock, FixedClock, SystemClock};
pub use generation::{enforce_candidate_closure, parse_menu, GeneratedMenu, MenuGenerator};
pub use intent::{ExtractedIntent, IntentExtractor};
pub use pipeline::{MenuRequest, MenuWorkflow};
pub use response::{
    build_response, DishSummary, IngredientLine, MenuData, MenuResponse, ResponseMetadata,
};
pub use retrieval::{build_query, retrieve, Retrieval};
pub use state::{StageError, WorkflowState};
