// ABOUTME: Menu planning algorithms: intent heuristics, candidate filtering, pricing and budget control
// ABOUTME: Pure computation crate with no network I/O, shared by the workflow and benchmarks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Thucdon Intelligence
//!
//! Deterministic building blocks of the menu workflow. Everything here is
//! synchronous and side-effect free apart from the shared [`UserHistory`].
//! Randomness is always injected by the caller.

/// Ordered budget correction directives
pub mod adjustment;
/// Budget band validation and workflow phases
pub mod budget_validator;
/// Candidate extraction, exclusion, ordering and shuffling
pub mod candidate_filter;
/// Case-insensitive catalog lookup
pub mod catalog_snapshot;
/// Meal-time detection, default budgets and intent sanitizing
pub mod intent_heuristics;
/// Lenient JSON parsing for generator output
pub mod json_repair;
/// Authoritative menu pricing
pub mod pricing;
/// In-memory recent-dish history
pub mod user_history;

pub use adjustment::{plan_adjustment, AdjustmentDirection, AdjustmentDirective, AdjustmentPlan};
pub use budget_validator::{
    format_vnd, BudgetAssessment, BudgetValidator, BudgetVerdict, WorkflowPhase,
};
pub use candidate_filter::{
    enrich_from_catalog, parse_product_documents, select_candidates, CandidateSelection,
};
pub use catalog_snapshot::CatalogSnapshot;
pub use intent_heuristics::{
    default_budget, detect_meal_type, meal_type_for_hour, resolve_intent, IntentFields,
};
pub use json_repair::{JsonRepair, RepairError, RepairStep};
pub use pricing::{price_menu, PricedMenu};
pub use user_history::{HistoryConfig, UserHistory};
