// ABOUTME: Per-request workflow state threaded through the pipeline stages
// ABOUTME: Each stage consumes the state and returns a new value; failures short-circuit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeSet;

use thucdon_core::models::{Intent, Menu, Product};
use thucdon_intelligence::WorkflowPhase;
use tracing::warn;

use crate::errors::{AppError, WorkflowError};
use crate::llm::TokenUsage;

/// Snapshot of one request's progress
///
/// Stages never mutate a shared record: they take the state by value and
/// hand back the next one. Once `error` is set every stage except the
/// response builder returns the state unchanged.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    /// Raw request text
    pub user_input: String,
    /// Acting user, if known
    pub user_id: Option<String>,
    /// Dishes recently suggested to this user, newest first
    pub previous_dishes: Vec<String>,
    /// Resolved intent, set by the intent stage
    pub intent: Option<Intent>,
    /// Candidates handed to the generator
    pub candidates: Vec<Product>,
    /// Raw documents returned by the knowledge store
    pub retrieved_context: Vec<String>,
    /// Current menu
    pub menu: Menu,
    /// Ingredient references flagged by the last pricing pass
    pub out_of_stock: BTreeSet<String>,
    /// Current phase of the state machine
    pub phase: WorkflowPhase,
    /// Fatal workflow failure, if any
    pub error: Option<WorkflowError>,
    /// Adjustment passes performed so far
    pub iteration_count: u32,
    /// Human-readable reason the last validation asked for adjustment
    pub budget_error: Option<String>,
    /// Tokens consumed by all generation calls
    pub token_usage: TokenUsage,
}

impl WorkflowState {
    /// Fresh state at request start
    #[must_use]
    pub fn new(
        user_input: impl Into<String>,
        user_id: Option<String>,
        previous_dishes: Vec<String>,
    ) -> Self {
        Self {
            user_input: user_input.into(),
            user_id,
            previous_dishes,
            intent: None,
            candidates: Vec::new(),
            retrieved_context: Vec::new(),
            menu: Menu::default(),
            out_of_stock: BTreeSet::new(),
            phase: WorkflowPhase::ParsingIntent,
            error: None,
            iteration_count: 0,
            budget_error: None,
            token_usage: TokenUsage::default(),
        }
    }

    /// Whether a stage has recorded a fatal failure
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Over budget and waiting for a reduction pass
    #[must_use]
    pub const fn needs_reduction(&self) -> bool {
        matches!(self.phase, WorkflowPhase::NeedsReduction)
    }

    /// Under-used budget and waiting for an enhancement pass
    #[must_use]
    pub const fn needs_enhancement(&self) -> bool {
        matches!(self.phase, WorkflowPhase::NeedsEnhancement)
    }

    /// Record a fatal failure
    #[must_use]
    pub fn fail(self, error: WorkflowError) -> Self {
        warn!(phase = %self.phase, error = %error, "Workflow failed");
        let phase = match error {
            WorkflowError::MaxRetriesExceededOverBudget { .. } => {
                WorkflowPhase::MaxRetriesExceededOverBudget
            }
            _ => WorkflowPhase::Failed,
        };
        Self {
            phase,
            error: Some(error),
            ..self
        }
    }

    /// Move to `phase`
    #[must_use]
    pub fn enter(self, phase: WorkflowPhase) -> Self {
        Self { phase, ..self }
    }

    /// Add the usage of one generation call
    #[must_use]
    pub fn add_usage(self, usage: Option<TokenUsage>) -> Self {
        let token_usage = usage.map_or(self.token_usage, |u| self.token_usage.saturating_add(u));
        Self {
            token_usage,
            ..self
        }
    }
}

/// Why a stage could not produce its output
#[derive(Debug)]
pub enum StageError {
    /// Abort the request and surface the error to the caller
    Fatal(AppError),
    /// Record on the state and let the response builder report it
    Failed(WorkflowError),
}

impl StageError {
    /// Classify a collaborator failure by its code
    #[must_use]
    pub fn from_provider(stage: &'static str, error: AppError) -> Self {
        if error.is_fatal() {
            Self::Fatal(error)
        } else {
            warn!(stage, code = ?error.code, error = %error.message, "Collaborator call failed");
            Self::Failed(WorkflowError::Provider {
                stage,
                code: error.code,
            })
        }
    }
}

impl From<WorkflowError> for StageError {
    fn from(error: WorkflowError) -> Self {
        Self::Failed(error)
    }
}
