// ABOUTME: Menu workflow orchestrator driving intent, retrieval, generation and the budget loop
// ABOUTME: Collaborators are injected at construction; no process-wide globals are consulted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Menu Workflow
//!
//! One request runs as a fixed sequence:
//!
//! ```text
//! intent -> retrieval -> generation -> price -> validate
//!                                        ^           |
//!                                        +- adjust <-+  (at most max_iterations times)
//! -> response
//! ```
//!
//! Every adjustment increments `iteration_count` before the generator is
//! called, and every adjusted menu is repriced before it is validated.

use std::sync::Arc;
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thucdon_core::constants::history::PREVIOUS_DISHES_LIMIT;
use thucdon_intelligence::{
    plan_adjustment, price_menu, BudgetValidator, BudgetVerdict, CatalogSnapshot, UserHistory,
    WorkflowPhase,
};
use tracing::{debug, info, instrument};

use super::clock::{Clock, SystemClock};
use super::generation::MenuGenerator;
use super::intent::IntentExtractor;
use super::response::{build_response, MenuResponse};
use super::retrieval::retrieve;
use super::state::{StageError, WorkflowState};
use crate::catalog::CatalogSource;
use crate::errors::{AppError, AppResult, WorkflowError};
use crate::knowledge::KnowledgeStore;
use crate::llm::prompts::GenerationContext;
use crate::llm::LlmProvider;

/// Inbound suggestion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuRequest {
    /// Free-text request, required
    pub query: String,
    /// Acting user for dish history
    pub user_id: Option<String>,
}

impl MenuRequest {
    /// Anonymous request for `query`
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            user_id: None,
        }
    }

    /// Attach the acting user
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Reject blank queries
    ///
    /// # Errors
    ///
    /// Returns an `InvalidInput` error when the query is empty or whitespace.
    pub fn validate(&self) -> AppResult<()> {
        if self.query.trim().is_empty() {
            return Err(AppError::invalid_input("query must not be empty"));
        }
        Ok(())
    }
}

/// Budget-constrained menu suggestion workflow
pub struct MenuWorkflow {
    provider: Arc<dyn LlmProvider>,
    knowledge: Arc<dyn KnowledgeStore>,
    catalog: Arc<dyn CatalogSource>,
    history: Arc<UserHistory>,
    clock: Arc<dyn Clock>,
    validator: BudgetValidator,
    seed: Option<u64>,
    temperature: Option<f32>,
}

impl MenuWorkflow {
    /// Workflow over the given collaborators with a fresh history and the system clock
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        knowledge: Arc<dyn KnowledgeStore>,
        catalog: Arc<dyn CatalogSource>,
    ) -> Self {
        Self {
            provider,
            knowledge,
            catalog,
            history: Arc::new(UserHistory::new()),
            clock: Arc::new(SystemClock),
            validator: BudgetValidator::default(),
            seed: None,
            temperature: None,
        }
    }

    /// Share a history with other workflows
    #[must_use]
    pub fn with_history(mut self, history: Arc<UserHistory>) -> Self {
        self.history = history;
        self
    }

    /// Replace the time source
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the budget band configuration
    #[must_use]
    pub const fn with_validator(mut self, validator: BudgetValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Make candidate shuffling deterministic
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sampling temperature for menu generation
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Shared dish history
    #[must_use]
    pub fn history(&self) -> &Arc<UserHistory> {
        &self.history
    }

    /// Run one request end to end
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank query, and the provider error for
    /// quota, rate-limit or authentication failures. Every other outcome,
    /// including workflow failures, is a [`MenuResponse`].
    #[instrument(skip_all, fields(user_id = ?request.user_id))]
    pub async fn run(&self, request: MenuRequest) -> AppResult<MenuResponse> {
        request.validate()?;
        let started = Instant::now();

        let previous_dishes = request
            .user_id
            .as_deref()
            .map(|user| self.history.recent_dishes(user, PREVIOUS_DISHES_LIMIT))
            .unwrap_or_default();
        let state = WorkflowState::new(request.query, request.user_id, previous_dishes);

        let state = self.execute(state).await?;
        Ok(build_response(&state, started.elapsed(), &self.history))
    }

    /// Run every stage up to, but excluding, the response builder
    ///
    /// # Errors
    ///
    /// Returns fatal provider errors only.
    pub async fn execute(&self, state: WorkflowState) -> AppResult<WorkflowState> {
        let state = self.parse_intent(state).await?;
        let (state, catalog) = self.load_catalog(state).await?;
        let state = self.retrieve_candidates(state, &catalog).await?;
        let state = self.generate_menu(state).await?;
        let state = self.price_and_validate(state, &catalog);
        let state = self.adjust_until_settled(state, &catalog).await?;

        Ok(if state.is_failed() {
            state
        } else {
            state.enter(WorkflowPhase::Finalizing)
        })
    }

    async fn parse_intent(&self, state: WorkflowState) -> AppResult<WorkflowState> {
        if state.is_failed() {
            return Ok(state);
        }
        let extractor = IntentExtractor::new(self.provider.as_ref(), self.clock.as_ref());
        let extracted = extractor.extract(&state.user_input).await?;

        let state = state.add_usage(extracted.usage);
        if extracted.intent.budget == 0 {
            return Ok(state.fail(WorkflowError::MissingIntentField { field: "budget" }));
        }
        Ok(WorkflowState {
            intent: Some(extracted.intent),
            ..state
        }
        .enter(WorkflowPhase::Retrieving))
    }

    async fn load_catalog(
        &self,
        state: WorkflowState,
    ) -> AppResult<(WorkflowState, CatalogSnapshot)> {
        if state.is_failed() {
            return Ok((state, CatalogSnapshot::default()));
        }
        let result = self
            .catalog
            .load()
            .await
            .map_err(|e| StageError::from_provider("catalog", e));
        match result {
            Ok(products) => {
                debug!(products = products.len(), "Catalog snapshot loaded");
                Ok((state, CatalogSnapshot::new(products)))
            }
            Err(StageError::Fatal(e)) => Err(e),
            Err(StageError::Failed(e)) => Ok((state.fail(e), CatalogSnapshot::default())),
        }
    }

    async fn retrieve_candidates(
        &self,
        state: WorkflowState,
        catalog: &CatalogSnapshot,
    ) -> AppResult<WorkflowState> {
        let Some(intent) = state.intent.as_ref().filter(|_| !state.is_failed()) else {
            return Ok(state);
        };

        let mut rng = self
            .seed
            .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
        let result = retrieve(self.knowledge.as_ref(), catalog, intent, &mut rng).await;

        settle(state, result, |state, retrieval| WorkflowState {
            candidates: retrieval.selection.candidates,
            retrieved_context: retrieval.documents,
            ..state.enter(WorkflowPhase::Generating)
        })
    }

    fn generator(&self) -> MenuGenerator<'_> {
        let generator = MenuGenerator::new(self.provider.as_ref());
        match self.temperature {
            Some(t) => generator.with_temperature(t),
            None => generator,
        }
    }

    async fn generate_menu(&self, state: WorkflowState) -> AppResult<WorkflowState> {
        let Some(intent) = state.intent.as_ref().filter(|_| !state.is_failed()) else {
            return Ok(state);
        };

        let ctx = GenerationContext {
            intent,
            candidates: &state.candidates,
            previous_dishes: &state.previous_dishes,
        };
        let result = self.generator().propose(&ctx).await;

        settle(state, result, |state, generated| {
            WorkflowState {
                menu: generated.menu,
                ..state
            }
            .add_usage(generated.usage)
            .enter(WorkflowPhase::Validating)
        })
    }

    /// Reprice the current menu and classify it against the budget band
    fn price_and_validate(&self, state: WorkflowState, catalog: &CatalogSnapshot) -> WorkflowState {
        let Some(budget) = state.intent.as_ref().map(|i| i.budget).filter(|_| !state.is_failed())
        else {
            return state;
        };

        let priced = price_menu(&state.menu, catalog);
        let assessment =
            self.validator
                .evaluate(priced.menu.total_price, budget, state.iteration_count);

        info!(
            iteration = state.iteration_count,
            total_price = priced.menu.total_price,
            budget,
            verdict = ?assessment.verdict,
            out_of_stock = priced.out_of_stock.len(),
            unresolved = priced.unresolved.len(),
            "Validated menu"
        );


        let total = priced.menu.total_price;
        let state = WorkflowState {
            menu: priced.menu,
            out_of_stock: priced.out_of_stock,
            budget_error: assessment.budget_error,
            ..state
        }
        .enter(assessment.verdict.next_phase());

        if assessment.verdict == BudgetVerdict::MaxRetriesExceededOverBudget {
            let iterations = state.iteration_count;
            return state.fail(WorkflowError::MaxRetriesExceededOverBudget {
                total,
                budget,
                iterations,
            });
        }
        state
    }

    async fn adjust_until_settled(
        &self,
        mut state: WorkflowState,
        catalog: &CatalogSnapshot,
    ) -> AppResult<WorkflowState> {
        loop {
            let verdict = if state.needs_reduction() {
                BudgetVerdict::NeedsReduction
            } else if state.needs_enhancement() {
                BudgetVerdict::NeedsEnhancement
            } else {
                return Ok(state);
            };
            let Some(budget) = state.intent.as_ref().map(|i| i.budget) else {
                return Ok(state);
            };
            if state.is_failed() || !self.validator.can_adjust(state.iteration_count) {
                return Ok(state);
            }
            let Some(plan) =
                plan_adjustment(verdict, &state.menu, budget, &state.candidates, &state.out_of_stock)
            else {
                return Ok(state);
            };

            state = WorkflowState {
                iteration_count: state.iteration_count + 1,
                ..state.enter(WorkflowPhase::Adjusting)
            };
            debug!(
                iteration = state.iteration_count,
                direction = ?plan.direction,
                directives = ?plan.directives,
                "Adjusting menu"
            );

            let band = self.validator.band(budget);
            let result = self
                .generator()
                .adjust(&plan, &state.menu, &state.candidates, band)
                .await;
            state = settle(state, result, |state, generated| {
                WorkflowState {
                    menu: generated.menu,
                    ..state
                }
                .add_usage(generated.usage)
                .enter(WorkflowPhase::Validating)
            })?;
            state = self.price_and_validate(state, catalog);
        }
    }
}

/// Apply a stage result: success maps the state, failures short-circuit
fn settle<T>(
    state: WorkflowState,
    result: Result<T, StageError>,
    apply: impl FnOnce(WorkflowState, T) -> WorkflowState,
) -> AppResult<WorkflowState> {
    match result {
        Ok(value) => Ok(apply(state, value)),
        Err(StageError::Fatal(error)) => Err(error),
        Err(StageError::Failed(error)) => Ok(state.fail(error)),
    }
}
