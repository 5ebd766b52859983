// ABOUTME: Menu generation stage: prompts the generator and strictly validates its output
// ABOUTME: Repairs JSON, rejects empty menus and ingredients outside the candidate set
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thucdon_core::models::{Menu, Product};
use thucdon_intelligence::{AdjustmentPlan, CatalogSnapshot, JsonRepair};
use tracing::{debug, instrument, warn};

use super::state::StageError;
use crate::errors::WorkflowError;
use crate::llm::prompts::{adjustment_prompt, generation_prompt, GenerationContext, SYSTEM_PROMPT};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider, TokenUsage};

/// A validated menu and what it cost to obtain
#[derive(Debug, Clone)]
pub struct GeneratedMenu {
    /// Menu whose every ingredient references a candidate
    pub menu: Menu,
    /// Tokens spent, when the provider reported them
    pub usage: Option<TokenUsage>,
}

/// Invokes the generator and validates its menus
pub struct MenuGenerator<'a> {
    provider: &'a dyn LlmProvider,
    temperature: Option<f32>,
}

impl<'a> MenuGenerator<'a> {
    /// Generator backed by `provider`
    #[must_use]
    pub const fn new(provider: &'a dyn LlmProvider) -> Self {
        Self {
            provider,
            temperature: None,
        }
    }

    /// Override the provider's default temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Ask for a first menu
    ///
    /// # Errors
    ///
    /// Fatal provider failures abort the request; parse and closure failures
    /// are reported as workflow errors.
    #[instrument(skip_all, fields(candidates = ctx.candidates.len()))]
    pub async fn propose(&self, ctx: &GenerationContext<'_>) -> Result<GeneratedMenu, StageError> {
        let prompt = generation_prompt(ctx);
        self.generate("generation", prompt, ctx.candidates).await
    }

    /// Ask for a corrected menu following `plan`
    ///
    /// # Errors
    ///
    /// Same as [`Self::propose`].
    #[instrument(skip_all, fields(direction = ?plan.direction, total_price = plan.total_price))]
    pub async fn adjust(
        &self,
        plan: &AdjustmentPlan,
        menu: &Menu,
        candidates: &[Product],
        band: (f64, f64),
    ) -> Result<GeneratedMenu, StageError> {
        let prompt = adjustment_prompt(plan, menu, candidates, band);
        self.generate("adjustment", prompt, candidates).await
    }

    async fn generate(
        &self,
        stage: &'static str,
        prompt: String,
        candidates: &[Product],
    ) -> Result<GeneratedMenu, StageError> {
        let mut request =
            ChatRequest::new(vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)])
                .with_json_mode();
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }

        let response = self
            .provider
            .complete(&request)
            .await
            .map_err(|e| StageError::from_provider(stage, e))?;
        debug!(stage, content_len = response.content.len(), "Generator responded");

        let menu = parse_menu(&response.content)?;
        let menu = enforce_candidate_closure(menu, candidates)?;

        Ok(GeneratedMenu {
            menu,
            usage: response.usage,
        })
    }
}

/// Parse generator text into a non-empty [`Menu`]
///
/// # Errors
///
/// Returns `InvalidMenuResponse` when repair fails, the shape is wrong or the
/// menu has no dishes.
pub fn parse_menu(text: &str) -> Result<Menu, WorkflowError> {
    let menu: Menu = JsonRepair::parse_as(text).map_err(|e| {
        warn!(error = %e, "Generator output is not a menu");
        WorkflowError::InvalidMenuResponse {
            reason: e.to_string(),
        }
    })?;

    if menu.is_empty() {
        return Err(WorkflowError::InvalidMenuResponse {
            reason: "menu has no items".to_owned(),
        });
    }
    if let Some(item) = menu.items.iter().find(|item| item.ingredients.is_empty()) {
        return Err(WorkflowError::InvalidMenuResponse {
            reason: format!("dish '{}' has no ingredients", item.name),
        });
    }
    Ok(menu)
}

/// Check every ingredient against `candidates` and canonicalize references
///
/// An ingredient matches by candidate id, or by name when the id is absent or
/// wrong. Matched ingredients take the candidate's id and name so later
/// stages only ever see candidate references.
///
/// # Errors
///
/// Returns `UnknownIngredients` listing every reference outside the set.
pub fn enforce_candidate_closure(
    mut menu: Menu,
    candidates: &[Product],
) -> Result<Menu, WorkflowError> {
    let allowed = CatalogSnapshot::new(candidates.to_vec());
    let mut unknown = Vec::new();

    for ingredient in menu.items.iter_mut().flat_map(|item| item.ingredients.iter_mut()) {
        let matched = allowed
            .lookup(ingredient.lookup_key())
            .or_else(|| allowed.lookup(ingredient.name.trim()));
        match matched {
            Some(product) => {
                ingredient.product_ref.clone_from(&product.id);
                ingredient.name.clone_from(&product.name);
            }
            None => {
                let label = if ingredient.name.trim().is_empty() {
                    ingredient.product_ref.clone()
                } else {
                    ingredient.name.clone()
                };
                unknown.push(label);
            }
        }
    }

    if unknown.is_empty() {
        Ok(menu)
    } else {
        warn!(unknown = ?unknown, "Generator referenced ingredients outside the candidates");
        Err(WorkflowError::UnknownIngredients { names: unknown })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_menu_rejects_empty() {
        let err = parse_menu(r#"{"items": [], "total_price": 0}"#);
        assert!(matches!(err, Err(WorkflowError::InvalidMenuResponse { .. })));
    }

    #[test]
    fn test_closure_canonicalizes_by_name() -> Result<(), WorkflowError> {
        let candidates = vec![Product::new("prod_001", "Thịt gà", 12_000.0)];
        let menu = parse_menu(
            r#"{"items": [{"name": "Gà luộc", "ingredients": [
                {"product_id": "prod_999", "name": "thịt gà", "quantity": 2, "unit": "100g"}
            ]}]}"#,
        )?;
        let menu = enforce_candidate_closure(menu, &candidates)?;
        assert_eq!(menu.items[0].ingredients[0].product_ref, "prod_001");
        assert_eq!(menu.items[0].ingredients[0].name, "Thịt gà");
        Ok(())
    }
}
