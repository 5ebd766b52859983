// ABOUTME: Intent extraction stage combining keyword heuristics with a JSON generation call
// ABOUTME: Fatal provider failures propagate; anything else falls back to defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thucdon_core::models::Intent;
use thucdon_intelligence::{resolve_intent, IntentFields, JsonRepair};
use tracing::{debug, info, instrument, warn};

use super::clock::Clock;
use crate::errors::AppError;
use crate::llm::prompts::{intent_prompt, SYSTEM_PROMPT};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider, TokenUsage};

/// Low temperature keeps field extraction literal
const INTENT_TEMPERATURE: f32 = 0.0;

/// Intent plus the cost of obtaining it
#[derive(Debug, Clone)]
pub struct ExtractedIntent {
    /// Fully resolved intent
    pub intent: Intent,
    /// Whether the generator fields were usable
    pub used_fallback: bool,
    /// Tokens spent, when the provider reported them
    pub usage: Option<TokenUsage>,
}

/// Turns request text into an [`Intent`]
pub struct IntentExtractor<'a> {
    provider: &'a dyn LlmProvider,
    clock: &'a dyn Clock,
}

impl<'a> IntentExtractor<'a> {
    /// Extractor using `provider` for numeric fields and `clock` for meal-time fallback
    #[must_use]
    pub const fn new(provider: &'a dyn LlmProvider, clock: &'a dyn Clock) -> Self {
        Self { provider, clock }
    }

    /// Resolve the intent for `user_input`
    ///
    /// # Errors
    ///
    /// Returns the provider error unchanged when it is quota, rate-limit or
    /// authentication related. Every other failure yields default fields.
    #[instrument(skip(self, user_input))]
    pub async fn extract(&self, user_input: &str) -> Result<ExtractedIntent, AppError> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(intent_prompt(user_input)),
        ])
        .with_temperature(INTENT_TEMPERATURE)
        .with_json_mode();

        let (fields, used_fallback, usage) = match self.provider.complete(&request).await {
            Ok(response) => match JsonRepair::parse(&response.content) {
                Ok(value) => (IntentFields::from_json(&value), false, response.usage),
                Err(e) => {
                    warn!(error = %e, "Intent response was not JSON, using defaults");
                    (IntentFields::default(), true, response.usage)
                }
            },
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(code = ?e.code, error = %e.message, "Intent extraction failed, using defaults");
                (IntentFields::default(), true, None)
            }
        };
        debug!(?fields, used_fallback, "Intent fields");

        let hour = self.clock.current_hour();
        let intent = resolve_intent(user_input, hour, fields);
        info!(
            budget = intent.budget,
            budget_specified = intent.budget_specified,
            meal_type = %intent.meal_type,
            meal_type_specified = intent.meal_type_specified,
            num_people = intent.num_people,
            "Resolved intent"
        );

        Ok(ExtractedIntent {
            intent,
            used_fallback,
            usage,
        })
    }
}
