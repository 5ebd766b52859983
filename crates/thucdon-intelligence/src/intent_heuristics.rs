// ABOUTME: Deterministic intent heuristics: meal-time keywords, hour fallback and default budgets
// ABOUTME: Sanitizes generator-extracted intent fields and resolves them into a concrete Intent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Intent Heuristics
//!
//! Meal time is never asked of the generator. It comes from a fixed Vietnamese
//! phrase table, or from the local hour when no phrase matches:
//!
//! | Hours      | Meal    |
//! |------------|---------|
//! | `[0, 4)`   | evening |
//! | `[4, 10)`  | morning |
//! | `[10, 17)` | noon    |
//! | `[17, 24)` | evening |
//!
//! Budget, party size and preferences come from the generator and are
//! sanitized here before use.

use serde_json::Value;
use thucdon_core::constants::budget::{
    DEFAULT_EVENING_BUDGET_PER_PERSON, DEFAULT_MORNING_BUDGET_PER_PERSON,
    DEFAULT_NOON_BUDGET_PER_PERSON,
};
use thucdon_core::constants::meal::{
    EVENING_KEYWORDS, EVENING_START_HOUR, MORNING_KEYWORDS, MORNING_START_HOUR, NOON_KEYWORDS,
    NOON_START_HOUR,
};
use thucdon_core::models::{Intent, MealType};

/// Detect the meal from explicit phrases in the user's text
///
/// Morning phrases are checked first, then noon, then evening.
#[must_use]
pub fn detect_meal_type(text: &str) -> Option<MealType> {
    let lower = text.to_lowercase();
    [
        (MealType::Morning, MORNING_KEYWORDS),
        (MealType::Noon, NOON_KEYWORDS),
        (MealType::Evening, EVENING_KEYWORDS),
    ]
    .into_iter()
    .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
    .map(|(meal, _)| meal)
}

/// Meal implied by the hour of day (0-23)
#[must_use]
pub const fn meal_type_for_hour(hour: u32) -> MealType {
    if hour < MORNING_START_HOUR {
        MealType::Evening
    } else if hour < NOON_START_HOUR {
        MealType::Morning
    } else if hour < EVENING_START_HOUR {
        MealType::Noon
    } else {
        MealType::Evening
    }
}

/// Default budget for a meal and party size
#[must_use]
pub fn default_budget(meal_type: MealType, num_people: u32) -> u64 {
    let per_person = match meal_type {
        MealType::Morning => DEFAULT_MORNING_BUDGET_PER_PERSON,
        MealType::Noon => DEFAULT_NOON_BUDGET_PER_PERSON,
        MealType::Evening => DEFAULT_EVENING_BUDGET_PER_PERSON,
    };
    per_person.saturating_mul(u64::from(num_people))
}

/// Intent fields reported by the generator after sanitizing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentFields {
    /// Positive budget, if the user stated one
    pub budget: Option<u64>,
    /// Party size, at least 1
    pub num_people: u32,
    /// Preferences in the order given
    pub preferences: Vec<String>,
}

impl Default for IntentFields {
    fn default() -> Self {
        Self {
            budget: None,
            num_people: 1,
            preferences: Vec::new(),
        }
    }
}

impl IntentFields {
    /// Sanitize a JSON object returned by the generator
    ///
    /// Anything that is not a positive number is treated as an unstated
    /// budget; party size falls back to 1 unless it is a whole number of at
    /// least 1; preferences keep only non-empty strings.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let budget = value
            .get("budget")
            .and_then(Value::as_f64)
            .filter(|b| b.is_finite() && *b > 0.0)
            .map(|b| b.round() as u64)
            .filter(|b| *b > 0);

        let num_people = value
            .get("num_people")
            .and_then(whole_number)
            .filter(|n| *n >= 1)
            .map_or(1, |n| u32::try_from(n).unwrap_or(u32::MAX));

        let preferences = value
            .get("preferences")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            budget,
            num_people,
            preferences,
        }
    }
}

fn whole_number(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 1.0 && f.fract() == 0.0)
            .map(|f| f as u64)
    })
}

/// Combine keyword detection, the clock and generator fields into an [`Intent`]
#[must_use]
pub fn resolve_intent(user_input: &str, hour: u32, fields: IntentFields) -> Intent {
    let detected = detect_meal_type(user_input);
    let meal_type = detected.unwrap_or_else(|| meal_type_for_hour(hour));

    let (budget, budget_specified) = fields.budget.map_or_else(
        || (default_budget(meal_type, fields.num_people), false),
        |b| (b, true),
    );

    Intent {
        budget,
        budget_specified,
        meal_type,
        meal_type_specified: detected.is_some(),
        num_people: fields.num_people,
        preferences: fields.preferences,
    }
}
