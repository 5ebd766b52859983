// ABOUTME: Response builder producing the boundary-facing menu result
// ABOUTME: Always yields a well-formed response and records dishes in user history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thucdon_core::models::{MealType, Menu};
use thucdon_intelligence::{format_vnd, UserHistory};
use tracing::{debug, info};

use super::state::WorkflowState;
use crate::llm::TokenUsage;

/// HTTP-style status for a successful suggestion
pub const STATUS_OK: u16 = 200;

/// One ingredient line in the response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientLine {
    /// Product name
    pub name: String,
    /// Quantity in `unit`
    pub quantity: f64,
    /// Unit of the quantity
    pub unit: String,
    /// Line price in VND
    pub price: f64,
}

/// One dish in the response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishSummary {
    /// Dish name
    pub name: String,
    /// Dish price in VND
    pub total_price: f64,
    /// Ingredient lines
    pub ingredients: Vec<IngredientLine>,
}

/// Result payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuData {
    /// Meal the menu is for, when the intent was resolved
    pub meal_type: Option<MealType>,
    /// Budget in VND, zero when unresolved
    pub total_budget: u64,
    /// Menu total in VND
    pub total_estimated_price: f64,
    /// Dishes
    pub menu: Vec<DishSummary>,
}

/// Request diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Wall time in seconds, three decimals
    pub process_time: f64,
    /// Tokens used by every generation call of the request
    pub token_usage: TokenUsage,
}

/// Final response of one workflow run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuResponse {
    /// 200 on success, otherwise the failure's boundary status
    pub status_code: u16,
    /// Human-readable summary; never contains upstream error text
    pub message: String,
    /// Menu payload, empty on failure
    pub data: MenuData,
    /// Diagnostics
    pub metadata: ResponseMetadata,
}

impl MenuResponse {
    /// Whether the run produced a menu
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }
}

/// Response view of a priced menu
#[must_use]
pub fn dish_summaries(menu: &Menu) -> Vec<DishSummary> {
    menu.items
        .iter()
        .map(|item| DishSummary {
            name: item.name.clone(),
            total_price: item.price,
            ingredients: item
                .ingredients
                .iter()
                .map(|ing| IngredientLine {
                    name: ing.name.clone(),
                    quantity: ing.quantity,
                    unit: ing.unit.clone(),
                    price: ing.price,
                })
                .collect(),
        })
        .collect()
}

/// Summary sentence for a successful menu
#[must_use]
pub fn success_message(dish_count: usize, meal_type: MealType, budget: u64) -> String {
    format!(
        "Hôm nay tôi gợi ý cho bạn {dish_count} món cho bữa {} hấp dẫn, ngon miệng và phù hợp với ngân sách {} VND. Mỗi món đều liệt kê nguyên liệu và giá, giúp bạn dễ dàng chuẩn bị.",
        meal_type.label(),
        format_vnd(budget as f64)
    )
}

/// Assemble the response for `state`
///
/// Never fails. When the state carries an error the menu is empty and the
/// total is zero. A successful, non-empty menu is appended to the acting
/// user's history.
#[must_use]
pub fn build_response(
    state: &WorkflowState,
    elapsed: Duration,
    history: &UserHistory,
) -> MenuResponse {
    let meal_type = state.intent.as_ref().map(|i| i.meal_type);
    let total_budget = state.intent.as_ref().map_or(0, |i| i.budget);
    let metadata = ResponseMetadata {
        process_time: (elapsed.as_secs_f64() * 1000.0).round() / 1000.0,
        token_usage: state.token_usage,
    };

    if let Some(error) = &state.error {
        let code = error.error_code();
        debug!(code = ?code, error = %error, "Building failure response");
        return MenuResponse {
            status_code: code.http_status(),
            message: code.description().to_owned(),
            data: MenuData {
                meal_type,
                total_budget,
                total_estimated_price: 0.0,
                menu: Vec::new(),
            },
            metadata,
        };
    }

    let menu = &state.menu;
    if let (Some(user_id), false) = (state.user_id.as_deref(), menu.is_empty()) {
        history.add_dishes(user_id, &menu.dish_names());
    }

    let message = meal_type.map_or_else(String::new, |meal| {
        success_message(menu.items.len(), meal, total_budget)
    });
    info!(
        dishes = menu.items.len(),
        total_price = menu.total_price,
        budget = total_budget,
        iterations = state.iteration_count,
        "Menu suggestion ready"
    );

    MenuResponse {
        status_code: STATUS_OK,
        message,
        data: MenuData {
            meal_type,
            total_budget,
            total_estimated_price: menu.total_price,
            menu: dish_summaries(menu),
        },
        metadata,
    }
}
