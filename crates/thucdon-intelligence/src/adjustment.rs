// ABOUTME: Adjustment planning for menus outside the budget band
// ABOUTME: Chooses ordered reduction or enhancement directives and packaged add-on options
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Adjustment Planner
//!
//! The generator performs the edit; this module decides what to ask for.
//! Directives are listed strongest first and only included when they can
//! apply to the current menu and candidate set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thucdon_core::constants::budget::{
    PACKAGED_ADDON_MAX_PRICE, PACKAGED_ADDON_MIN_HEADROOM, PACKAGED_ADDON_MIN_PRICE,
};
use thucdon_core::models::{Menu, Product, ProductCategory};

use crate::budget_validator::BudgetVerdict;

/// Which way the total has to move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentDirection {
    /// Bring the total down
    Reduce,
    /// Bring the total up
    Enhance,
}

/// One corrective instruction for the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentDirective {
    /// Remove beverages and desserts
    DropDiscretionaryItems,
    /// Serve fewer dishes
    ReduceDishCount,
    /// Swap an ingredient for a cheaper one of the same category
    SubstituteCheaperIngredient,
    /// Use smaller quantities
    ShrinkPortions,
    /// Drop sides and soup, keep the main dish
    KeepMainDishOnly,
    /// Use larger quantities
    IncreasePortions,
    /// Add a side dish or soup
    AddSideOrSoup,
    /// Add a packaged beverage or dessert from the candidates
    AddPackagedAddon,
    /// Swap an ingredient for a pricier one of the same category
    UpgradeIngredientTier,
    /// Add a dish built only from unused candidates
    AddDish,
}

/// Ordered directives for one adjustment pass
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentPlan {
    /// Direction of the change
    pub direction: AdjustmentDirection,
    /// Directives, strongest first
    pub directives: Vec<AdjustmentDirective>,
    /// Target budget
    pub budget: u64,
    /// Current menu total
    pub total_price: f64,
    /// Packaged add-ons that fit the headroom, cheapest first
    pub addon_options: Vec<Product>,
    /// References the pricer flagged, to be replaced
    pub out_of_stock: Vec<String>,
}

impl AdjustmentPlan {
    /// `budget - total`, zero when over budget
    #[must_use]
    pub fn headroom(&self) -> f64 {
        (self.budget as f64 - self.total_price).max(0.0)
    }

    /// `total - budget`, zero when under budget
    #[must_use]
    pub fn overshoot(&self) -> f64 {
        (self.total_price - self.budget as f64).max(0.0)
    }
}

/// Plan the next adjustment, or `None` when the verdict needs none
#[must_use]
pub fn plan_adjustment(
    verdict: BudgetVerdict,
    menu: &Menu,
    budget: u64,
    candidates: &[Product],
    out_of_stock: &BTreeSet<String>,
) -> Option<AdjustmentPlan> {
    let direction = match verdict {
        BudgetVerdict::NeedsReduction => AdjustmentDirection::Reduce,
        BudgetVerdict::NeedsEnhancement => AdjustmentDirection::Enhance,
        BudgetVerdict::Accepted | BudgetVerdict::MaxRetriesExceededOverBudget => return None,
    };

    let headroom = (budget as f64 - menu.total_price).max(0.0);
    let addon_options = match direction {
        AdjustmentDirection::Enhance => packaged_addons(candidates, headroom),
        AdjustmentDirection::Reduce => Vec::new(),
    };
    let directives = match direction {
        AdjustmentDirection::Reduce => reduction_directives(menu, candidates),
        AdjustmentDirection::Enhance => {
            enhancement_directives(menu, candidates, !addon_options.is_empty())
        }
    };

    Some(AdjustmentPlan {
        direction,
        directives,
        budget,
        total_price: menu.total_price,
        addon_options,
        out_of_stock: out_of_stock.iter().cloned().collect(),
    })
}

fn reduction_directives(menu: &Menu, candidates: &[Product]) -> Vec<AdjustmentDirective> {
    let mut directives = Vec::new();
    let used = used_products(menu, candidates);

    if used.iter().any(|p| p.category.is_discretionary()) {
        directives.push(AdjustmentDirective::DropDiscretionaryItems);
    }
    if menu.items.len() > 1 {
        directives.push(AdjustmentDirective::ReduceDishCount);
    }
    if used.iter().any(|p| has_alternative(p, candidates, |a, b| a < b)) {
        directives.push(AdjustmentDirective::SubstituteCheaperIngredient);
    }
    directives.push(AdjustmentDirective::ShrinkPortions);
    if menu.items.len() > 1 {
        directives.push(AdjustmentDirective::KeepMainDishOnly);
    }
    directives
}

fn enhancement_directives(
    menu: &Menu,
    candidates: &[Product],
    addon_fits: bool,
) -> Vec<AdjustmentDirective> {
    let mut directives = Vec::new();
    let used = used_products(menu, candidates);

    if !menu.is_empty() {
        directives.push(AdjustmentDirective::IncreasePortions);
    }
    if !has_side_or_soup(menu) {
        directives.push(AdjustmentDirective::AddSideOrSoup);
    }
    if addon_fits {
        directives.push(AdjustmentDirective::AddPackagedAddon);
    }
    if used.iter().any(|p| has_alternative(p, candidates, |a, b| a > b)) {
        directives.push(AdjustmentDirective::UpgradeIngredientTier);
    }
    if candidates.len() > used.len() {
        directives.push(AdjustmentDirective::AddDish);
    }
    directives
}

/// Packaged beverages and desserts within the add-on band that fit `headroom`
#[must_use]
pub fn packaged_addons(candidates: &[Product], headroom: f64) -> Vec<Product> {
    if headroom < PACKAGED_ADDON_MIN_HEADROOM as f64 {
        return Vec::new();
    }
    let min = PACKAGED_ADDON_MIN_PRICE as f64;
    let max = (PACKAGED_ADDON_MAX_PRICE as f64).min(headroom);

    let mut options: Vec<Product> = candidates
        .iter()
        .filter(|p| p.category.is_discretionary())
        .filter(|p| p.unit_price >= min && p.unit_price <= max)
        .cloned()
        .collect();
    options.sort_by(|a, b| a.unit_price.total_cmp(&b.unit_price));
    options
}

fn used_products<'a>(menu: &Menu, candidates: &'a [Product]) -> Vec<&'a Product> {
    candidates
        .iter()
        .filter(|p| {
            menu.ingredients().any(|i| {
                i.lookup_key().eq_ignore_ascii_case(&p.id)
                    || i.name.trim().to_lowercase() == p.name.to_lowercase()
            })
        })
        .collect()
}

fn has_alternative(product: &Product, candidates: &[Product], cmp: fn(f64, f64) -> bool) -> bool {
    product.category != ProductCategory::Other
        && candidates.iter().any(|c| {
            c.id != product.id
                && c.category == product.category
                && cmp(c.unit_price, product.unit_price)
        })
}

fn has_side_or_soup(menu: &Menu) -> bool {
    menu.items.len() >= 3
        || menu.items.iter().any(|item| {
            let name = item.name.to_lowercase();
            name.starts_with("canh") || name.starts_with("súp") || name.contains("rau")
        })
}
