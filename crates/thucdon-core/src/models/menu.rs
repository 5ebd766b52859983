// ABOUTME: Menu models: dishes, ingredient uses and menu totals
// ABOUTME: Prices are derived by the pricer and never trusted from the generator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// One product used by a dish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientUse {
    /// Candidate product identifier the generator referenced
    #[serde(rename = "product_id", alias = "id", default)]
    pub product_ref: String,
    /// Product name
    #[serde(default)]
    pub name: String,
    /// Quantity in `unit`
    #[serde(default)]
    pub quantity: f64,
    /// Unit of the quantity
    #[serde(default)]
    pub unit: String,
    /// Derived line price (unit price times quantity)
    #[serde(default)]
    pub price: f64,
}

impl IngredientUse {
    /// Reference used for candidate lookups: the id, or the name when no id was given
    #[must_use]
    pub fn lookup_key(&self) -> &str {
        let id = self.product_ref.trim();
        if id.is_empty() {
            self.name.trim()
        } else {
            id
        }
    }
}

/// A dish on the menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Dish name
    pub name: String,
    /// Ingredients in the order the generator listed them
    #[serde(default)]
    pub ingredients: Vec<IngredientUse>,
    /// Derived dish price
    #[serde(default)]
    pub price: f64,
}

/// A full menu proposal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    /// Dishes in order
    #[serde(default, alias = "dishes")]
    pub items: Vec<MenuItem>,
    /// Derived total price
    #[serde(default, alias = "total")]
    pub total_price: f64,
}

impl Menu {
    /// Whether the menu has no dishes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Dish names in menu order
    #[must_use]
    pub fn dish_names(&self) -> Vec<String> {
        self.items.iter().map(|item| item.name.clone()).collect()
    }

    /// Iterate every ingredient use across all dishes
    pub fn ingredients(&self) -> impl Iterator<Item = &IngredientUse> {
        self.items.iter().flat_map(|item| item.ingredients.iter())
    }
}
