// ABOUTME: Catalog product model with unit price, stock and category
// ABOUTME: Products are read-only snapshots loaded per request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Coarse product grouping used for substitutions and add-ons
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    /// Pork, beef, chicken and other meats
    Meat,
    /// Fish, shrimp, squid and shellfish
    Seafood,
    /// Eggs and tofu
    Protein,
    /// Leafy greens, roots and herbs
    Vegetable,
    /// Fresh fruit
    Fruit,
    /// Packaged or bottled drinks
    Beverage,
    /// Packaged sweets and desserts
    Dessert,
    /// Anything else
    #[default]
    Other,
}

impl ProductCategory {
    /// Parse a category name, accepting a few common synonyms
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "meat" | "thịt" => Self::Meat,
            "seafood" | "fish" | "hải sản" => Self::Seafood,
            "protein" | "egg" | "eggs" | "tofu" | "trứng" => Self::Protein,
            "vegetable" | "vegetables" | "rau" | "rau củ" => Self::Vegetable,
            "fruit" | "fruits" | "trái cây" => Self::Fruit,
            "beverage" | "beverages" | "drink" | "đồ uống" => Self::Beverage,
            "dessert" | "desserts" | "tráng miệng" => Self::Dessert,
            _ => Self::Other,
        }
    }

    /// Beverages and desserts are the first thing dropped when over budget
    #[must_use]
    pub const fn is_discretionary(&self) -> bool {
        matches!(self, Self::Beverage | Self::Dessert)
    }
}

/// A purchasable product from the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier such as `prod_001`
    pub id: String,
    /// Display name
    pub name: String,
    /// Product grouping
    #[serde(default)]
    pub category: ProductCategory,
    /// Price per unit in VND
    pub unit_price: f64,
    /// Units currently in stock
    #[serde(default)]
    pub stock_quantity: f64,
    /// Unit of sale (kg, hộp, bó, ...)
    #[serde(default)]
    pub unit: String,
}

impl Product {
    /// Product with the given id, name and unit price and no stock information
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit_price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            ..Self::default()
        }
    }

    /// Whether `quantity` units can be supplied
    #[must_use]
    pub fn has_stock_for(&self, quantity: f64) -> bool {
        quantity <= self.stock_quantity
    }
}
