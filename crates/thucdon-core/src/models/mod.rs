// ABOUTME: Core data models for the Thucdon menu planner
// ABOUTME: Re-exports Intent, MealType, Product and Menu structures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Types shared by the algorithms crate and the workflow layer.
//!
//! - `Intent`: resolved budget, meal time, party size and preferences
//! - `Product`: a catalog entry with unit price and stock
//! - `Menu`: dishes built from candidate products, priced by the catalog

mod intent;
mod menu;
mod product;

pub use intent::{Intent, MealType};
pub use menu::{IngredientUse, Menu, MenuItem};
pub use product::{Product, ProductCategory};
