// ABOUTME: Authoritative menu pricing against the catalog snapshot
// ABOUTME: Recomputes ingredient, dish and menu totals and flags out-of-stock or unknown products
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Pricer
//!
//! Generator arithmetic is never trusted. Every ingredient line is repriced
//! as `unit_price * quantity` from the catalog; dish and menu totals are then
//! summed bottom-up. Ingredients missing from the catalog keep the price the
//! generator reported and are flagged out of stock.

use std::collections::BTreeSet;

use thucdon_core::models::{IngredientUse, Menu, MenuItem};
use tracing::{debug, warn};

use crate::catalog_snapshot::CatalogSnapshot;

/// A menu after a pricing pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricedMenu {
    /// Menu with derived prices
    pub menu: Menu,
    /// References whose quantity exceeds stock or that the catalog does not know
    pub out_of_stock: BTreeSet<String>,
    /// Subset of `out_of_stock` that did not resolve at all
    pub unresolved: BTreeSet<String>,
}

/// Reprice `menu` from `catalog`
///
/// Idempotent: pricing an already priced menu yields the same totals.
#[must_use]
pub fn price_menu(menu: &Menu, catalog: &CatalogSnapshot) -> PricedMenu {
    let mut out_of_stock = BTreeSet::new();
    let mut unresolved = BTreeSet::new();

    let items: Vec<MenuItem> = menu
        .items
        .iter()
        .map(|item| {
            let ingredients: Vec<IngredientUse> = item
                .ingredients
                .iter()
                .map(|ingredient| {
                    price_ingredient(ingredient, catalog, &mut out_of_stock, &mut unresolved)
                })
                .collect();
            let price = ingredients.iter().map(|i| i.price).sum();
            MenuItem {
                name: item.name.clone(),
                ingredients,
                price,
            }
        })
        .collect();

    let total_price = items.iter().map(|item| item.price).sum();
    debug!(
        total_price,
        dishes = items.len(),
        out_of_stock = out_of_stock.len(),
        "Priced menu"
    );

    PricedMenu {
        menu: Menu { items, total_price },
        out_of_stock,
        unresolved,
    }
}

fn price_ingredient(
    ingredient: &IngredientUse,
    catalog: &CatalogSnapshot,
    out_of_stock: &mut BTreeSet<String>,
    unresolved: &mut BTreeSet<String>,
) -> IngredientUse {
    let key = ingredient.lookup_key();
    let product = catalog
        .lookup(key)
        .or_else(|| catalog.lookup(&ingredient.name));

    let mut priced = ingredient.clone();
    let Some(product) = product else {
        warn!(ingredient = key, "Ingredient not in catalog, keeping reported price");
        out_of_stock.insert(key.to_owned());
        unresolved.insert(key.to_owned());
        return priced;
    };

    let quantity = ingredient.quantity.max(0.0);
    priced.quantity = quantity;
    priced.price = product.unit_price * quantity;
    if priced.name.trim().is_empty() {
        priced.name.clone_from(&product.name);
    }
    if priced.unit.trim().is_empty() {
        priced.unit.clone_from(&product.unit);
    }
    if !product.has_stock_for(quantity) {
        out_of_stock.insert(product.id.clone());
    }
    priced
}
