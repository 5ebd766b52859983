// ABOUTME: Read-only catalog snapshot with case-insensitive lookup by product id or name
// ABOUTME: Built once per request from whatever catalog source the host loaded
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;

use thucdon_core::models::Product;

/// Immutable view of the catalog for one request
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    products: Vec<Product>,
    by_id: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl CatalogSnapshot {
    /// Index `products`; on duplicate ids or names the first entry wins
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let mut by_id = HashMap::with_capacity(products.len());
        let mut by_name = HashMap::with_capacity(products.len());
        for (idx, product) in products.iter().enumerate() {
            by_id.entry(normalize(&product.id)).or_insert(idx);
            by_name.entry(normalize(&product.name)).or_insert(idx);
        }
        Self {
            products,
            by_id,
            by_name,
        }
    }

    /// Find a product by id, then by name, ignoring case and surrounding whitespace
    #[must_use]
    pub fn lookup(&self, id_or_name: &str) -> Option<&Product> {
        let key = normalize(id_or_name);
        if key.is_empty() {
            return None;
        }
        self.by_id
            .get(&key)
            .or_else(|| self.by_name.get(&key))
            .and_then(|idx| self.products.get(*idx))
    }

    /// All products in load order
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the snapshot is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}
