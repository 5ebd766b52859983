// ABOUTME: Product catalog abstraction providing read-only snapshots per request
// ABOUTME: File-backed and static implementations behind one async trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// JSON file catalog implementation
pub mod json_file;

pub use json_file::JsonFileCatalog;

use async_trait::async_trait;
use thucdon_core::models::Product;

use crate::errors::AppResult;

/// Source of catalog products
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load every product; callers treat the result as immutable
    ///
    /// # Errors
    ///
    /// Returns an error if the backing data cannot be read or parsed.
    async fn load(&self) -> AppResult<Vec<Product>>;
}

/// Fixed product list, used by tests and benchmarks
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    /// Catalog that always returns `products`
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn load(&self) -> AppResult<Vec<Product>> {
        Ok(self.products.clone())
    }
}
