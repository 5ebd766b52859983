// ABOUTME: Catalog loader for JSON product files with tolerant field names
// ABOUTME: Accepts unit_price/base_price/price and stock_quantity/quantity aliases
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use thucdon_core::models::{Product, ProductCategory};
use tokio::fs;
use tracing::{debug, warn};

use super::CatalogSource;
use crate::errors::{AppError, AppResult};

/// On-disk product record
#[derive(Debug, Deserialize)]
struct ProductRecord {
    id: String,
    name: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(alias = "base_price", alias = "price")]
    unit_price: f64,
    #[serde(default, alias = "quantity")]
    stock_quantity: f64,
    #[serde(default)]
    unit: String,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            category: record
                .category
                .as_deref()
                .map(ProductCategory::from_str_lossy)
                .unwrap_or_default(),
            unit_price: record.unit_price,
            stock_quantity: record.stock_quantity,
            unit: record.unit,
        }
    }
}

/// Either a bare array or `{"products": [...]}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<ProductRecord>),
    Wrapped { products: Vec<ProductRecord> },
}

/// Catalog read from a JSON file on every load
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    /// Catalog backed by `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse catalog JSON text
    ///
    /// # Errors
    ///
    /// Returns an `InvalidFormat` error when the text is not a product list.
    pub fn parse(text: &str) -> AppResult<Vec<Product>> {
        let file: CatalogFile = serde_json::from_str(text)
            .map_err(|e| AppError::invalid_format(format!("Invalid catalog JSON: {e}")))?;
        let records = match file {
            CatalogFile::List(records) | CatalogFile::Wrapped { products: records } => records,
        };

        let products: Vec<Product> = records
            .into_iter()
            .map(Product::from)
            .filter(|p| {
                let valid = p.unit_price.is_finite() && p.unit_price >= 0.0;
                if !valid {
                    warn!(id = %p.id, "Skipping catalog product with invalid price");
                }
                valid
            })
            .collect();
        Ok(products)
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalog {
    async fn load(&self) -> AppResult<Vec<Product>> {
        let text = fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::config(format!(
                "Cannot read catalog file {}: {e}",
                self.path.display()
            ))
        })?;
        let products = Self::parse(&text)?;
        debug!(path = %self.path.display(), products = products.len(), "Loaded catalog");
        Ok(products)
    }
}
