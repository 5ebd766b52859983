// ABOUTME: Candidate product extraction and filtering for menu generation
// ABOUTME: Parses product lines from knowledge documents, drops pantry staples, sorts, caps and shuffles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Candidate Filter
//!
//! Knowledge documents are free text containing product lines of the form
//! `prod_<digits>: <name> - <price>`. Selection runs in a fixed order:
//!
//! 1. drop block-listed staples (salt, fish sauce, rice, noodles, ...)
//! 2. stable sort by ascending unit price
//! 3. dedupe by id and by name, keeping the cheapest occurrence
//! 4. drop products above the budget-tier price ceiling
//! 5. cap the count
//! 6. shuffle with the injected RNG so the generator does not favour
//!    whatever sits at the top of its context

use std::collections::HashSet;
use std::sync::OnceLock;

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use thucdon_core::constants::retrieval::{
    EXCLUDED_KEYWORDS, MAX_CANDIDATES, MODERATE_PER_PERSON_BUDGET, MODERATE_PRICE_CEILING_RATIO,
    TIGHT_PER_PERSON_BUDGET, TIGHT_PRICE_CEILING_RATIO,
};
use thucdon_core::models::{Intent, Product, ProductCategory};
use tracing::debug;

use crate::catalog_snapshot::CatalogSnapshot;

/// Get compiled product line regex (cached)
fn product_line_regex() -> Option<&'static Regex> {
    static PRODUCT_LINE: OnceLock<Option<Regex>> = OnceLock::new();
    PRODUCT_LINE
        .get_or_init(|| Regex::new(r"(prod_\d+):\s*(.+?)\s*-\s*(\d+)").ok())
        .as_ref()
}

/// Parse every product line found in the retrieved documents
///
/// Products carry only id, name and unit price until enriched from the catalog.
#[must_use]
pub fn parse_product_documents(documents: &[String]) -> Vec<Product> {
    let Some(re) = product_line_regex() else {
        return Vec::new();
    };

    documents
        .iter()
        .flat_map(|doc| re.captures_iter(doc))
        .filter_map(|caps| {
            let unit_price = caps.get(3)?.as_str().parse::<u64>().ok()? as f64;
            Some(Product {
                id: caps.get(1)?.as_str().to_owned(),
                name: caps.get(2)?.as_str().trim().to_owned(),
                category: ProductCategory::Other,
                unit_price,
                stock_quantity: 0.0,
                unit: String::new(),
            })
        })
        .collect()
}

/// Replace parsed products with their catalog entries where the id is known
#[must_use]
pub fn enrich_from_catalog(products: Vec<Product>, catalog: &CatalogSnapshot) -> Vec<Product> {
    products
        .into_iter()
        .map(|product| match catalog.lookup(&product.id) {
            Some(entry) if entry.id.eq_ignore_ascii_case(&product.id) => entry.clone(),
            _ => product,
        })
        .collect()
}

/// Whether a product is a staple that must never be billed
#[must_use]
pub fn is_excluded(name: &str) -> bool {
    let lower = name.to_lowercase();
    EXCLUDED_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Highest admissible unit price for this intent
///
/// Tighter per-person budgets get a lower ceiling.
#[must_use]
pub fn price_ceiling(intent: &Intent) -> f64 {
    let budget = intent.budget as f64;
    let per_person = intent.per_person_budget();
    if per_person < TIGHT_PER_PERSON_BUDGET {
        budget * TIGHT_PRICE_CEILING_RATIO
    } else if per_person < MODERATE_PER_PERSON_BUDGET {
        budget * MODERATE_PRICE_CEILING_RATIO
    } else {
        budget
    }
}

/// Outcome of candidate selection, with counts for diagnostics
#[derive(Debug, Clone, Default)]
pub struct CandidateSelection {
    /// Candidates to hand to the generator, in shuffled order
    pub candidates: Vec<Product>,
    /// Products parsed before filtering
    pub parsed: usize,
    /// Products dropped as pantry staples
    pub excluded: usize,
    /// Products dropped as duplicates
    pub duplicates: usize,
    /// Products dropped by the price ceiling
    pub over_ceiling: usize,
}

/// Filter, order and cap candidate products
#[must_use]
pub fn select_candidates<R: Rng + ?Sized>(
    products: Vec<Product>,
    intent: &Intent,
    rng: &mut R,
) -> CandidateSelection {
    let parsed = products.len();

    let mut kept: Vec<Product> = products
        .into_iter()
        .filter(|p| !is_excluded(&p.name))
        .collect();
    let excluded = parsed - kept.len();

    kept.sort_by(|a, b| a.unit_price.total_cmp(&b.unit_price));

    let before_dedupe = kept.len();
    let mut seen_ids = HashSet::new();
    let mut seen_names = HashSet::new();
    kept.retain(|p| {
        let new_id = seen_ids.insert(p.id.to_lowercase());
        let new_name = seen_names.insert(p.name.to_lowercase());
        new_id && new_name
    });
    let duplicates = before_dedupe - kept.len();

    let ceiling = price_ceiling(intent);
    let before_ceiling = kept.len();
    kept.retain(|p| p.unit_price <= ceiling);
    let over_ceiling = before_ceiling - kept.len();

    kept.truncate(MAX_CANDIDATES);
    kept.shuffle(rng);

    debug!(
        parsed,
        excluded,
        duplicates,
        over_ceiling,
        ceiling,
        candidates = kept.len(),
        "Selected menu candidates"
    );

    CandidateSelection {
        candidates: kept,
        parsed,
        excluded,
        duplicates,
        over_ceiling,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiple_lines_per_document() {
        let docs = vec![
            "prod_001: Thịt ba chỉ - 35000\nprod_002: Rau muống - 8000".to_owned(),
            "Không có sản phẩm".to_owned(),
        ];
        let products = parse_product_documents(&docs);
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, "prod_001");
        assert_eq!(products[0].name, "Thịt ba chỉ");
        assert!((products[1].unit_price - 8000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_staples_excluded() {
        assert!(is_excluded("Nước mắm Nam Ngư"));
        assert!(is_excluded("Gạo ST25"));
        assert!(!is_excluded("Cá basa phi lê"));
    }
}
