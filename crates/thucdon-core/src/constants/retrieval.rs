// ABOUTME: Knowledge retrieval sizes, candidate caps and price ceiling tiers
// ABOUTME: Also holds the block-list of pantry staples that are never billed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Documents requested from the knowledge store per query
pub const KNOWLEDGE_TOP_K: usize = 20;

/// Maximum candidates forwarded to the generator
pub const MAX_CANDIDATES: usize = 50;

/// Per-person budget below which the tight ceiling applies
pub const TIGHT_PER_PERSON_BUDGET: u64 = 50_000;

/// Per-person budget below which the moderate ceiling applies
pub const MODERATE_PER_PERSON_BUDGET: u64 = 100_000;

/// Unit price ceiling as a share of the total budget for tight budgets
pub const TIGHT_PRICE_CEILING_RATIO: f64 = 0.50;

/// Unit price ceiling as a share of the total budget for moderate budgets
pub const MODERATE_PRICE_CEILING_RATIO: f64 = 0.75;

/// Seasonings, condiments and staples assumed to be in every kitchen
///
/// Matched as lowercase substrings of the product name.
pub const EXCLUDED_KEYWORDS: &[&str] = &[
    "gia vị",
    "muối",
    "đường",
    "tiêu",
    "nước mắm",
    "nước tương",
    "hạt nêm",
    "dầu ăn",
    "bơ thực vật",
    "tỏi",
    "gạo",
    "bún",
    "phở",
    "mì",
    "bánh mì",
    "sữa",
    "sữa chua",
];
