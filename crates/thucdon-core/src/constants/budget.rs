// ABOUTME: Budget band ratios, per-meal default budgets and adjustment limits
// ABOUTME: Values are in Vietnamese dong (VND)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Menus above `budget * BUDGET_TOLERANCE_RATIO` need reduction
pub const BUDGET_TOLERANCE_RATIO: f64 = 1.05;

/// Menus below `budget * MIN_BUDGET_USAGE_RATIO` need enhancement
pub const MIN_BUDGET_USAGE_RATIO: f64 = 0.75;

/// Upper bound on adjustment passes per request
pub const MAX_ADJUST_ITERATIONS: u32 = 2;

/// Default per-person budget for breakfast
pub const DEFAULT_MORNING_BUDGET_PER_PERSON: u64 = 40_000;

/// Default per-person budget for lunch
pub const DEFAULT_NOON_BUDGET_PER_PERSON: u64 = 65_000;

/// Default per-person budget for dinner
pub const DEFAULT_EVENING_BUDGET_PER_PERSON: u64 = 80_000;

/// Typical per-person spend suggested to the generator when no budget was given
pub const TYPICAL_PER_PERSON_MIN: u64 = 50_000;

/// Upper end of the typical per-person spend
pub const TYPICAL_PER_PERSON_MAX: u64 = 80_000;

/// Lower share of an explicit budget the generator should aim for
pub const TARGET_USAGE_MIN_RATIO: f64 = 0.70;

/// Upper share of an explicit budget the generator should aim for
pub const TARGET_USAGE_MAX_RATIO: f64 = 0.85;

/// Cheapest packaged beverage/dessert the adjuster may add
pub const PACKAGED_ADDON_MIN_PRICE: u64 = 10_000;

/// Most expensive packaged beverage/dessert the adjuster may add
pub const PACKAGED_ADDON_MAX_PRICE: u64 = 25_000;

/// Remaining headroom required before a packaged add-on is proposed
pub const PACKAGED_ADDON_MIN_HEADROOM: u64 = 20_000;
