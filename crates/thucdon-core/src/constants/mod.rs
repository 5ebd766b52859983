// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants organized by domain for the Thucdon menu planner
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Budget band, default budgets and adjustment limits
pub mod budget;
/// Meal-time detection keywords and hour boundaries
pub mod meal;
/// Knowledge retrieval and candidate filtering constants
pub mod retrieval;

/// User history limits
pub mod history {
    /// Maximum dishes remembered per user
    pub const MAX_DISHES_PER_USER: usize = 20;

    /// Entries not written for this many days are evicted on the next write
    pub const RETENTION_DAYS: i64 = 7;

    /// Dishes handed to the generator as "avoid repeating"
    pub const PREVIOUS_DISHES_LIMIT: usize = 10;
}
