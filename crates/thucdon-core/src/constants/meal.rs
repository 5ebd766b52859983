// ABOUTME: Vietnamese meal-time keyword table and hour-of-day boundaries
// ABOUTME: Used by intent heuristics before falling back to the clock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Phrases that mark a breakfast request
pub const MORNING_KEYWORDS: &[&str] = &["ăn sáng", "bữa sáng", "sáng nay", "buổi sáng"];

/// Phrases that mark a lunch request
pub const NOON_KEYWORDS: &[&str] = &["ăn trưa", "bữa trưa", "trưa nay", "buổi trưa"];

/// Phrases that mark a dinner request
pub const EVENING_KEYWORDS: &[&str] = &["ăn tối", "bữa tối", "tối nay", "buổi tối"];

/// First hour (inclusive) that counts as morning
pub const MORNING_START_HOUR: u32 = 4;

/// First hour (inclusive) that counts as noon
pub const NOON_START_HOUR: u32 = 10;

/// First hour (inclusive) that counts as evening
pub const EVENING_START_HOUR: u32 = 17;
