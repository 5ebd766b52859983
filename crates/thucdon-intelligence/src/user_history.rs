// ABOUTME: In-memory per-user history of suggested dishes used to avoid repeats
// ABOUTME: Bounded FIFO per user with lazy time-based eviction on write
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! User History
//!
//! Remembers the last dishes suggested to each user so the generator can be
//! told to avoid them. Nothing is persisted; a restart forgets everything.
//!
//! - At most `max_dishes_per_user` dishes per user, oldest dropped first
//! - Users not written for `retention_days` are evicted on the next write
//! - All operations are non-critical: a poisoned lock degrades to a no-op

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use thucdon_core::constants::history::{MAX_DISHES_PER_USER, RETENTION_DAYS};
use tracing::debug;

// ============================================================================
// History Entry
// ============================================================================

/// Dishes remembered for one user
#[derive(Debug, Clone)]
struct HistoryEntry {
    /// Oldest first
    dishes: Vec<String>,
    last_updated: DateTime<Utc>,
}

// ============================================================================
// User History
// ============================================================================

/// Configuration for the user history
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Maximum dishes kept per user
    pub max_dishes_per_user: usize,
    /// Days an entry survives without writes
    pub retention_days: i64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_dishes_per_user: MAX_DISHES_PER_USER,
            retention_days: RETENTION_DAYS,
        }
    }
}

/// Thread-safe in-memory dish history keyed by user id
///
/// Share across requests via `Arc`. Writes take a single coarse lock; no I/O
/// happens while it is held.
#[derive(Debug, Default)]
pub struct UserHistory {
    entries: RwLock<HashMap<String, HistoryEntry>>,
    config: HistoryConfig,
}

impl UserHistory {
    /// Create a history with default limits
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history with custom limits
    #[must_use]
    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Append dishes for `user_id` at the current time
    pub fn add_dishes(&self, user_id: &str, dishes: &[String]) {
        self.add_dishes_at(user_id, dishes, Utc::now());
    }

    /// Append dishes for `user_id` as if written at `now`
    ///
    /// Blank user ids and empty dish lists are ignored.
    pub fn add_dishes_at(&self, user_id: &str, dishes: &[String], now: DateTime<Utc>) {
        if user_id.trim().is_empty() || dishes.is_empty() {
            return;
        }

        let Ok(mut entries) = self.entries.write() else {
            // Lock poisoned - history is non-critical
            return;
        };

        let entry = entries
            .entry(user_id.to_owned())
            .or_insert_with(|| HistoryEntry {
                dishes: Vec::new(),
                last_updated: now,
            });
        entry.dishes.extend(dishes.iter().cloned());
        let overflow = entry
            .dishes
            .len()
            .saturating_sub(self.config.max_dishes_per_user);
        entry.dishes.drain(..overflow);
        entry.last_updated = now;

        let cutoff = now - Duration::days(self.config.retention_days);
        let before = entries.len();
        entries.retain(|_, e| e.last_updated >= cutoff);
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!(evicted, "Evicted stale user history entries");
        }
    }

    /// Up to `limit` most recent dishes for `user_id`, newest first
    #[must_use]
    pub fn recent_dishes(&self, user_id: &str, limit: usize) -> Vec<String> {
        let Ok(entries) = self.entries.read() else {
            return Vec::new();
        };
        entries.get(user_id).map_or_else(Vec::new, |entry| {
            entry.dishes.iter().rev().take(limit).cloned().collect()
        })
    }

    /// Forget everything about `user_id`
    pub fn clear(&self, user_id: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(user_id);
        }
    }

    /// Number of users with a history entry
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }
}

#[cfg(test)]
mod tests {
    use std::ops::Range;

    use super::*;

    fn dishes(range: Range<usize>) -> Vec<String> {
        range.map(|i| format!("d{i}")).collect()
    }

    #[test]
    fn test_fifo_cap_keeps_newest_dishes() {
        let history = UserHistory::new();
        history.add_dishes("an", &dishes(0..15));
        history.add_dishes("an", &dishes(15..25));

        let recent = history.recent_dishes("an", 100);
        assert_eq!(recent.len(), MAX_DISHES_PER_USER);
        assert_eq!(recent.first().map(String::as_str), Some("d24"));
        assert_eq!(recent.last().map(String::as_str), Some("d5"));
    }

    #[test]
    fn test_recent_dishes_are_newest_first_and_limited() {
        let history = UserHistory::new();
        history.add_dishes("an", &dishes(0..3));

        assert_eq!(history.recent_dishes("an", 2), vec!["d2", "d1"]);
        assert!(history.recent_dishes("bình", 10).is_empty());
    }

    #[test]
    fn test_stale_users_are_evicted_on_write() {
        let history = UserHistory::new();
        let now = Utc::now();
        history.add_dishes_at("cũ", &dishes(0..2), now - Duration::days(RETENTION_DAYS + 1));
        history.add_dishes_at("mới", &dishes(0..2), now - Duration::days(1));
        assert_eq!(history.user_count(), 2);

        history.add_dishes_at("an", &dishes(0..1), now);

        assert_eq!(history.user_count(), 2);
        assert!(history.recent_dishes("cũ", 10).is_empty());
        assert_eq!(history.recent_dishes("mới", 10).len(), 2);
    }

    #[test]
    fn test_custom_limits_and_clear() {
        let history = UserHistory::with_config(HistoryConfig {
            max_dishes_per_user: 3,
            retention_days: 1,
        });
        history.add_dishes("an", &dishes(0..5));
        assert_eq!(history.recent_dishes("an", 10), vec!["d4", "d3", "d2"]);

        history.clear("an");
        assert!(history.recent_dishes("an", 10).is_empty());
        assert_eq!(history.user_count(), 0);
    }

    #[test]
    fn test_blank_user_and_empty_dishes_are_ignored() {
        let history = UserHistory::new();
        history.add_dishes("  ", &dishes(0..2));
        history.add_dishes("an", &[]);
        assert_eq!(history.user_count(), 0);
    }
}
