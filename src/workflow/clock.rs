// ABOUTME: Time source used for meal-time fallback detection
// ABOUTME: System clock for production and a fixed clock for deterministic tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{Local, Timelike};

/// Source of the current local hour
pub trait Clock: Send + Sync {
    /// Hour of day in `0..24`
    fn current_hour(&self) -> u32;
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_hour(&self) -> u32 {
        Local::now().hour()
    }
}

/// Clock stuck at one hour
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    hour: u32,
}

impl FixedClock {
    /// Clock that always reports `hour` (taken modulo 24)
    #[must_use]
    pub const fn new(hour: u32) -> Self {
        Self { hour: hour % 24 }
    }
}

impl Clock for FixedClock {
    fn current_hour(&self) -> u32 {
        self.hour
    }
}
