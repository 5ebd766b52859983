// ABOUTME: User intent model extracted from free-text menu requests
// ABOUTME: Intent and MealType with Vietnamese meal labels
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use serde::{Deserialize, Serialize};

/// Meal of the day a menu is planned for
///
/// Serialized with the Vietnamese label used in prompts and responses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MealType {
    /// Breakfast ("sáng")
    #[serde(rename = "sáng", alias = "morning")]
    Morning,
    /// Lunch ("trưa")
    #[serde(rename = "trưa", alias = "noon")]
    Noon,
    /// Dinner ("tối")
    #[serde(rename = "tối", alias = "evening")]
    Evening,
}

impl MealType {
    /// Vietnamese label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Morning => "sáng",
            Self::Noon => "trưa",
            Self::Evening => "tối",
        }
    }

    /// Parse a meal type from either the Vietnamese label or the English name
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sáng" | "sang" | "morning" | "breakfast" => Some(Self::Morning),
            "trưa" | "trua" | "noon" | "lunch" => Some(Self::Noon),
            "tối" | "toi" | "evening" | "dinner" => Some(Self::Evening),
            _ => None,
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Structured request extracted from the user's query
///
/// Budget and meal type are always concrete here; the `*_specified` flags
/// record whether the user stated them or a default was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Total budget for the whole party, in VND
    pub budget: u64,
    /// Whether the user stated the budget
    pub budget_specified: bool,
    /// Meal the menu is for
    pub meal_type: MealType,
    /// Whether the meal came from a keyword rather than the clock
    pub meal_type_specified: bool,
    /// Number of people eating, at least 1
    pub num_people: u32,
    /// Free-form preferences in the order given
    pub preferences: Vec<String>,
}

impl Intent {
    /// Budget share per person, rounded down
    #[must_use]
    pub fn per_person_budget(&self) -> u64 {
        self.budget / u64::from(self.num_people.max(1))
    }
}
