// ABOUTME: Budget validation state machine deciding accept, reduce, enhance or fail
// ABOUTME: Encodes the tolerance band and the relaxed rule once adjustments are exhausted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Budget Validator
//!
//! While adjustments remain, a menu is accepted when its total lies in
//! `[MIN_BUDGET_USAGE_RATIO * budget, BUDGET_TOLERANCE_RATIO * budget]`.
//! Once `iteration >= max_iterations` the rule relaxes to `total <= budget`,
//! and anything above that is terminal.
//!
//! Phases:
//!
//! ```text
//! Generating -> Validating -> {Accepted, NeedsReduction, NeedsEnhancement}
//! NeedsReduction | NeedsEnhancement -> Adjusting -> Validating
//! Accepted -> Finalizing
//! Validating -> MaxRetriesExceededOverBudget (terminal failure)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thucdon_core::constants::budget::{
    BUDGET_TOLERANCE_RATIO, MAX_ADJUST_ITERATIONS, MIN_BUDGET_USAGE_RATIO,
};

/// Where a request currently sits in the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    /// Resolving intent
    ParsingIntent,
    /// Retrieving candidates
    Retrieving,
    /// First menu proposal
    Generating,
    /// Repricing and checking the budget band
    Validating,
    /// Menu is within the band
    Accepted,
    /// Menu is above the band
    NeedsReduction,
    /// Menu is below the band
    NeedsEnhancement,
    /// Asking the generator for a corrected menu
    Adjusting,
    /// Building the response
    Finalizing,
    /// Still over budget with no adjustments left
    MaxRetriesExceededOverBudget,
    /// A stage recorded a workflow error
    Failed,
}

impl WorkflowPhase {
    /// Whether the workflow cannot move past this phase
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Finalizing | Self::MaxRetriesExceededOverBudget | Self::Failed
        )
    }
}

impl fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ParsingIntent => "parsing_intent",
            Self::Retrieving => "retrieving",
            Self::Generating => "generating",
            Self::Validating => "validating",
            Self::Accepted => "accepted",
            Self::NeedsReduction => "needs_reduction",
            Self::NeedsEnhancement => "needs_enhancement",
            Self::Adjusting => "adjusting",
            Self::Finalizing => "finalizing",
            Self::MaxRetriesExceededOverBudget => "max_retries_exceeded_over_budget",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of one validation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetVerdict {
    /// Within the band, or at most the budget once adjustments are exhausted
    Accepted,
    /// Above the upper bound with adjustments left
    NeedsReduction,
    /// Below the lower bound with adjustments left
    NeedsEnhancement,
    /// Above the budget with no adjustments left
    MaxRetriesExceededOverBudget,
}

impl BudgetVerdict {
    /// Phase the workflow enters after this verdict
    #[must_use]
    pub const fn next_phase(&self) -> WorkflowPhase {
        match self {
            Self::Accepted => WorkflowPhase::Accepted,
            Self::NeedsReduction => WorkflowPhase::NeedsReduction,
            Self::NeedsEnhancement => WorkflowPhase::NeedsEnhancement,
            Self::MaxRetriesExceededOverBudget => WorkflowPhase::MaxRetriesExceededOverBudget,
        }
    }
}

/// Verdict plus the message handed to the adjuster
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetAssessment {
    /// Outcome
    pub verdict: BudgetVerdict,
    /// Explanation for non-accepted verdicts
    pub budget_error: Option<String>,
    /// Lower bound of the band
    pub lower_bound: f64,
    /// Upper bound of the band
    pub upper_bound: f64,
}

/// Budget band configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetValidator {
    /// Share of the budget below which a menu needs enhancement
    pub min_usage_ratio: f64,
    /// Share of the budget above which a menu needs reduction
    pub tolerance_ratio: f64,
    /// Adjustment passes allowed before the relaxed rule applies
    pub max_iterations: u32,
}

impl Default for BudgetValidator {
    fn default() -> Self {
        Self {
            min_usage_ratio: MIN_BUDGET_USAGE_RATIO,
            tolerance_ratio: BUDGET_TOLERANCE_RATIO,
            max_iterations: MAX_ADJUST_ITERATIONS,
        }
    }
}

impl BudgetValidator {
    /// Acceptable `(lower, upper)` totals for `budget`
    #[must_use]
    pub fn band(&self, budget: u64) -> (f64, f64) {
        let budget = budget as f64;
        (budget * self.min_usage_ratio, budget * self.tolerance_ratio)
    }

    /// Whether another adjustment is allowed at `iteration`
    #[must_use]
    pub const fn can_adjust(&self, iteration: u32) -> bool {
        iteration < self.max_iterations
    }

    /// Classify `total_price` against `budget` at the given iteration count
    #[must_use]
    pub fn evaluate(&self, total_price: f64, budget: u64, iteration: u32) -> BudgetAssessment {
        let (lower_bound, upper_bound) = self.band(budget);
        let budget_f = budget as f64;

        let (verdict, budget_error) = if !self.can_adjust(iteration) {
            if total_price <= budget_f {
                (BudgetVerdict::Accepted, None)
            } else {
                (
                    BudgetVerdict::MaxRetriesExceededOverBudget,
                    Some(format!(
                        "Exceeds budget: {} > {} VND",
                        format_vnd(total_price),
                        format_vnd(budget_f)
                    )),
                )
            }
        } else if total_price > upper_bound {
            (
                BudgetVerdict::NeedsReduction,
                Some(format!(
                    "Exceeds budget by {} VND",
                    format_vnd(total_price - budget_f)
                )),
            )
        } else if total_price < lower_bound {
            let usage = if budget == 0 {
                0.0
            } else {
                total_price / budget_f * 100.0
            };
            (
                BudgetVerdict::NeedsEnhancement,
                Some(format!("Under-utilized: {usage:.1}% of budget")),
            )
        } else {
            (BudgetVerdict::Accepted, None)
        };

        BudgetAssessment {
            verdict,
            budget_error,
            lower_bound,
            upper_bound,
        }
    }
}

/// Format a VND amount with `.` thousands separators, e.g. `50.000`
#[must_use]
pub fn format_vnd(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_vnd() {
        assert_eq!(format_vnd(0.0), "0");
        assert_eq!(format_vnd(999.0), "999");
        assert_eq!(format_vnd(50_000.0), "50.000");
        assert_eq!(format_vnd(1_234_567.4), "1.234.567");
    }

    #[test]
    fn test_band_edges() {
        let validator = BudgetValidator::default();
        assert_eq!(
            validator.evaluate(52_500.0, 50_000, 0).verdict,
            BudgetVerdict::Accepted
        );
        assert_eq!(
            validator.evaluate(37_500.0, 50_000, 0).verdict,
            BudgetVerdict::Accepted
        );
        assert_eq!(
            validator.evaluate(37_499.0, 50_000, 1).verdict,
            BudgetVerdict::NeedsEnhancement
        );
    }

    #[test]
    fn test_terminal_phases() {
        assert!(WorkflowPhase::MaxRetriesExceededOverBudget.is_terminal());
        assert!(!WorkflowPhase::Adjusting.is_terminal());
    }
}
