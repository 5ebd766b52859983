// ABOUTME: Prompt templates for intent parsing, menu generation and budget adjustment
// ABOUTME: Templates are loaded at compile time and rendered with workflow context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Prompts
//!
//! Prompt text lives in markdown files next to this module and is embedded at
//! compile time. Rendering is a single pass over `{placeholder}` markers, so
//! user text that happens to contain braces is never re-expanded.

use std::fmt::Write;

use thucdon_core::constants::budget::{
    TARGET_USAGE_MAX_RATIO, TARGET_USAGE_MIN_RATIO, TYPICAL_PER_PERSON_MAX,
    TYPICAL_PER_PERSON_MIN,
};
use thucdon_core::models::{Intent, Menu, Product};
use thucdon_intelligence::{format_vnd, AdjustmentDirection, AdjustmentDirective, AdjustmentPlan};

/// Intent extraction template
pub const PARSE_INTENT_TEMPLATE: &str = include_str!("parse_intent.md");

/// Menu generation template
pub const GENERATE_MENU_TEMPLATE: &str = include_str!("generate_menu.md");

/// Budget adjustment template
pub const ADJUST_MENU_TEMPLATE: &str = include_str!("adjust_menu.md");

/// Vietnamese meal-structure rules passed as prior context
pub const COMBINATION_RULES: &str = include_str!("combination_rules.md");

/// System message shared by every generation call
pub const SYSTEM_PROMPT: &str =
    "Bạn là đầu bếp Việt Nam lập thực đơn theo ngân sách. Luôn trả lời bằng một đối tượng JSON hợp lệ.";

/// Render the intent extraction prompt
#[must_use]
pub fn intent_prompt(user_input: &str) -> String {
    render(PARSE_INTENT_TEMPLATE, &[("user_input", user_input.to_owned())])
}

/// Everything the generator needs for a first proposal
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    /// Resolved intent
    pub intent: &'a Intent,
    /// Candidates the menu may reference
    pub candidates: &'a [Product],
    /// Dishes recently suggested to this user, newest first
    pub previous_dishes: &'a [String],
}

/// Render the first-proposal prompt
#[must_use]
pub fn generation_prompt(ctx: &GenerationContext<'_>) -> String {
    let intent = ctx.intent;
    let preferences = if intent.preferences.is_empty() {
        "không có".to_owned()
    } else {
        intent.preferences.join(", ")
    };

    render(
        GENERATE_MENU_TEMPLATE,
        &[
            ("meal_type", intent.meal_type.label().to_owned()),
            ("num_people", intent.num_people.to_string()),
            ("budget", format_vnd(intent.budget as f64)),
            ("preferences", preferences),
            ("budget_context", budget_context(intent)),
            ("previous_dishes", previous_dishes_block(ctx.previous_dishes)),
            ("candidates", candidate_lines(ctx.candidates)),
            ("combination_rules", COMBINATION_RULES.trim_end().to_owned()),
        ],
    )
}

/// Render an adjustment prompt for `plan` against the current `menu`
#[must_use]
pub fn adjustment_prompt(
    plan: &AdjustmentPlan,
    menu: &Menu,
    candidates: &[Product],
    band: (f64, f64),
) -> String {
    let problem = match plan.direction {
        AdjustmentDirection::Reduce => format!(
            "Vượt ngân sách {} VND, cần giảm",
            format_vnd(plan.overshoot())
        ),
        AdjustmentDirection::Enhance => format!(
            "Chưa tận dụng ngân sách, còn dư {} VND, cần tăng",
            format_vnd(plan.headroom())
        ),
    };

    let directives = plan
        .directives
        .iter()
        .enumerate()
        .map(|(i, d)| format!("{}. {}", i + 1, directive_text(*d, plan)))
        .collect::<Vec<_>>()
        .join("\n");

    let out_of_stock = if plan.out_of_stock.is_empty() {
        String::new()
    } else {
        format!(
            "**HẾT HÀNG (phải thay thế):** {}",
            plan.out_of_stock.join(", ")
        )
    };

    render(
        ADJUST_MENU_TEMPLATE,
        &[
            ("budget", format_vnd(plan.budget as f64)),
            ("lower_bound", format_vnd(band.0)),
            ("upper_bound", format_vnd(band.1)),
            ("total_price", format_vnd(plan.total_price)),
            ("problem", problem),
            ("directives", directives),
            ("out_of_stock", out_of_stock),
            ("menu", menu_lines(menu)),
            ("candidates", candidate_lines(candidates)),
        ],
    )
}

/// Target range sentence for the generator
#[must_use]
pub fn budget_context(intent: &Intent) -> String {
    let people = u64::from(intent.num_people);
    if intent.budget_specified {
        let budget = intent.budget as f64;
        format!(
            "Người dùng yêu cầu ngân sách {} VND. Cố gắng dùng {:.0}-{:.0}% ngân sách (khoảng {}-{} VND).",
            format_vnd(budget),
            TARGET_USAGE_MIN_RATIO * 100.0,
            TARGET_USAGE_MAX_RATIO * 100.0,
            format_vnd(budget * TARGET_USAGE_MIN_RATIO),
            format_vnd(budget * TARGET_USAGE_MAX_RATIO),
        )
    } else {
        format!(
            "Người dùng không nêu ngân sách. Chọn món phổ biến ở mức giá trung bình {}-{}k/người, khoảng {}-{} VND cho {} người, không cần dùng hết {} VND.",
            TYPICAL_PER_PERSON_MIN / 1000,
            TYPICAL_PER_PERSON_MAX / 1000,
            format_vnd((TYPICAL_PER_PERSON_MIN * people) as f64),
            format_vnd((TYPICAL_PER_PERSON_MAX * people) as f64),
            intent.num_people,
            format_vnd(intent.budget as f64),
        )
    }
}

fn previous_dishes_block(previous: &[String]) -> String {
    if previous.is_empty() {
        return String::new();
    }
    format!(
        "**TRÁNH LẶP MÓN:** người dùng gần đây đã được gợi ý: {}. Hãy chọn món khác.",
        previous.join(", ")
    )
}

/// One `id: name | price | stock` line per candidate
#[must_use]
pub fn candidate_lines(candidates: &[Product]) -> String {
    let mut out = String::new();
    for p in candidates {
        let unit = if p.unit.is_empty() { "đơn vị" } else { p.unit.as_str() };
        let _ = writeln!(
            out,
            "- {}: {} | giá mỗi {unit}: {} VND | tồn kho: {} {unit}",
            p.id,
            p.name,
            format_vnd(p.unit_price),
            p.stock_quantity,
        );
    }
    out.trim_end().to_owned()
}

fn menu_lines(menu: &Menu) -> String {
    let mut out = String::new();
    for item in &menu.items {
        let _ = writeln!(out, "- {} ({} VND)", item.name, format_vnd(item.price));
        for ing in &item.ingredients {
            let _ = writeln!(
                out,
                "    * {} {} {} {} ({} VND)",
                ing.product_ref,
                ing.name,
                ing.quantity,
                ing.unit,
                format_vnd(ing.price)
            );
        }
    }
    out.trim_end().to_owned()
}

fn directive_text(directive: AdjustmentDirective, plan: &AdjustmentPlan) -> String {
    match directive {
        AdjustmentDirective::DropDiscretionaryItems => {
            "Bỏ đồ uống và tráng miệng".to_owned()
        }
        AdjustmentDirective::ReduceDishCount => "Giảm số món".to_owned(),
        AdjustmentDirective::SubstituteCheaperIngredient => {
            "Thay nguyên liệu đắt bằng nguyên liệu rẻ hơn cùng loại trong danh sách".to_owned()
        }
        AdjustmentDirective::ShrinkPortions => "Giảm khẩu phần".to_owned(),
        AdjustmentDirective::KeepMainDishOnly => {
            "Bỏ món phụ và canh, chỉ giữ món chính".to_owned()
        }
        AdjustmentDirective::IncreasePortions => "Tăng khẩu phần các món hiện có".to_owned(),
        AdjustmentDirective::AddSideOrSoup => "Thêm một món rau hoặc canh".to_owned(),
        AdjustmentDirective::AddPackagedAddon => {
            let options = plan
                .addon_options
                .iter()
                .map(|p| format!("{} {} ({} VND)", p.id, p.name, format_vnd(p.unit_price)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("Thêm một đồ uống hoặc tráng miệng đóng gói: {options}")
        }
        AdjustmentDirective::UpgradeIngredientTier => {
            "Nâng cấp nguyên liệu lên loại tốt hơn cùng loại trong danh sách".to_owned()
        }
        AdjustmentDirective::AddDish => {
            "Thêm một món mới, chỉ dùng sản phẩm trong danh sách".to_owned()
        }
    }
}

/// Substitute `{key}` markers in one pass; unknown markers are left as-is
fn render(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (v, close))
        });
        if let Some((value, close)) = value {
            out.push_str(value);
            rest = &after[close + 1..];
        } else {
            out.push('{');
            rest = after;
        }
    }
    out.push_str(rest);
    out
}
