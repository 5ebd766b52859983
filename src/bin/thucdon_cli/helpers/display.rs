// ABOUTME: Output formatting helpers for thucdon-cli
// ABOUTME: Renders menu responses and candidate lists for the terminal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::Serialize;
use thucdon::errors::AppResult;
use thucdon::intelligence::format_vnd;
use thucdon::models::Intent;
use thucdon::workflow::{MenuResponse, Retrieval};

/// Print any response body as pretty JSON
pub fn display_json<T: Serialize>(body: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(body)?);
    Ok(())
}

/// Print a readable menu
pub fn display_response(response: &MenuResponse) {
    println!("\n{}", response.message);
    println!("{}", "=".repeat(80));

    if !response.is_success() {
        println!("Status: {}", response.status_code);
        return;
    }

    for dish in &response.data.menu {
        println!("{}  ({} VND)", dish.name, format_vnd(dish.total_price));
        for ing in &dish.ingredients {
            println!(
                "   - {} {} {}  {} VND",
                ing.name,
                ing.quantity,
                ing.unit,
                format_vnd(ing.price)
            );
        }
    }

    println!("{}", "=".repeat(80));
    println!(
        "Total: {} / {} VND",
        format_vnd(response.data.total_estimated_price),
        format_vnd(response.data.total_budget as f64)
    );
    println!(
        "Time: {:.3}s   Tokens: {}",
        response.metadata.process_time, response.metadata.token_usage.total_tokens
    );
}

/// Print the retrieval query, filter counters and candidates
pub fn display_candidates(intent: &Intent, retrieval: &Retrieval) {
    let selection = &retrieval.selection;
    println!("\nQuery: {}", retrieval.query);
    println!(
        "Meal: {}   Budget: {} VND   People: {}",
        intent.meal_type,
        format_vnd(intent.budget as f64),
        intent.num_people
    );
    println!(
        "Documents: {}   Parsed: {}   Excluded: {}   Duplicates: {}   Over ceiling: {}",
        retrieval.documents.len(),
        selection.parsed,
        selection.excluded,
        selection.duplicates,
        selection.over_ceiling
    );
    println!("{}", "=".repeat(80));
    for product in retrieval.candidates() {
        println!(
            "{:<10} {:<30} {:>10} VND  stock {} {}",
            product.id,
            product.name,
            format_vnd(product.unit_price),
            product.stock_quantity,
            product.unit
        );
    }
}
