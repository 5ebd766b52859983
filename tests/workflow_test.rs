// ABOUTME: End-to-end tests for the menu workflow using a scripted LLM provider
// ABOUTME: Covers acceptance, reduction, retry exhaustion, failures and user history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use common::{
    chicken_menu, fixture_products, fixture_workflow, intent_json, lunch_menu, ScriptedProvider,
    SCRIPTED_USAGE,
};
use serde_json::json;
use thucdon::catalog::StaticCatalog;
use thucdon::errors::{AppError, ErrorCode, ErrorResponse, WorkflowError};
use thucdon::intelligence::WorkflowPhase;
use thucdon::knowledge::InMemoryKnowledgeStore;
use thucdon::llm::classify_http_status;
use thucdon::models::MealType;
use thucdon::workflow::{FixedClock, MenuRequest, MenuWorkflow, WorkflowState};

const LUNCH_QUERY: &str = "Gợi ý bữa trưa cho 2 người, ngân sách 100k";
const TIGHT_QUERY: &str = "Gợi ý bữa trưa 50k";

// ============================================================================
// Accepted Menus
// ============================================================================

#[tokio::test]
async fn test_menu_within_band_is_accepted_without_adjustment() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_json(&intent_json(Some(100_000), 2))
            .reply_json(&lunch_menu()),
    );
    let workflow = fixture_workflow(Arc::clone(&provider));

    let response = workflow.run(MenuRequest::new(LUNCH_QUERY)).await.unwrap();

    assert!(response.is_success());
    assert_eq!(response.status_code, 200);
    assert_eq!(response.data.meal_type, Some(MealType::Noon));
    assert_eq!(response.data.total_budget, 100_000);
    assert!((response.data.total_estimated_price - 79_000.0).abs() < f64::EPSILON);
    assert_eq!(response.data.menu.len(), 2);
    assert!((response.data.menu[0].total_price - 50_000.0).abs() < f64::EPSILON);
    assert!(response.message.contains("2 món"));
    assert!(response.message.contains("100.000"));
    assert_eq!(provider.call_count(), 2);

    // intent and generation both report usage
    assert_eq!(
        response.metadata.token_usage.total_tokens,
        SCRIPTED_USAGE.total_tokens * 2
    );
}

#[tokio::test]
async fn test_priced_totals_ignore_generator_prices() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_json(&intent_json(Some(100_000), 2))
            .reply_json(&lunch_menu()),
    );
    let workflow = fixture_workflow(Arc::clone(&provider));

    let state = workflow
        .execute(WorkflowState::new(LUNCH_QUERY, None, Vec::new()))
        .await
        .unwrap();

    let dish_sum: f64 = state.menu.items.iter().map(|i| i.price).sum();
    assert!((state.menu.total_price - dish_sum).abs() < f64::EPSILON);
    for item in &state.menu.items {
        let ingredient_sum: f64 = item.ingredients.iter().map(|i| i.price).sum();
        assert!((item.price - ingredient_sum).abs() < f64::EPSILON);
    }
    assert_eq!(state.phase, WorkflowPhase::Finalizing);
    assert_eq!(state.iteration_count, 0);
}

#[tokio::test]
async fn test_over_budget_menu_is_reduced_once() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_json(&intent_json(Some(50_000), 1))
            .reply_json(&chicken_menu(8.0))
            .reply_json(&chicken_menu(4.0)),
    );
    let workflow = fixture_workflow(Arc::clone(&provider));

    let state = workflow
        .execute(WorkflowState::new(TIGHT_QUERY, None, Vec::new()))
        .await
        .unwrap();

    assert!(state.error.is_none());
    assert_eq!(state.iteration_count, 1);
    assert!((state.menu.total_price - 40_000.0).abs() < f64::EPSILON);
    assert_eq!(provider.call_count(), 3);

    let adjust_prompt = provider.prompt(2);
    assert!(adjust_prompt.contains("80.000"));
    assert!(adjust_prompt.contains("Gà luộc"));
}

#[tokio::test]
async fn test_under_budget_is_accepted_after_retries_run_out() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_json(&intent_json(Some(100_000), 1))
            .reply_json(&chicken_menu(3.0))
            .reply_json(&chicken_menu(3.0))
            .reply_json(&chicken_menu(3.0)),
    );
    let workflow = fixture_workflow(Arc::clone(&provider));

    let response = workflow.run(MenuRequest::new(LUNCH_QUERY)).await.unwrap();

    assert!(response.is_success());
    assert!((response.data.total_estimated_price - 30_000.0).abs() < f64::EPSILON);
    assert_eq!(provider.call_count(), 4);
}

// ============================================================================
// Workflow Failures
// ============================================================================

#[tokio::test]
async fn test_persistent_overspend_exhausts_adjustments() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_json(&intent_json(Some(50_000), 1))
            .reply_json(&chicken_menu(6.0))
            .reply_json(&chicken_menu(6.0))
            .reply_json(&chicken_menu(6.0)),
    );
    let workflow = fixture_workflow(Arc::clone(&provider));

    let state = workflow
        .execute(WorkflowState::new(TIGHT_QUERY, None, Vec::new()))
        .await
        .unwrap();

    assert_eq!(state.iteration_count, 2);
    assert_eq!(state.phase, WorkflowPhase::MaxRetriesExceededOverBudget);
    assert!(matches!(
        state.error,
        Some(WorkflowError::MaxRetriesExceededOverBudget {
            budget: 50_000,
            iterations: 2,
            ..
        })
    ));
    assert_eq!(provider.call_count(), 4);
    assert_eq!(provider.remaining(), 0);
}

#[tokio::test]
async fn test_overspend_response_hides_menu() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_json(&intent_json(Some(50_000), 1))
            .reply_json(&chicken_menu(6.0))
            .reply_json(&chicken_menu(6.0))
            .reply_json(&chicken_menu(6.0)),
    );
    let workflow = fixture_workflow(provider);

    let response = workflow
        .run(MenuRequest::new(TIGHT_QUERY).with_user_id("user-1"))
        .await
        .unwrap();

    assert!(!response.is_success());
    assert_eq!(response.status_code, ErrorCode::BudgetExceeded.http_status());
    assert!(response.data.menu.is_empty());
    assert!(response.data.total_estimated_price.abs() < f64::EPSILON);
    assert!(workflow.history().recent_dishes("user-1", 10).is_empty());
}

#[tokio::test]
async fn test_empty_knowledge_store_reports_no_candidates() {
    let provider = Arc::new(ScriptedProvider::new().reply_json(&intent_json(Some(100_000), 2)));
    let workflow = MenuWorkflow::new(
        Arc::<ScriptedProvider>::clone(&provider),
        Arc::new(InMemoryKnowledgeStore::new(Vec::new())),
        Arc::new(StaticCatalog::new(fixture_products())),
    )
    .with_clock(Arc::new(FixedClock::new(12)))
    .with_seed(1);

    let response = workflow.run(MenuRequest::new(LUNCH_QUERY)).await.unwrap();

    assert_eq!(response.status_code, ErrorCode::NoCandidates.http_status());
    assert_eq!(response.message, ErrorCode::NoCandidates.description());
    assert!(response.data.menu.is_empty());
    // generation is skipped once retrieval fails
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_ingredient_outside_candidates_fails_request() {
    let caviar = json!({
        "items": [{
            "name": "Trứng cá muối",
            "ingredients": [
                {"product_id": "prod_999", "name": "Trứng cá tầm", "quantity": 1, "unit": "hộp"}
            ]
        }]
    });
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_json(&intent_json(Some(100_000), 2))
            .reply_json(&caviar),
    );
    let workflow = fixture_workflow(Arc::clone(&provider));

    let state = workflow
        .execute(WorkflowState::new(LUNCH_QUERY, None, Vec::new()))
        .await
        .unwrap();

    assert_eq!(
        state.error,
        Some(WorkflowError::UnknownIngredients {
            names: vec!["Trứng cá tầm".to_owned()]
        })
    );
    assert_eq!(state.phase, WorkflowPhase::Failed);
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn test_non_fatal_generation_error_becomes_failure_response() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_json(&intent_json(Some(100_000), 2))
            .fail(AppError::timeout("OpenAI", "request timed out after 60s")),
    );
    let workflow = fixture_workflow(provider);

    let response = workflow.run(MenuRequest::new(LUNCH_QUERY)).await.unwrap();

    assert_eq!(response.status_code, 500);
    assert!(!response.message.contains("60s"));
}

#[tokio::test]
async fn test_upstream_bad_request_is_server_failure() {
    let status = classify_http_status(400).unwrap();
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_json(&intent_json(Some(100_000), 2))
            .fail(AppError::new(
                status,
                "OpenAI: This model's maximum context length is 8192 tokens",
            )),
    );
    let workflow = fixture_workflow(provider);

    let response = workflow.run(MenuRequest::new(LUNCH_QUERY)).await.unwrap();

    assert_eq!(response.status_code, 500);
    assert_ne!(response.message, ErrorCode::InvalidInput.description());
    assert!(!response.message.contains("8192"));
    assert!(response.data.menu.is_empty());
}

#[tokio::test]
async fn test_malformed_menu_is_invalid_response() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_json(&intent_json(Some(100_000), 2))
            .reply("Xin lỗi, tôi không thể gợi ý thực đơn lúc này."),
    );
    let workflow = fixture_workflow(provider);

    let state = workflow
        .execute(WorkflowState::new(LUNCH_QUERY, None, Vec::new()))
        .await
        .unwrap();

    assert!(matches!(
        state.error,
        Some(WorkflowError::InvalidMenuResponse { .. })
    ));
}

// ============================================================================
// Fatal Provider Errors
// ============================================================================

#[tokio::test]
async fn test_quota_during_intent_aborts_request() {
    let provider = Arc::new(
        ScriptedProvider::new().fail(AppError::quota_exceeded("OpenAI", "insufficient_quota")),
    );
    let workflow = fixture_workflow(Arc::clone(&provider));

    let error = workflow
        .run(MenuRequest::new(LUNCH_QUERY))
        .await
        .expect_err("quota must abort");

    assert_eq!(error.code, ErrorCode::QuotaExceeded);
    assert_eq!(provider.call_count(), 1);

    let body = serde_json::to_value(ErrorResponse::from(&error)).unwrap();
    assert_eq!(body["error"]["code"], "QUOTA_EXCEEDED");
    assert!(!body.to_string().contains("insufficient_quota"));
}

#[tokio::test]
async fn test_rate_limit_during_adjustment_aborts_request() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_json(&intent_json(Some(50_000), 1))
            .reply_json(&chicken_menu(8.0))
            .fail(AppError::rate_limited("Groq", "429 Too Many Requests")),
    );
    let workflow = fixture_workflow(provider);

    let error = workflow
        .run(MenuRequest::new(TIGHT_QUERY))
        .await
        .expect_err("rate limit must abort");

    assert_eq!(error.code, ErrorCode::ExternalRateLimited);
}

#[tokio::test]
async fn test_blank_query_is_rejected_before_any_call() {
    let provider = Arc::new(ScriptedProvider::new());
    let workflow = fixture_workflow(Arc::clone(&provider));

    let error = workflow.run(MenuRequest::new("   ")).await.unwrap_err();

    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert_eq!(provider.call_count(), 0);
}

// ============================================================================
// Intent Fallback and History
// ============================================================================

#[tokio::test]
async fn test_unparseable_intent_uses_clock_defaults() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply("không hiểu")
            .reply_json(&chicken_menu(5.0)),
    );
    let workflow = fixture_workflow(Arc::clone(&provider));

    let state = workflow
        .execute(WorkflowState::new("Nấu gì bây giờ?", None, Vec::new()))
        .await
        .unwrap();

    let intent = state.intent.expect("intent resolved from defaults");
    assert_eq!(intent.meal_type, MealType::Noon);
    assert_eq!(intent.budget, 65_000);
    assert!(!intent.budget_specified);
    assert!(!intent.meal_type_specified);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_accepted_dishes_feed_next_request() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_json(&intent_json(Some(100_000), 2))
            .reply_json(&lunch_menu())
            .reply_json(&intent_json(Some(100_000), 2))
            .reply_json(&lunch_menu()),
    );
    let workflow = fixture_workflow(Arc::clone(&provider));

    let first = workflow
        .run(MenuRequest::new(LUNCH_QUERY).with_user_id("user-42"))
        .await
        .unwrap();
    assert!(first.is_success());

    let remembered = workflow.history().recent_dishes("user-42", 10);
    assert!(remembered.contains(&"Gà luộc".to_owned()));
    assert!(remembered.contains(&"Canh rau muống cà chua".to_owned()));

    workflow
        .run(MenuRequest::new(LUNCH_QUERY).with_user_id("user-42"))
        .await
        .unwrap();

    // second generation prompt lists the first request's dishes
    assert!(provider.prompt(3).contains("Gà luộc"));
    assert!(!provider.prompt(1).contains("Gà luộc"));
}

#[tokio::test]
async fn test_anonymous_requests_leave_history_untouched() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_json(&intent_json(Some(100_000), 2))
            .reply_json(&lunch_menu()),
    );
    let workflow = fixture_workflow(provider);

    workflow.run(MenuRequest::new(LUNCH_QUERY)).await.unwrap();

    assert_eq!(workflow.history().user_count(), 0);
}

#[tokio::test]
async fn test_generation_prompt_lists_only_filtered_candidates() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_json(&intent_json(Some(100_000), 2))
            .reply_json(&lunch_menu()),
    );
    let workflow = fixture_workflow(Arc::clone(&provider));

    workflow.run(MenuRequest::new(LUNCH_QUERY)).await.unwrap();

    let prompt = provider.prompt(1);
    assert!(prompt.contains("prod_001"));
    assert!(prompt.contains("Rau muống"));
    assert!(!prompt.contains("prod_007"));
}
