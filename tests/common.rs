// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Provides a scripted LLM provider, a small catalog and knowledge documents
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::unwrap_used
)]
//! Shared test utilities for `thucdon`
//!
//! The scripted provider replays canned completions in order and records
//! every prompt it receives so tests can assert on what the workflow sent.

use std::collections::VecDeque;
use std::env;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use serde_json::{json, Value};
use thucdon::catalog::StaticCatalog;
use thucdon::errors::AppError;
use thucdon::knowledge::InMemoryKnowledgeStore;
use thucdon::llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, TokenUsage};
use thucdon::models::{Product, ProductCategory};
use thucdon::workflow::{FixedClock, MenuWorkflow};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

// ============================================================================
// Scripted LLM Provider
// ============================================================================

/// Usage reported for every scripted completion
pub const SCRIPTED_USAGE: TokenUsage = TokenUsage {
    prompt_tokens: 100,
    completion_tokens: 20,
    total_tokens: 120,
};

/// Provider that replays queued completions in order
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, AppError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful completion
    pub fn reply(self, content: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(content.into()));
        self
    }

    /// Queue a JSON completion
    pub fn reply_json(self, value: &Value) -> Self {
        self.reply(value.to_string())
    }

    /// Queue a provider failure
    pub fn fail(self, error: AppError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Completions requested so far
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// User prompt of the `index`-th call
    pub fn prompt(&self, index: usize) -> String {
        self.prompts.lock().unwrap()[index].clone()
    }

    /// Replies that were never consumed
    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted Test Provider"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::JSON_MODE | LlmCapabilities::SYSTEM_MESSAGES
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let prompt = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.prompts.lock().unwrap().push(prompt);

        let next = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::internal("scripted provider exhausted")));

        next.map(|content| ChatResponse {
            content,
            model: "scripted-model".to_owned(),
            usage: Some(SCRIPTED_USAGE),
            finish_reason: Some("stop".to_owned()),
        })
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn product(
    id: &str,
    name: &str,
    category: ProductCategory,
    unit_price: f64,
    stock_quantity: f64,
    unit: &str,
) -> Product {
    Product {
        id: id.to_owned(),
        name: name.to_owned(),
        category,
        unit_price,
        stock_quantity,
        unit: unit.to_owned(),
    }
}

/// Small catalog: five usable products, one scarce fish and one pantry staple
pub fn fixture_products() -> Vec<Product> {
    vec![
        product("prod_001", "Thịt gà", ProductCategory::Meat, 10_000.0, 50.0, "100g"),
        product("prod_002", "Rau muống", ProductCategory::Vegetable, 7_000.0, 20.0, "bó"),
        product("prod_003", "Cà chua", ProductCategory::Vegetable, 5_000.0, 30.0, "300g"),
        product("prod_004", "Trứng gà", ProductCategory::Protein, 3_500.0, 60.0, "quả"),
        product("prod_005", "Trà xanh đóng chai", ProductCategory::Beverage, 12_000.0, 10.0, "chai"),
        product("prod_006", "Cá basa", ProductCategory::Seafood, 9_500.0, 2.0, "100g"),
        product("prod_007", "Nước mắm", ProductCategory::Other, 25_000.0, 30.0, "chai"),
    ]
}

/// Knowledge documents covering every fixture product
pub fn fixture_documents() -> Vec<String> {
    vec![
        "Sản phẩm cho bữa trưa và bữa tối: prod_001: Thịt gà - 10000, prod_006: Cá basa - 9500"
            .to_owned(),
        "Sản phẩm rau cho bữa trưa, bữa tối: prod_002: Rau muống - 7000, prod_003: Cà chua - 5000"
            .to_owned(),
        "Sản phẩm cho bữa sáng: prod_004: Trứng gà - 3500, prod_005: Trà xanh đóng chai - 12000"
            .to_owned(),
        "Sản phẩm gia vị: prod_007: Nước mắm - 25000".to_owned(),
    ]
}

/// Workflow over the fixtures with a fixed noon clock and seed
pub fn fixture_workflow(provider: Arc<ScriptedProvider>) -> MenuWorkflow {
    init_test_logging();
    MenuWorkflow::new(
        provider,
        Arc::new(InMemoryKnowledgeStore::new(fixture_documents())),
        Arc::new(StaticCatalog::new(fixture_products())),
    )
    .with_clock(Arc::new(FixedClock::new(12)))
    .with_seed(7)
}

/// Intent completion as the generator would return it
pub fn intent_json(budget: Option<u64>, num_people: u32) -> Value {
    json!({
        "budget": budget,
        "num_people": num_people,
        "preferences": []
    })
}

/// Single-dish menu using `quantity` units of chicken
pub fn chicken_menu(quantity: f64) -> Value {
    json!({
        "items": [{
            "name": "Gà luộc",
            "ingredients": [
                {"product_id": "prod_001", "name": "Thịt gà", "quantity": quantity, "unit": "100g"}
            ]
        }]
    })
}

/// Two-dish lunch totalling 79.000 VND once priced
pub fn lunch_menu() -> Value {
    json!({
        "items": [
            {
                "name": "Gà luộc",
                "ingredients": [
                    {"product_id": "prod_001", "name": "Thịt gà", "quantity": 5, "unit": "100g", "price": 1}
                ]
            },
            {
                "name": "Canh rau muống cà chua",
                "ingredients": [
                    {"product_id": "prod_002", "name": "Rau muống", "quantity": 2, "unit": "bó"},
                    {"product_id": "prod_003", "name": "Cà chua", "quantity": 3, "unit": "300g"}
                ]
            }
        ],
        "total_price": 999
    })
}
