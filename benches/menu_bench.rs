// ABOUTME: Criterion benchmarks for the deterministic menu planning stages
// ABOUTME: Measures candidate selection, menu pricing and generator output repair
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for menu planning.
//!
//! Measures the per-request CPU work that runs between LLM calls.

#![allow(clippy::missing_docs_in_private_items, missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thucdon::intelligence::{
    parse_product_documents, price_menu, select_candidates, CatalogSnapshot, JsonRepair,
};
use thucdon::models::{IngredientUse, Intent, MealType, Menu, MenuItem, Product, ProductCategory};

const CATEGORIES: [ProductCategory; 6] = [
    ProductCategory::Meat,
    ProductCategory::Seafood,
    ProductCategory::Vegetable,
    ProductCategory::Protein,
    ProductCategory::Fruit,
    ProductCategory::Beverage,
];

fn generate_products(count: usize) -> Vec<Product> {
    (0..count)
        .map(|i| Product {
            id: format!("prod_{i:04}"),
            name: format!("Sản phẩm {i}"),
            category: CATEGORIES[i % CATEGORIES.len()],
            unit_price: 2_000.0 + ((i * 733) % 40_000) as f64,
            stock_quantity: 50.0,
            unit: "100g".to_owned(),
        })
        .collect()
}

fn generate_documents(products: &[Product]) -> Vec<String> {
    products
        .chunks(5)
        .map(|chunk| {
            let lines: Vec<String> = chunk
                .iter()
                .map(|p| format!("{}: {} - {:.0}", p.id, p.name, p.unit_price))
                .collect();
            format!("Sản phẩm cho bữa trưa: {}", lines.join(", "))
        })
        .collect()
}

fn generate_menu(products: &[Product], dishes: usize) -> Menu {
    let items = (0..dishes)
        .map(|d| MenuItem {
            name: format!("Món {d}"),
            ingredients: products
                .iter()
                .skip(d * 3)
                .take(3)
                .map(|p| IngredientUse {
                    product_ref: p.id.clone(),
                    name: p.name.clone(),
                    quantity: 2.0,
                    unit: p.unit.clone(),
                    price: 0.0,
                })
                .collect(),
            price: 0.0,
        })
        .collect();
    Menu {
        items,
        total_price: 0.0,
    }
}

fn lunch_intent() -> Intent {
    Intent {
        budget: 200_000,
        budget_specified: true,
        meal_type: MealType::Noon,
        meal_type_specified: true,
        num_people: 3,
        preferences: Vec::new(),
    }
}

fn bench_candidate_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("candidate_selection");
    let intent = lunch_intent();

    for size in [50_usize, 200, 1_000] {
        let documents = generate_documents(&generate_products(size));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &documents, |b, docs| {
            b.iter(|| {
                let mut rng = ChaCha8Rng::seed_from_u64(7);
                let parsed = parse_product_documents(black_box(docs));
                select_candidates(parsed, &intent, &mut rng)
            });
        });
    }
    group.finish();
}

fn bench_price_menu(c: &mut Criterion) {
    let products = generate_products(500);
    let catalog = CatalogSnapshot::new(products.clone());
    let mut group = c.benchmark_group("price_menu");

    for dishes in [3_usize, 10, 50] {
        let menu = generate_menu(&products, dishes);
        group.bench_with_input(BenchmarkId::from_parameter(dishes), &menu, |b, menu| {
            b.iter(|| price_menu(black_box(menu), &catalog));
        });
    }
    group.finish();
}

fn bench_json_repair(c: &mut Criterion) {
    let menu = generate_menu(&generate_products(30), 5);
    let clean = serde_json::to_string(&menu).unwrap_or_default();
    let fenced = format!("Đây là thực đơn:\n```json\n{clean}\n```\nChúc ngon miệng!");
    let trailing_commas = clean.replace("}]", "},]");

    let mut group = c.benchmark_group("json_repair");
    group.bench_function("clean", |b| b.iter(|| JsonRepair::parse(black_box(&clean))));
    group.bench_function("fenced", |b| b.iter(|| JsonRepair::parse(black_box(&fenced))));
    group.bench_function("trailing_commas", |b| {
        b.iter(|| JsonRepair::parse(black_box(&trailing_commas)));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_candidate_selection,
    bench_price_menu,
    bench_json_repair
);
criterion_main!(benches);
