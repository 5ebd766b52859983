// ABOUTME: Core types and constants for the Thucdon budget menu planner
// ABOUTME: Foundation crate with error handling, domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Thucdon Core
//!
//! Foundation crate providing shared types and constants for the Thucdon
//! menu planner. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `WorkflowError`
//! - **constants**: Budget, retrieval and meal-time constants organized by domain
//! - **models**: Intent, product and menu data models

/// Unified error handling system with standard error codes and HTTP status mapping
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (Intent, Product, Menu, etc.)
pub mod models;
