// ABOUTME: Re-exports the unified error types from the core crate
// ABOUTME: Keeps `crate::errors` paths stable for the workflow and provider adapters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! See [`thucdon_core::errors`] for the definitions.

pub use thucdon_core::errors::{
    AppError, AppResult, ErrorCode, ErrorResponse, ErrorResponseDetails, WorkflowError,
};
