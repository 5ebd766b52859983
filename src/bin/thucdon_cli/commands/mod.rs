// ABOUTME: Re-exports command modules for thucdon-cli
// ABOUTME: Provides the suggest, candidates and provider commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod candidates;
pub mod provider;
pub mod suggest;
