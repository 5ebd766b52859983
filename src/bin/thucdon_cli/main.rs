// ABOUTME: Thucdon CLI - command-line front end for the budget menu workflow
// ABOUTME: Suggests menus, inspects retrieval candidates and reports provider settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Suggest a menu
//! thucdon-cli suggest "Bữa trưa 100k cho 2 người"
//!
//! # Suggest with history and a fixed shuffle seed, printing JSON
//! thucdon-cli suggest "tối nay ăn gì" --user-id u1 --seed 42 --json
//!
//! # Show the candidates retrieval would hand to the generator
//! thucdon-cli candidates "bữa sáng" --budget 50000
//!
//! # Show the configured provider
//! thucdon-cli provider
//! ```

mod commands;
mod helpers;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thucdon::config::ServerConfig;
use thucdon::errors::AppResult;
use thucdon::logging::LoggingConfig;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "thucdon-cli",
    about = "Budget-constrained Vietnamese menu suggestions",
    long_about = "Suggests a Vietnamese meal menu that fits a budget, using an LLM, a knowledge store and a product catalog."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Catalog JSON override
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Knowledge documents JSON override
    #[arg(long, global = true)]
    knowledge: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Suggest a menu for a free-text request
    Suggest {
        /// Request text, e.g. "Bữa trưa 100k cho 2 người"
        query: String,

        /// User whose recent dishes should be avoided
        #[arg(long)]
        user_id: Option<String>,

        /// Seed for candidate shuffling
        #[arg(long)]
        seed: Option<u64>,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// List the candidates retrieval selects, without calling the LLM
    Candidates {
        /// Request text used for meal-time detection
        query: String,

        /// Budget in VND (defaults from meal type and party size)
        #[arg(long)]
        budget: Option<u64>,

        /// Number of people
        #[arg(long, default_value = "1")]
        people: u32,

        /// Seed for candidate shuffling
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show the configured LLM provider
    Provider,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig::from_env();
    let logging = if cli.verbose {
        logging.with_level("debug")
    } else {
        logging
    };
    logging.init()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(path) = cli.catalog {
        config.data.catalog_path = path;
    }
    if let Some(path) = cli.knowledge {
        config.data.knowledge_path = path;
    }
    debug!(?config.data, "Data configuration");

    match cli.command {
        Command::Suggest {
            query,
            user_id,
            seed,
            json,
        } => commands::suggest::run(&config, query, user_id, seed, json).await,
        Command::Candidates {
            query,
            budget,
            people,
            seed,
        } => commands::candidates::run(&config, &query, budget, people, seed).await,
        Command::Provider => {
            commands::provider::run(&config);
            Ok(())
        }
    }
}
