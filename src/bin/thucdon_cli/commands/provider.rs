// ABOUTME: Provider command reporting the configured LLM endpoint
// ABOUTME: Never prints the API key itself, only whether one is set
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thucdon::config::ServerConfig;

pub fn run(config: &ServerConfig) {
    let llm = &config.llm;
    println!("Provider:    {} ({})", llm.provider.display_name(), llm.provider);
    println!("Base URL:    {}", llm.base_url);
    println!("Model:       {}", llm.model);
    println!("Temperature: {}", llm.temperature);
    println!("Timeout:     {}s", llm.timeout_secs);
    println!(
        "API key:     {}",
        if llm.api_key.is_some() { "set" } else { "not set" }
    );
    match llm.validate() {
        Ok(()) => println!("Status:      ready"),
        Err(e) => println!("Status:      {e}"),
    }
    println!("Catalog:     {}", config.data.catalog_path.display());
    println!("Knowledge:   {}", config.data.knowledge_path.display());
}
