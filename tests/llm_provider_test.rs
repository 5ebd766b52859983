// ABOUTME: Tests for the LLM provider types and the OpenAI-compatible adapter
// ABOUTME: Runs the adapter against a one-shot local HTTP stub to check error classification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::time::Duration;

use thucdon::config::{LlmConfig, LlmProviderType};
use thucdon::errors::ErrorCode;
use thucdon::llm::{
    classify_http_status, classify_provider_message, ChatMessage, ChatRequest, LlmCapabilities,
    LlmProvider, MessageRole, OpenAiCompatibleConfig, OpenAiCompatibleProvider,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

// =============================================================================
// Request and Capability Types
// =============================================================================

#[test]
fn test_chat_request_builder() {
    let request = ChatRequest::new(vec![
        ChatMessage::system("Bạn là đầu bếp"),
        ChatMessage::user("Gợi ý bữa trưa"),
    ])
    .with_model("gpt-4o-mini")
    .with_temperature(0.2)
    .with_max_tokens(512)
    .with_json_mode();

    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, MessageRole::System);
    assert_eq!(request.messages[1].role.as_str(), "user");
    assert_eq!(request.model.as_deref(), Some("gpt-4o-mini"));
    assert_eq!(request.max_tokens, Some(512));
    assert!(request.json_mode);
}

#[test]
fn test_capabilities_flags() {
    let caps = LlmCapabilities::JSON_MODE | LlmCapabilities::SYSTEM_MESSAGES;
    assert!(caps.supports_json_mode());
    assert!(caps.supports_system_messages());
    assert!(!LlmCapabilities::empty().supports_json_mode());
}

// =============================================================================
// Failure Classification
// =============================================================================

#[test]
fn test_http_status_classification() {
    assert_eq!(classify_http_status(401), Some(ErrorCode::ExternalAuthFailed));
    assert_eq!(classify_http_status(429), Some(ErrorCode::ExternalRateLimited));
    assert_eq!(classify_http_status(504), Some(ErrorCode::ExternalTimeout));
    assert_eq!(
        classify_http_status(503),
        Some(ErrorCode::ExternalServiceUnavailable)
    );
    assert_eq!(
        classify_http_status(400),
        Some(ErrorCode::ExternalInvalidResponse)
    );
    assert_eq!(
        classify_http_status(422),
        Some(ErrorCode::ExternalInvalidResponse)
    );
    assert_eq!(classify_http_status(500), None);
}

#[test]
fn test_message_classification_prefers_quota() {
    assert_eq!(
        classify_provider_message("429: You exceeded your current quota"),
        ErrorCode::QuotaExceeded
    );
    assert_eq!(
        classify_provider_message("RESOURCE_EXHAUSTED for project"),
        ErrorCode::QuotaExceeded
    );
    assert_eq!(
        classify_provider_message("Too Many Requests"),
        ErrorCode::ExternalRateLimited
    );
    assert_eq!(
        classify_provider_message("Incorrect API key provided"),
        ErrorCode::ExternalAuthFailed
    );
    assert_eq!(
        classify_provider_message("upstream said no"),
        ErrorCode::ExternalServiceError
    );
}

// =============================================================================
// Adapter Against a Local Stub
// =============================================================================

/// Serve one canned HTTP response and return the raw request text
async fn serve_once(status_line: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0_u8; 16 * 1024];
        let mut request = Vec::new();
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|l| {
                        l.to_lowercase()
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().unwrap())
                    })
                    .unwrap_or(0);
                if request.len() >= header_end + 4 + content_length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).into_owned()
    });

    (format!("http://{addr}/v1"), handle)
}

fn provider_for(base_url: String) -> OpenAiCompatibleProvider {
    let mut config = LlmConfig::for_provider(LlmProviderType::Groq);
    config.base_url = base_url;
    config.api_key = Some("test-key".to_owned());
    let mut resolved = OpenAiCompatibleConfig::from(&config);
    resolved.timeout = Duration::from_secs(5);
    OpenAiCompatibleProvider::new(resolved).unwrap()
}

fn json_request() -> ChatRequest {
    ChatRequest::new(vec![ChatMessage::user("Gợi ý bữa trưa 100k")]).with_json_mode()
}

#[tokio::test]
async fn test_successful_completion_reports_usage() {
    let body = serde_json::json!({
        "model": "llama-3.3-70b-versatile",
        "choices": [{
            "message": {"role": "assistant", "content": "{\"budget\": 100000}"},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 40, "completion_tokens": 8, "total_tokens": 48}
    })
    .to_string();
    let (base_url, server) = serve_once("200 OK", body).await;
    let provider = provider_for(base_url);

    let response = provider.complete(&json_request()).await.unwrap();

    assert_eq!(response.content, "{\"budget\": 100000}");
    assert_eq!(response.usage.unwrap().total_tokens, 48);
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));

    let raw_request = server.await.unwrap();
    assert!(raw_request.starts_with("POST /v1/chat/completions"));
    assert!(raw_request.to_lowercase().contains("authorization: bearer test-key"));
    assert!(raw_request.contains("json_object"));
}

#[tokio::test]
async fn test_quota_body_on_429_is_quota_exceeded() {
    let body = serde_json::json!({
        "error": {
            "message": "You exceeded your current quota, please check your plan",
            "type": "insufficient_quota",
            "code": "insufficient_quota"
        }
    })
    .to_string();
    let (base_url, _server) = serve_once("429 Too Many Requests", body).await;

    let error = provider_for(base_url)
        .complete(&json_request())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::QuotaExceeded);
    assert!(error.is_fatal());
}

#[tokio::test]
async fn test_plain_429_is_rate_limited() {
    let body = serde_json::json!({
        "error": {"message": "Rate limit reached for requests", "type": "requests"}
    })
    .to_string();
    let (base_url, _server) = serve_once("429 Too Many Requests", body).await;

    let error = provider_for(base_url)
        .complete(&json_request())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ExternalRateLimited);
}

#[tokio::test]
async fn test_unauthorized_is_auth_failure() {
    let body = serde_json::json!({
        "error": {"message": "Invalid API Key", "type": "invalid_request_error", "code": "invalid_api_key"}
    })
    .to_string();
    let (base_url, _server) = serve_once("401 Unauthorized", body).await;

    let error = provider_for(base_url)
        .complete(&json_request())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ExternalAuthFailed);
}

#[tokio::test]
async fn test_upstream_bad_request_is_invalid_response() {
    let body = serde_json::json!({
        "error": {
            "message": "This model's maximum context length is 8192 tokens",
            "type": "invalid_request_error",
            "code": "context_length_exceeded"
        }
    })
    .to_string();
    let (base_url, _server) = serve_once("400 Bad Request", body).await;

    let error = provider_for(base_url)
        .complete(&json_request())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ExternalInvalidResponse);
    assert_ne!(error.code.http_status(), 400);
    assert!(!error.is_fatal());
}

#[tokio::test]
async fn test_empty_choices_is_invalid_response() {
    let body = serde_json::json!({"model": "x", "choices": []}).to_string();
    let (base_url, _server) = serve_once("200 OK", body).await;

    let error = provider_for(base_url)
        .complete(&json_request())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ExternalInvalidResponse);
    assert!(!error.is_fatal());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_unavailable() {
    // bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let error = provider_for(format!("http://{addr}/v1"))
        .complete(&json_request())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ExternalServiceUnavailable);
}

#[test]
fn test_hosted_provider_requires_key() {
    let config = LlmConfig::for_provider(LlmProviderType::OpenAi);
    let error = OpenAiCompatibleProvider::from_llm_config(&config)
        .err()
        .expect("missing key must be rejected");
    assert_eq!(error.code, ErrorCode::ConfigMissing);

    let local = LlmConfig::for_provider(LlmProviderType::Local);
    let provider = OpenAiCompatibleProvider::from_llm_config(&local).unwrap();
    assert_eq!(provider.name(), "local");
    assert_eq!(provider.default_model(), "qwen2.5:14b-instruct");
}
