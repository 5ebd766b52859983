// ABOUTME: Unified error handling with error codes, boundary status mapping, and workflow errors
// ABOUTME: Provides AppError, ErrorCode, ErrorResponse and the per-request WorkflowError taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! This module provides a centralized error handling system for the menu planner.
//! It defines standard error types, error codes, and HTTP status mapping so the
//! boundary layer can answer consistently regardless of where a failure started.
//!
//! Two layers are distinguished:
//! - [`AppError`]: anything that crosses a collaborator boundary (LLM provider,
//!   knowledge store, catalog, configuration). Fatal provider conditions are
//!   recognised by their [`ErrorCode`], never by message text.
//! - [`WorkflowError`]: the per-request failure recorded in workflow state when a
//!   stage cannot continue. It never escapes the pipeline as a Rust error; the
//!   response builder turns it into a well-formed, empty response.

use std::error::Error as StdError;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Request payload is invalid
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// A required field is missing
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,
    /// Data could not be interpreted in the expected format
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat = 3002,

    // External Services (5000-5999)
    /// An upstream service failed for a non-specific reason
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// An upstream service could not be reached
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,
    /// Upstream rejected our credentials
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed = 5002,
    /// Upstream is throttling us
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited = 5003,
    /// Upstream usage quota is exhausted
    #[serde(rename = "QUOTA_EXCEEDED")]
    QuotaExceeded = 5004,
    /// Upstream did not answer in time
    #[serde(rename = "EXTERNAL_TIMEOUT")]
    ExternalTimeout = 5005,
    /// Upstream answered with something we could not use
    #[serde(rename = "EXTERNAL_INVALID_RESPONSE")]
    ExternalInvalidResponse = 5006,

    // Menu Workflow (7000-7999)
    /// Intent resolution left budget or meal type empty
    #[serde(rename = "INTENT_INCOMPLETE")]
    IntentIncomplete = 7000,
    /// Retrieval produced no usable candidates
    #[serde(rename = "NO_CANDIDATES")]
    NoCandidates = 7001,
    /// Generated menu referenced an ingredient outside the candidate set
    #[serde(rename = "UNKNOWN_INGREDIENT")]
    UnknownIngredient = 7002,
    /// Menu still exceeds the budget after all adjustment attempts
    #[serde(rename = "BUDGET_EXCEEDED")]
    BudgetExceeded = 7003,

    // Configuration (6000-6999)
    /// Generic configuration error
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,
    /// Required configuration is missing
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 6001,
    /// Configuration value is invalid
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6002,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Serialization or deserialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidInput | Self::MissingRequiredField | Self::InvalidFormat => 400,

            // 429 Too Many Requests
            Self::ExternalRateLimited => 429,

            // 503 Service Unavailable
            Self::QuotaExceeded
            | Self::ExternalAuthFailed
            | Self::ExternalServiceUnavailable
            | Self::ConfigError
            | Self::ConfigMissing
            | Self::ConfigInvalid => 503,

            // 500 Internal Server Error
            Self::ExternalServiceError
            | Self::ExternalTimeout
            | Self::ExternalInvalidResponse
            | Self::IntentIncomplete
            | Self::NoCandidates
            | Self::UnknownIngredient
            | Self::BudgetExceeded
            | Self::InternalError
            | Self::SerializationError => 500,
        }
    }

    /// Whether this code means the whole request cannot succeed
    ///
    /// Quota, throttling and credential failures are never retried and never
    /// replaced by defaults.
    #[must_use]
    pub const fn is_fatal_provider_error(&self) -> bool {
        matches!(
            self,
            Self::QuotaExceeded | Self::ExternalRateLimited | Self::ExternalAuthFailed
        )
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::InvalidFormat => "The data format is invalid",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ExternalServiceUnavailable => "An external service is currently unavailable",
            Self::ExternalAuthFailed => "Authentication with external service failed",
            Self::ExternalRateLimited => "External service rate limit exceeded",
            Self::QuotaExceeded => "External service quota exceeded. Please try again later",
            Self::ExternalTimeout => "An external service timed out",
            Self::ExternalInvalidResponse => "An external service returned an invalid response",
            Self::IntentIncomplete => "Could not determine budget or meal type",
            Self::NoCandidates => "No suitable ingredients were found",
            Self::UnknownIngredient => "The suggested menu used unavailable ingredients",
            Self::BudgetExceeded => "Could not fit a menu within the budget",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigMissing => "Required configuration is missing",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal server error occurred",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
#[error("{}: {}", .code.description(), .message)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message (internal, may contain upstream text)
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Whether the orchestrator must abort the request immediately
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        self.code.is_fatal_provider_error()
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Invalid data format
    #[must_use]
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, message)
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// External service error
    #[must_use]
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Upstream quota exhausted
    #[must_use]
    pub fn quota_exceeded(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::QuotaExceeded,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Upstream throttling
    #[must_use]
    pub fn rate_limited(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalRateLimited,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Upstream rejected credentials
    #[must_use]
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExternalAuthFailed, message)
    }

    /// Upstream timed out
    #[must_use]
    pub fn timeout(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalTimeout,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Upstream answered with unusable content
    #[must_use]
    pub fn invalid_response(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalInvalidResponse,
            format!("{}: {}", service.into(), message.into()),
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        Self::new(ErrorCode::InternalError, error.to_string()).with_source(error)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Error payload returned at the boundary
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Sanitized, user-facing message
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        // Upstream provider text must not leak to callers
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.code.description().to_owned(),
            },
        }
    }
}

/// Per-request workflow failure recorded in the pipeline state
///
/// Once set, every later stage except the response builder passes the state
/// through untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkflowError {
    /// Budget or meal type could not be resolved
    #[error("missing {field} after intent resolution")]
    MissingIntentField {
        /// Name of the unresolved field
        field: &'static str,
    },
    /// Knowledge store returned nothing
    #[error("no products found for query '{query}'")]
    EmptyRetrieval {
        /// Query sent to the store
        query: String,
    },
    /// Every retrieved product was filtered away
    #[error("no valid products left after filtering {retrieved} retrieved products")]
    NoValidCandidates {
        /// How many products were parsed before filtering
        retrieved: usize,
    },
    /// The generator referenced ingredients outside the candidate set
    #[error("menu references ingredients outside the candidate list: {}", .names.join(", "))]
    UnknownIngredients {
        /// Offending references, in menu order
        names: Vec<String>,
    },
    /// Generator output could not be parsed into a menu
    #[error("invalid menu response: {reason}")]
    InvalidMenuResponse {
        /// What went wrong
        reason: String,
    },
    /// Still over budget after the last adjustment
    #[error("menu exceeds budget after {iterations} adjustments: {total:.0} > {budget}")]
    MaxRetriesExceededOverBudget {
        /// Final menu total
        total: f64,
        /// Target budget
        budget: u64,
        /// Adjustments performed
        iterations: u32,
    },
    /// A collaborator failed with a non-fatal code
    #[error("{stage} failed: {code:?}")]
    Provider {
        /// Pipeline stage that hit the failure
        stage: &'static str,
        /// Classified error code
        code: ErrorCode,
    },
}

impl WorkflowError {
    /// Boundary error code for this failure
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::MissingIntentField { .. } => ErrorCode::IntentIncomplete,
            Self::EmptyRetrieval { .. } | Self::NoValidCandidates { .. } => {
                ErrorCode::NoCandidates
            }
            Self::UnknownIngredients { .. } => ErrorCode::UnknownIngredient,
            Self::InvalidMenuResponse { .. } => ErrorCode::ExternalInvalidResponse,
            Self::MaxRetriesExceededOverBudget { .. } => ErrorCode::BudgetExceeded,
            // collaborator failures are never the caller's fault
            Self::Provider { code, .. } => match code {
                ErrorCode::InvalidInput
                | ErrorCode::MissingRequiredField
                | ErrorCode::InvalidFormat => ErrorCode::ExternalServiceError,
                other => *other,
            },
        }
    }
}
