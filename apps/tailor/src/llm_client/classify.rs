//! Maps AI service failures onto the user-facing taxonomy.
//!
//! Google returns free-text error messages, so classification is substring
//! matching. Swap `classify_service_error` for a status-code lookup if the
//! API ever exposes one; callers only see `ServiceErrorKind`.

use thiserror::Error;

/// Category of a failed call to the AI service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceErrorKind {
    #[error("Authentication Error: Invalid API key.")]
    Authentication,

    #[error("Billing Error: Check Google Cloud project billing status.")]
    Billing,

    #[error("Permission Error: Check API enablement in Google Cloud project.")]
    Permission,

    #[error("Model Error: Selected model not found.")]
    ModelUnavailable,

    #[error("An unexpected AI service error occurred: {0}")]
    Unexpected(String),
}

/// Everything the AI adapter can report back instead of tailored text.
/// `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AiFailure {
    #[error("API Key not configured.")]
    NotConfigured,

    #[error("AI request blocked: {0}. Review inputs.")]
    Blocked(String),

    #[error("AI response format was unexpected or empty.")]
    EmptyResponse,

    #[error(transparent)]
    Service(#[from] ServiceErrorKind),
}

/// Classifies a raw service error message. Checks run in priority order and
/// ignore case.
pub fn classify_service_error(message: &str) -> ServiceErrorKind {
    let lower = message.to_lowercase();

    if lower.contains("api key not valid") {
        ServiceErrorKind::Authentication
    } else if lower.contains("billing account") {
        ServiceErrorKind::Billing
    } else if lower.contains("permission denied") || lower.contains("consumer does not have access")
    {
        ServiceErrorKind::Permission
    } else if lower.contains("model") && lower.contains("not found") {
        ServiceErrorKind::ModelUnavailable
    } else {
        ServiceErrorKind::Unexpected(message.to_string())
    }
}
