//! API error types for the settings backend.

use thiserror::Error;

/// Coarse classification of a failed HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    /// 400 and other unclassified 4xx
    InvalidRequest,
    /// 401
    Unauthenticated,
    /// 403
    PermissionDenied,
    /// 404
    NotFound,
    /// 408 / 504
    Timeout,
    /// 429
    RateLimited,
    /// Other 5xx
    Unavailable,
    Unknown,
}

impl ApiStatus {
    /// Convert from HTTP status code to internal API status
    pub fn from_http_status(http_status: u16) -> Self {
        match http_status {
            401 => ApiStatus::Unauthenticated,
            403 => ApiStatus::PermissionDenied,
            404 => ApiStatus::NotFound,
            408 | 504 => ApiStatus::Timeout,
            429 => ApiStatus::RateLimited,
            400..=499 => ApiStatus::InvalidRequest,
            500..=599 => ApiStatus::Unavailable,
            _ => ApiStatus::Unknown,
        }
    }

    pub fn error_message(&self) -> &'static str {
        match self {
            ApiStatus::InvalidRequest => "Invalid request",
            ApiStatus::Unauthenticated => "Authentication failed",
            ApiStatus::PermissionDenied => "Permission denied",
            ApiStatus::NotFound => "Settings endpoint not found",
            ApiStatus::Timeout => "Request timed out",
            ApiStatus::RateLimited => "Rate limit exceeded",
            ApiStatus::Unavailable => "Settings service temporarily unavailable",
            ApiStatus::Unknown => "Unknown error occurred",
        }
    }
}

/// API error with status code and details.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: ApiStatus,
    /// HTTP status code
    pub http_status: u16,
    pub message: String,
    /// Request ID echoed by the server (for debugging)
    pub request_id: Option<String>,
}

impl ApiError {
    /// Create from HTTP status code and response body
    pub fn from_http_response(http_status: u16, body: String, request_id: Option<String>) -> Self {
        let status = ApiStatus::from_http_status(http_status);
        let body = body.trim();

        let message = if body.is_empty() {
            format!("{} (HTTP {})", status.error_message(), http_status)
        } else {
            format!("{} (HTTP {}): {}", status.error_message(), http_status, body)
        };

        Self {
            status,
            http_status,
            message,
            request_id,
        }
    }

    /// Get a hint message for the operator
    pub fn user_hint(&self) -> &'static str {
        match self.status {
            ApiStatus::Unauthenticated | ApiStatus::PermissionDenied => {
                "Check PLATFORM_API_KEY and the key's access to the settings endpoint."
            }
            ApiStatus::NotFound => "Check PLATFORM_SETTINGS_URL points at the platform API.",
            ApiStatus::Unavailable | ApiStatus::Timeout => {
                "The settings service may be temporarily unavailable."
            }
            _ => "Unexpected response from the settings service.",
        }
    }
}
