// src/error.rs
// =============================================================================
// Error types for the crawl engine.
//
// Two families:
// - CrawlError: problems with the run itself (bad seed URL, bad filter
//   pattern, HTTP client that can't be built). Only these ever stop a crawl,
//   and only before the first request is sent.
// - FetchError: a single request failed at the transport level (DNS,
//   connection refused, timeout, TLS). These become Unhealthy results and
//   the crawl keeps going.
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - Enums with data: each variant carries the details of what went wrong
// =============================================================================

use thiserror::Error;

/// Reason reported when a failed request carries no message at all.
pub const UNKNOWN_REASON: &str = "Unknown";

/// Errors that concern the crawl run as a whole.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The seed URL could not be parsed. This is the only fatal case.
    #[error("invalid seed URL '{input}': {reason}")]
    InvalidSeed { input: String, reason: String },

    /// Concurrency or delay settings that make no sense.
    #[error("invalid rate limit configuration: {0}")]
    InvalidLimit(String),

    /// A user-supplied URL filter pattern is not a valid regex.
    #[error("invalid URL filter '{pattern}': {reason}")]
    InvalidFilter { pattern: String, reason: String },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Broad category of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Timeout,
    Connect,
    Redirect,
    Body,
    Other,
}

/// A single request that never produced an HTTP status.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    message: String,
}

impl FetchError {
    /// Builds a fetch error, replacing an empty message with "Unknown".
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: failure_reason(&message.into()),
        }
    }

    /// Human-readable reason, never empty.
    pub fn reason(&self) -> &str {
        &self.message
    }
}

/// Turns an underlying error message into a reason string for reports.
///
/// Errors with no message (or only whitespace) are reported as "Unknown"
/// so the reader never sees a blank reason.
pub fn failure_reason(message: &str) -> String {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        UNKNOWN_REASON.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_reason_becomes_unknown() {
        assert_eq!(failure_reason(""), "Unknown");
        assert_eq!(failure_reason("   "), "Unknown");
    }

    #[test]
    fn test_reason_is_kept() {
        assert_eq!(failure_reason("connection refused"), "connection refused");
    }

    #[test]
    fn test_fetch_error_never_has_blank_reason() {
        let error = FetchError::new(FetchErrorKind::Other, "");
        assert_eq!(error.reason(), "Unknown");
        assert_eq!(error.to_string(), "Unknown");
    }

    #[test]
    fn test_seed_error_message() {
        let error = CrawlError::InvalidSeed {
            input: "not a url".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "invalid seed URL 'not a url': relative URL without a base"
        );
    }
}
