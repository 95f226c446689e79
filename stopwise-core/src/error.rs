//! Errors surfaced by the distance and routing collaborators.

use thiserror::Error;

/// Coarse classification of a [`ServiceError`].
///
/// The planner reports failures to the user by class rather than by the
/// concrete transport detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ErrorClass {
    /// The service could not be reached or answered inconsistently.
    ServiceUnavailable,
    /// The API credential was missing or rejected.
    InvalidCredential,
    /// The service answered, but with an empty or malformed result.
    NoResult,
}

/// Errors from [`crate::TravelTimeProvider`] and [`crate::RoutingService`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// No destinations were supplied to the distance service.
    #[error("at least one destination is required")]
    EmptyInput,
    /// A route needs an origin and at least one further stop.
    #[error("a route needs at least 2 stops, got {actual}")]
    TooFewStops {
        /// Number of stops supplied.
        actual: usize,
    },
    /// Network-level failure such as a refused connection.
    #[error("network error requesting {url}: {message}")]
    NetworkError {
        /// Request URL with the credential redacted.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL with the credential redacted.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    HttpError {
        /// Request URL with the credential redacted.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description returned by the service.
        message: String,
    },
    /// The credential was absent or refused by the service.
    #[error("API credential rejected{}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    InvalidCredential {
        /// HTTP status code when the service rejected the key.
        status: Option<u16>,
    },
    /// The number of travel times did not match the number of destinations.
    #[error("expected {expected} travel times, got {actual}")]
    CountMismatch {
        /// Number of destinations in the request.
        expected: usize,
        /// Number of travel times in the response.
        actual: usize,
    },
    /// The service returned no usable result.
    #[error("no result: {message}")]
    NoResult {
        /// What was missing.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse response: {message}")]
    ParseError {
        /// Decoder error description.
        message: String,
    },
}

impl ServiceError {
    /// Classify the error for user-facing reporting.
    ///
    /// # Examples
    /// ```
    /// use stopwise_core::{ErrorClass, ServiceError};
    ///
    /// let err = ServiceError::CountMismatch { expected: 3, actual: 2 };
    /// assert_eq!(err.class(), ErrorClass::ServiceUnavailable);
    /// ```
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::NetworkError { .. }
            | Self::Timeout { .. }
            | Self::HttpError { .. }
            | Self::CountMismatch { .. } => ErrorClass::ServiceUnavailable,
            Self::InvalidCredential { .. } => ErrorClass::InvalidCredential,
            Self::EmptyInput
            | Self::TooFewStops { .. }
            | Self::NoResult { .. }
            | Self::ParseError { .. } => ErrorClass::NoResult,
        }
    }
}
