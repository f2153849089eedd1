//! Shared primitives for all Rust crates in Chronopay.

#![forbid(unsafe_code)]

/// Persisted session payload primitives.
pub mod session;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use session::{EncryptedPermissionEntry, LOGIN_PAYLOAD_KEY, LoginPayload};

/// Result type used across Chronopay crates.
pub type AppResult<T> = Result<T, AppError>;

/// Fallback text shown when no better failure message is available.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client-side input check failed before any request was issued.
    #[error("validation error: {0}")]
    Validation(String),

    /// Input collides with an existing record.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Current session lacks the capability for the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The request never produced a usable response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("server error ({status}): {}", message.as_deref().unwrap_or("<no message>"))]
    Server {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Message extracted from the response body, if the backend sent one.
        message: Option<String>,
    },

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the text presented to the user for this failure.
    ///
    /// Server-provided messages win, then the transport or validation detail,
    /// then [`GENERIC_FAILURE_MESSAGE`].
    #[must_use]
    pub fn user_message(&self) -> String {
        self.user_message_or(GENERIC_FAILURE_MESSAGE)
    }

    /// Returns the user-facing text, substituting `fallback` when the error
    /// carries nothing presentable.
    #[must_use]
    pub fn user_message_or(&self, fallback: &str) -> String {
        let detail = match self {
            Self::Server { message, .. } => message.clone(),
            Self::Validation(detail)
            | Self::Conflict(detail)
            | Self::NotFound(detail)
            | Self::Forbidden(detail)
            | Self::Transport(detail) => Some(detail.clone()),
            Self::Internal(_) => None,
        };

        detail
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| fallback.to_owned())
    }

    /// Returns whether this error was raised before any request was sent.
    #[must_use]
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Conflict(_) | Self::Forbidden(_)
        )
    }
}
