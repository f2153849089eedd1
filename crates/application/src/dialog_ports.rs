use std::time::Duration;

use async_trait::async_trait;
use chronopay_core::AppError;

/// How long success notifications stay visible.
pub const TOAST_DURATION: Duration = Duration::from_millis(1500);

/// Visual weight of a blocking alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    /// Informational notice.
    Info,
    /// Input problem the user can fix.
    Warning,
    /// Failed operation.
    Error,
}

impl AlertSeverity {
    /// Picks the alert weight for a failed operation: problems caught before
    /// any request warn, everything else is an error.
    #[must_use]
    pub fn for_failure(error: &AppError) -> Self {
        if error.is_client_side() {
            Self::Warning
        } else {
            Self::Error
        }
    }
}

/// Port for user-facing dialogs and notifications.
#[async_trait]
pub trait DialogPort: Send + Sync {
    /// Shows a blocking alert and waits until it is dismissed.
    async fn alert(&self, severity: AlertSeverity, title: &str, message: &str);

    /// Asks a yes/no question; returns true when the user accepts.
    async fn confirm(&self, title: &str, message: &str) -> bool;

    /// Shows a timed, non-blocking success notification.
    async fn toast(&self, message: &str, duration: Duration);
}
