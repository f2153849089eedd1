//! Console dialog port for headless use. Logs dialogs to tracing output.

use std::time::Duration;

use async_trait::async_trait;
use chronopay_application::{AlertSeverity, DialogPort};
use tracing::{error, info, warn};

/// Dialog port that logs alerts and toasts and answers confirmations with a
/// fixed reply.
#[derive(Debug, Clone)]
pub struct ConsoleDialogPort {
    confirm_reply: bool,
}

impl ConsoleDialogPort {
    /// Creates a console dialog port that accepts every confirmation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            confirm_reply: true,
        }
    }

    /// Sets the answer given to confirmations.
    #[must_use]
    pub fn with_confirm_reply(mut self, confirm_reply: bool) -> Self {
        self.confirm_reply = confirm_reply;
        self
    }
}

impl Default for ConsoleDialogPort {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DialogPort for ConsoleDialogPort {
    async fn alert(&self, severity: AlertSeverity, title: &str, message: &str) {
        match severity {
            AlertSeverity::Info => info!(title = title, "--- ALERT ---\n{message}"),
            AlertSeverity::Warning => warn!(title = title, "--- ALERT ---\n{message}"),
            AlertSeverity::Error => error!(title = title, "--- ALERT ---\n{message}"),
        }
    }

    async fn confirm(&self, title: &str, message: &str) -> bool {
        info!(
            title = title,
            answer = self.confirm_reply,
            "--- CONFIRM ---\n{message}"
        );
        self.confirm_reply
    }

    async fn toast(&self, message: &str, duration: Duration) {
        let duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        info!(duration_ms = duration_ms, "{message}");
    }
}

#[cfg(test)]
mod tests {
    use chronopay_application::{DialogPort, TOAST_DURATION};

    use super::ConsoleDialogPort;

    #[tokio::test]
    async fn confirm_returns_configured_reply() {
        assert!(ConsoleDialogPort::new().confirm("Delete", "Delete HR?").await);

        let declining = ConsoleDialogPort::default().with_confirm_reply(false);
        assert!(!declining.confirm("Delete", "Delete HR?").await);
        declining.toast("Saved", TOAST_DURATION).await;
    }
}
