use std::sync::Arc;

use chronopay_core::AppResult;
use chronopay_domain::{ReferenceEntry, ReferenceKind};
use serde_json::Value;
use tracing::{info, warn};

use crate::{AlertSeverity, DialogPort, ReferenceGateway, TableView};

/// What to do when a reference list fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceErrorPolicy {
    /// Show a blocking alert with the failure message.
    Surface,
    /// Log the failure and show an empty list.
    #[default]
    Silent,
}

/// Value chosen in a picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Editor field receiving the value.
    pub target_field: String,
    /// Chosen entry.
    pub entry: ReferenceEntry,
}

/// Picker over one reference list, opened from inside an editor.
///
/// The list is fetched on the first open and cached for the picker's
/// lifetime; a failed fetch is retried on the next open.
pub struct SearchSelect {
    kind: ReferenceKind,
    gateway: Arc<dyn ReferenceGateway>,
    dialogs: Arc<dyn DialogPort>,
    error_policy: ReferenceErrorPolicy,
    table: TableView<ReferenceEntry>,
    loaded: bool,
    target_field: Option<String>,
}

impl SearchSelect {
    /// Creates a closed picker.
    pub fn new(
        kind: ReferenceKind,
        gateway: Arc<dyn ReferenceGateway>,
        dialogs: Arc<dyn DialogPort>,
        error_policy: ReferenceErrorPolicy,
    ) -> AppResult<Self> {
        Ok(Self {
            kind,
            gateway,
            dialogs,
            error_policy,
            table: TableView::new(kind.page_size(), |entry: &ReferenceEntry, term| {
                entry.matches(term)
            })?,
            loaded: false,
            target_field: None,
        })
    }

    /// Returns the reference list kind.
    #[must_use]
    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    /// Returns whether the picker is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.target_field.is_some()
    }

    /// Returns the field the picker fills.
    #[must_use]
    pub fn target_field(&self) -> Option<&str> {
        self.target_field.as_deref()
    }

    /// Returns the picker table.
    #[must_use]
    pub fn table(&self) -> &TableView<ReferenceEntry> {
        &self.table
    }

    /// Returns the picker table for search and paging.
    pub fn table_mut(&mut self) -> &mut TableView<ReferenceEntry> {
        &mut self.table
    }

    /// Opens the picker for `target_field`, loading the list on first use.
    ///
    /// Under [`ReferenceErrorPolicy::Surface`] a failed load is alerted,
    /// closes the picker and is returned; otherwise it is logged and the
    /// picker opens empty.
    pub async fn open(&mut self, target_field: impl Into<String>) -> AppResult<()> {
        self.target_field = Some(target_field.into());
        self.table.set_search("");

        if self.loaded {
            return Ok(());
        }

        match self.gateway.list_reference(self.kind).await {
            Ok(rows) => {
                let entries: Vec<ReferenceEntry> = rows
                    .into_iter()
                    .filter_map(|row| match row {
                        Value::Object(object) => ReferenceEntry::from_wire(self.kind, object),
                        _ => None,
                    })
                    .collect();
                info!(kind = ?self.kind, count = entries.len(), "loaded reference list");
                self.table.set_items(entries);
                self.loaded = true;
                Ok(())
            }
            Err(error) => {
                warn!(kind = ?self.kind, error = ?error, "failed to load reference list");
                self.table.set_items(Vec::new());
                match self.error_policy {
                    ReferenceErrorPolicy::Silent => Ok(()),
                    ReferenceErrorPolicy::Surface => {
                        self.target_field = None;
                        self.dialogs
                            .alert(
                                AlertSeverity::Error,
                                "Load failed",
                                &error.user_message_or("Failed to load data."),
                            )
                            .await;
                        Err(error)
                    }
                }
            }
        }
    }

    /// Picks the row at `position` on the current page and closes the picker.
    pub fn pick(&mut self, position: usize) -> Option<Selection> {
        let entry = self.table.page_row(position)?.clone();
        let target_field = self.target_field.take()?;
        Some(Selection {
            target_field,
            entry,
        })
    }

    /// Closes the picker without choosing.
    pub fn close(&mut self) {
        self.target_field = None;
    }
}
