use std::marker::PhantomData;
use std::sync::Arc;

use chronopay_core::{AppError, AppResult};
use chronopay_domain::{AccessType, CapabilityMap, FieldValues, SetupRecord, validation};
use tracing::{info, warn};

use crate::in_flight::InFlight;
use crate::{AlertSeverity, DialogPort, SetupGateway, TOAST_DURATION};


/// Editor lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    /// No form is open.
    Closed,
    /// Blank form for a new record.
    Create,
    /// Form pre-filled from an existing record.
    Edit {
        /// Key of the record being edited, used in the update path.
        original_key: String,
    },
}

/// Result of a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new record was created.
    Created,
    /// An existing record was updated.
    Updated,
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record was deleted.
    Deleted,
    /// The user declined the confirmation; nothing was sent.
    Declined,
}

/// Modal form creating, editing and deleting one setup record kind.
pub struct RecordEditor<R> {
    gateway: Arc<dyn SetupGateway>,
    dialogs: Arc<dyn DialogPort>,
    mode: EditorMode,
    draft: FieldValues,
    submitting: bool,
    _record: PhantomData<fn() -> R>,
}

impl<R: SetupRecord> RecordEditor<R> {
    /// Creates a closed editor.
    #[must_use]
    pub fn new(gateway: Arc<dyn SetupGateway>, dialogs: Arc<dyn DialogPort>) -> Self {
        Self {
            gateway,
            dialogs,
            mode: EditorMode::Closed,
            draft: FieldValues::blank(R::KIND.fields()),
            submitting: false,
            _record: PhantomData,
        }
    }

    /// Returns the editor mode.
    #[must_use]
    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    /// Returns whether the form is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.mode != EditorMode::Closed
    }

    /// Returns whether a save or delete request is outstanding.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Returns the form values.
    #[must_use]
    pub fn draft(&self) -> &FieldValues {
        &self.draft
    }

    /// Opens a blank form.
    pub fn open_create(&mut self, capabilities: &CapabilityMap) -> AppResult<()> {
        capabilities.require(AccessType::Add)?;
        self.draft = FieldValues::blank(R::KIND.fields());
        self.mode = EditorMode::Create;
        Ok(())
    }

    /// Opens a form pre-filled from `record`.
    pub fn open_edit(&mut self, capabilities: &CapabilityMap, record: &R) -> AppResult<()> {
        capabilities.require(AccessType::Edit)?;
        self.draft = record.to_fields();
        self.mode = EditorMode::Edit {
            original_key: record.record_key(),
        };
        Ok(())
    }

    /// Sets one form value; ignored while closed.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        if self.is_open() {
            self.draft.set(name, value);
        }
    }

    /// Discards the form and closes it.
    pub fn cancel(&mut self) {
        self.close();
    }

    /// Closes the form and resets its values.
    pub fn close(&mut self) {
        self.mode = EditorMode::Closed;
        self.draft = FieldValues::blank(R::KIND.fields());
    }

    /// Validates and saves the form.
    ///
    /// Every check runs before any request; a failed check or request shows a
    /// blocking alert and leaves the form open with its values. On success a
    /// toast is shown and the form stays open so the caller can refresh the
    /// list before calling [`RecordEditor::close`].
    pub async fn submit(&mut self, existing: &[R]) -> AppResult<SaveOutcome> {
        if self.submitting {
            return Err(AppError::Validation(
                "a save is already in progress".to_owned(),
            ));
        }

        let editing_key = match &self.mode {
            EditorMode::Closed => {
                return Err(AppError::Validation("the editor is not open".to_owned()));
            }
            EditorMode::Create => None,
            EditorMode::Edit { original_key } => Some(original_key.clone()),
        };

        let kind = R::KIND;
        let draft = self.draft.trimmed();
        let checked = validation::validate_draft(
            kind.fields(),
            &draft,
            existing
                .iter()
                .map(|record| (record.record_key(), record.code())),
            editing_key.as_deref(),
        )
        .and_then(|()| draft.to_payload(kind.fields()));

        let payload = match checked {
            Ok(payload) => payload,
            Err(error) => {
                self.dialogs
                    .alert(AlertSeverity::Warning, "Validation", &error.user_message())
                    .await;
                return Err(error);
            }
        };

        let result = {
            let _in_flight = InFlight::begin(&mut self.submitting);
            match editing_key.as_deref() {
                None => self.gateway.create(kind.resource_path(), payload).await,
                Some(record_key) => {
                    self.gateway
                        .update(kind.resource_path(), record_key, payload)
                        .await
                }
            }
        };

        let outcome = if editing_key.is_some() {
            SaveOutcome::Updated
        } else {
            SaveOutcome::Created
        };

        match result {
            Ok(()) => {
                info!(
                    resource_path = kind.resource_path(),
                    code = draft.get("code"),
                    outcome = ?outcome,
                    "saved setup record"
                );
                let message = match outcome {
                    SaveOutcome::Created => "Record created successfully.",
                    SaveOutcome::Updated => "Record updated successfully.",
                };
                self.dialogs.toast(message, TOAST_DURATION).await;
                Ok(outcome)
            }
            Err(error) => {
                warn!(
                    resource_path = kind.resource_path(),
                    error = ?error,
                    "failed to save setup record"
                );
                self.dialogs
                    .alert(
                        AlertSeverity::for_failure(&error),
                        "Save failed",
                        &error.user_message(),
                    )
                    .await;
                Err(error)
            }
        }
    }

    /// Deletes `record` after the user confirms.
    pub async fn delete(
        &mut self,
        capabilities: &CapabilityMap,
        record: &R,
    ) -> AppResult<DeleteOutcome> {
        capabilities.require(AccessType::Delete)?;
        if self.submitting {
            return Err(AppError::Validation(
                "a save is already in progress".to_owned(),
            ));
        }

        let confirmed = self
            .dialogs
            .confirm(
                "Delete record",
                &format!("Are you sure you want to delete '{}'?", record.code()),
            )
            .await;
        if !confirmed {
            return Ok(DeleteOutcome::Declined);
        }

        let kind = R::KIND;
        let record_key = record.record_key();
        let result = {
            let _in_flight = InFlight::begin(&mut self.submitting);
            self.gateway
                .delete(kind.resource_path(), record_key.as_str())
                .await
        };

        match result {
            Ok(()) => {
                info!(
                    resource_path = kind.resource_path(),
                    record_key = %record_key,
                    "deleted setup record"
                );
                self.dialogs
                    .toast("Record deleted successfully.", TOAST_DURATION)
                    .await;
                Ok(DeleteOutcome::Deleted)
            }
            Err(error) => {
                warn!(
                    resource_path = kind.resource_path(),
                    record_key = %record_key,
                    error = ?error,
                    "failed to delete setup record"
                );
                self.dialogs
                    .alert(
                        AlertSeverity::for_failure(&error),
                        "Delete failed",
                        &error.user_message(),
                    )
                    .await;
                Err(error)
            }
        }
    }
}
