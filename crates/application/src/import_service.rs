use std::sync::Arc;

use chronopay_core::{AppError, AppResult};
use chronopay_domain::{
    ImportFile, ImportKind, ImportParameters, ImportRow, StageOutcome, commit_body,
    commit_eligible,
};
use tracing::{info, warn};

use crate::in_flight::InFlight;
use crate::{AlertSeverity, DialogPort, ImportGateway, SpreadsheetInspector, TOAST_DURATION};

#[cfg(test)]
mod tests;

/// Import workflow phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportState {
    /// No file chosen.
    Idle,
    /// A file is chosen but not staged.
    FileSelected,
    /// The server returned a row preview.
    Staged,
}

/// Counts reported after staging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSummary {
    /// Rows in the preview.
    pub total: usize,
    /// Rows eligible for commit.
    pub valid: usize,
    /// Rows carrying a validation message.
    pub invalid: usize,
}

/// Two-phase spreadsheet import: stage for a server preview, then commit
/// the valid rows.
///
/// Committing returns the workflow to [`ImportState::Idle`]. Re-selecting a
/// file or editing parameters keeps any existing preview until the next
/// stage.
pub struct ImportWorkflow {
    kind: ImportKind,
    gateway: Arc<dyn ImportGateway>,
    inspector: Arc<dyn SpreadsheetInspector>,
    dialogs: Arc<dyn DialogPort>,
    state: ImportState,
    file: Option<ImportFile>,
    sheet_names: Vec<String>,
    parameters: ImportParameters,
    staged_rows: Vec<ImportRow>,
    processing: bool,
}

impl ImportWorkflow {
    /// Creates an idle workflow.
    #[must_use]
    pub fn new(
        kind: ImportKind,
        gateway: Arc<dyn ImportGateway>,
        inspector: Arc<dyn SpreadsheetInspector>,
        dialogs: Arc<dyn DialogPort>,
    ) -> Self {
        Self {
            kind,
            gateway,
            inspector,
            dialogs,
            state: ImportState::Idle,
            file: None,
            sheet_names: Vec::new(),
            parameters: ImportParameters::default(),
            staged_rows: Vec::new(),
            processing: false,
        }
    }

    /// Returns the importer kind.
    #[must_use]
    pub fn kind(&self) -> ImportKind {
        self.kind
    }

    /// Returns the current phase.
    #[must_use]
    pub fn state(&self) -> ImportState {
        self.state
    }

    /// Returns whether a stage or commit request is outstanding.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Returns the chosen file.
    #[must_use]
    pub fn file(&self) -> Option<&ImportFile> {
        self.file.as_ref()
    }

    /// Returns worksheet names of the chosen file.
    #[must_use]
    pub fn sheet_names(&self) -> &[String] {
        self.sheet_names.as_slice()
    }

    /// Returns the scalar parameters.
    #[must_use]
    pub fn parameters(&self) -> &ImportParameters {
        &self.parameters
    }

    /// Returns the scalar parameters for editing.
    pub fn parameters_mut(&mut self) -> &mut ImportParameters {
        &mut self.parameters
    }

    /// Returns every staged row, valid and invalid.
    #[must_use]
    pub fn staged_rows(&self) -> &[ImportRow] {
        self.staged_rows.as_slice()
    }

    /// Returns the staged rows eligible for commit.
    #[must_use]
    pub fn valid_rows(&self) -> Vec<&ImportRow> {
        commit_eligible(&self.staged_rows)
    }

    /// Chooses a spreadsheet and lists its worksheets.
    ///
    /// The first worksheet is selected. Unreadable workbooks are alerted and
    /// leave the previous selection untouched.
    pub async fn select_file(&mut self, file: ImportFile) -> AppResult<&[String]> {
        let sheet_names = match self.inspector.sheet_names(&file) {
            Ok(sheet_names) if !sheet_names.is_empty() => sheet_names,
            Ok(_) => {
                let error = AppError::Validation(format!(
                    "'{}' does not contain any worksheet.",
                    file.file_name
                ));
                self.alert_warning(&error).await;
                return Err(error);
            }
            Err(error) => {
                warn!(file_name = %file.file_name, error = %error, "failed to read spreadsheet");
                self.alert_warning(&error).await;
                return Err(error);
            }
        };

        info!(
            kind = ?self.kind,
            file_name = %file.file_name,
            sheets = sheet_names.len(),
            "spreadsheet selected"
        );
        self.parameters.sheet_name = sheet_names.first().cloned();
        self.sheet_names = sheet_names;
        self.file = Some(file);
        if self.state == ImportState::Idle {
            self.state = ImportState::FileSelected;
        }

        Ok(self.sheet_names.as_slice())
    }

    /// Chooses the worksheet to import.
    pub fn choose_sheet(&mut self, sheet_name: &str) -> AppResult<()> {
        if !self.sheet_names.iter().any(|name| name == sheet_name) {
            return Err(AppError::Validation(format!(
                "worksheet '{sheet_name}' is not in the selected file"
            )));
        }
        self.parameters.sheet_name = Some(sheet_name.to_owned());
        Ok(())
    }

    /// Forgets the file and any preview.
    pub fn clear_file(&mut self) {
        self.file = None;
        self.sheet_names.clear();
        self.parameters.sheet_name = None;
        self.staged_rows.clear();
        self.state = ImportState::Idle;
    }

    /// Uploads the file and stores the server's row preview.
    pub async fn stage(&mut self) -> AppResult<StageSummary> {
        if self.processing {
            return Err(AppError::Validation(
                "an import request is already in progress".to_owned(),
            ));
        }

        let Some(file) = self.file.clone() else {
            let error = AppError::Validation("Please select a file to import.".to_owned());
            self.alert_warning(&error).await;
            return Err(error);
        };

        if let Err(error) = self.kind.check_parameters(&self.parameters) {
            self.alert_warning(&error).await;
            return Err(error);
        }

        let response = {
            let _in_flight = InFlight::begin(&mut self.processing);
            self.gateway
                .stage(self.kind, &file, &self.parameters)
                .await
                .and_then(StageOutcome::from_response)
        };

        let outcome = match response {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(kind = ?self.kind, error = ?error, "import staging failed");
                self.alert_error("Import failed", &error).await;
                return Err(error);
            }
        };

        if let Some(message) = outcome.error_message() {
            warn!(kind = ?self.kind, message = %message, "import staging reported errors");
            self.staged_rows.clear();
            self.state = ImportState::FileSelected;
            let error = AppError::Server {
                status: 200,
                message: Some(message),
            };
            self.alert_error("Import failed", &error).await;
            return Err(error);
        }

        self.staged_rows = outcome.rows;
        self.state = ImportState::Staged;
        let valid = commit_eligible(&self.staged_rows).len();
        let summary = StageSummary {
            total: self.staged_rows.len(),
            valid,
            invalid: self.staged_rows.len() - valid,
        };
        info!(
            kind = ?self.kind,
            total = summary.total,
            valid = summary.valid,
            invalid = summary.invalid,
            "import staged"
        );
        Ok(summary)
    }

    /// Sends the valid staged rows and returns to idle.
    ///
    /// Returns the number of rows sent; a preview with no valid rows still
    /// sends an empty `imports` list.
    pub async fn commit(&mut self) -> AppResult<usize> {
        if self.processing {
            return Err(AppError::Validation(
                "an import request is already in progress".to_owned(),
            ));
        }

        if self.state != ImportState::Staged {
            let error =
                AppError::Validation("Please import the file before updating.".to_owned());
            self.alert_warning(&error).await;
            return Err(error);
        }

        let body = commit_body(&self.parameters, &self.staged_rows);
        let committed = commit_eligible(&self.staged_rows).len();

        let response = {
            let _in_flight = InFlight::begin(&mut self.processing);
            self.gateway.commit(self.kind, body).await
        };

        let response = match response {
            Ok(response) => response,
            Err(error) => {
                warn!(kind = ?self.kind, error = ?error, "import commit failed");
                self.alert_error("Update failed", &error).await;
                return Err(error);
            }
        };

        if let Ok(outcome) = StageOutcome::from_response(response)
            && let Some(message) = outcome.error_message()
        {
            warn!(kind = ?self.kind, message = %message, "import commit reported errors");
            let error = AppError::Server {
                status: 200,
                message: Some(message),
            };
            self.alert_error("Update failed", &error).await;
            return Err(error);
        }

        info!(kind = ?self.kind, committed, "import committed");
        self.dialogs
            .toast(
                &format!("{committed} row(s) imported successfully."),
                TOAST_DURATION,
            )
            .await;
        self.clear_file();
        Ok(committed)
    }

    /// Downloads this importer's template file.
    pub async fn download_template(&self) -> AppResult<Vec<u8>> {
        let file_name = self.kind.template_file_name();
        match self.gateway.download_template(file_name).await {
            Ok(bytes) => {
                info!(file_name, size = bytes.len(), "downloaded import template");
                Ok(bytes)
            }
            Err(error) => {
                warn!(file_name, error = ?error, "failed to download import template");
                self.alert_error("Download failed", &error).await;
                Err(error)
            }
        }
    }

    async fn alert_warning(&self, error: &AppError) {
        self.dialogs
            .alert(AlertSeverity::Warning, "Import", &error.user_message())
            .await;
    }

    async fn alert_error(&self, title: &str, error: &AppError) {
        self.dialogs
            .alert(AlertSeverity::for_failure(error), title, &error.user_message())
            .await;
    }
}
