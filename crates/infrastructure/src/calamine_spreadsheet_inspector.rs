//! Sheet discovery for uploaded workbooks using calamine.

use std::io::Cursor;

use calamine::{Reader, Xls, Xlsx};
use chronopay_application::SpreadsheetInspector;
use chronopay_core::{AppError, AppResult};
use chronopay_domain::ImportFile;
use tracing::debug;

/// Reads worksheet names from `.xlsx` and `.xls` workbooks in memory.
#[derive(Debug, Clone, Default)]
pub struct CalamineSpreadsheetInspector;

impl CalamineSpreadsheetInspector {
    /// Creates a new inspector.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SpreadsheetInspector for CalamineSpreadsheetInspector {
    fn sheet_names(&self, file: &ImportFile) -> AppResult<Vec<String>> {
        let cursor = Cursor::new(file.bytes.as_slice());
        let sheet_names = match file.extension().as_str() {
            "xlsx" => Xlsx::new(cursor)
                .map(|workbook| workbook.sheet_names().to_vec())
                .map_err(|error| unreadable(file, error))?,
            "xls" => Xls::new(cursor)
                .map(|workbook| workbook.sheet_names().to_vec())
                .map_err(|error| unreadable(file, error))?,
            other => {
                return Err(AppError::Validation(format!(
                    "'{}' has unsupported extension '.{other}'",
                    file.file_name
                )));
            }
        };

        if sheet_names.is_empty() {
            return Err(AppError::Validation(format!(
                "'{}' contains no worksheets",
                file.file_name
            )));
        }

        debug!(file_name = %file.file_name, sheets = sheet_names.len(), "workbook inspected");
        Ok(sheet_names)
    }
}

fn unreadable(file: &ImportFile, error: impl std::fmt::Display) -> AppError {
    AppError::Validation(format!("'{}' could not be read as a workbook: {error}", file.file_name))
}
