use chrono::NaiveDate;
use chronopay_core::{AppError, AppResult, NonEmptyString};
use serde_json::{Map, Value};

/// Spreadsheet extensions accepted for upload.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// Bulk importers available in the utilities area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// Employee masterfile rows.
    EmployeeMasterfile,
    /// Employee-to-device code mappings.
    DeviceCode,
    /// Workshift schedules per group and date range.
    WorkshiftSchedule,
    /// Raw attendance logs within a date range.
    AttendanceLogs,
}

impl ImportKind {
    /// Returns the staging endpoint receiving the spreadsheet.
    #[must_use]
    pub fn stage_path(&self) -> &'static str {
        match self {
            Self::EmployeeMasterfile => "/Utilities/Import/EmployeeMasterfile",
            Self::DeviceCode => "/Utilities/Import/DeviceCode",
            Self::WorkshiftSchedule => "/Utilities/Import/WorkshiftSchedule",
            Self::AttendanceLogs => "/Utilities/Import/AttendanceLogs",
        }
    }

    /// Returns the commit endpoint receiving the valid rows.
    #[must_use]
    pub fn commit_path(&self) -> String {
        format!("{}/Update", self.stage_path())
    }

    /// Returns the downloadable template file name.
    #[must_use]
    pub fn template_file_name(&self) -> &'static str {
        match self {
            Self::EmployeeMasterfile => "EmployeeMasterfileTemplate.xlsx",
            Self::DeviceCode => "DeviceCodeTemplate.xlsx",
            Self::WorkshiftSchedule => "WorkshiftScheduleTemplate.xlsx",
            Self::AttendanceLogs => "AttendanceLogsTemplate.xlsx",
        }
    }

    /// Returns the form name used in permission entries.
    #[must_use]
    pub fn form_name(&self) -> &'static str {
        match self {
            Self::EmployeeMasterfile => "Import Employee Masterfile",
            Self::DeviceCode => "Import Device Code",
            Self::WorkshiftSchedule => "Import Workshift Schedule",
            Self::AttendanceLogs => "Import Attendance Logs",
        }
    }

    /// Returns whether staging requires at least one group.
    #[must_use]
    pub fn is_group_scoped(&self) -> bool {
        matches!(self, Self::WorkshiftSchedule)
    }

    /// Returns whether staging requires a date range.
    #[must_use]
    pub fn is_date_ranged(&self) -> bool {
        matches!(self, Self::WorkshiftSchedule | Self::AttendanceLogs)
    }

    /// Checks the parameters this importer needs before staging.
    pub fn check_parameters(&self, parameters: &ImportParameters) -> AppResult<()> {
        if self.is_group_scoped() && parameters.group_codes.is_empty() {
            return Err(AppError::Validation(
                "Please select at least one group.".to_owned(),
            ));
        }

        if self.is_date_ranged() {
            let (Some(date_from), Some(date_to)) = (parameters.date_from, parameters.date_to)
            else {
                return Err(AppError::Validation(
                    "Please select both a start and an end date.".to_owned(),
                ));
            };
            if date_from > date_to {
                return Err(AppError::Validation(
                    "Start date must not be after the end date.".to_owned(),
                ));
            }
        }

        Ok(())
    }
}

/// Spreadsheet chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFile {
    /// Original file name, including extension.
    pub file_name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl ImportFile {
    /// Creates an upload, rejecting non-spreadsheet extensions and empty files.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> AppResult<Self> {
        let file_name = String::from(NonEmptyString::new(file_name)?);
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, extension)| extension.to_ascii_lowercase())
            .unwrap_or_default();
        if !SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::Validation(format!(
                "'{file_name}' is not an .xlsx or .xls file."
            )));
        }

        if bytes.is_empty() {
            return Err(AppError::Validation(format!("'{file_name}' is empty.")));
        }

        Ok(Self { file_name, bytes })
    }

    /// Returns the lowercase extension.
    #[must_use]
    pub fn extension(&self) -> String {
        self.file_name
            .rsplit_once('.')
            .map(|(_, extension)| extension.to_ascii_lowercase())
            .unwrap_or_default()
    }
}

/// Scalar parameters sent with both import phases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportParameters {
    /// Worksheet to read; the backend reads the first sheet when absent.
    pub sheet_name: Option<String>,
    /// Inclusive start date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive end date.
    pub date_to: Option<NaiveDate>,
    /// Selected group codes.
    pub group_codes: Vec<String>,
    /// Replace existing rows instead of skipping them.
    pub overwrite: bool,
}

impl ImportParameters {
    /// Encodes the parameters as multipart text fields.
    #[must_use]
    pub fn to_form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(sheet_name) = &self.sheet_name {
            fields.push(("sheetName", sheet_name.clone()));
        }
        if let Some(date_from) = self.date_from {
            fields.push(("dateFrom", date_from.format("%Y-%m-%d").to_string()));
        }
        if let Some(date_to) = self.date_to {
            fields.push(("dateTo", date_to.format("%Y-%m-%d").to_string()));
        }
        for group_code in &self.group_codes {
            fields.push(("groupCodes", group_code.clone()));
        }
        fields.push(("overwrite", self.overwrite.to_string()));
        fields
    }

    /// Encodes the parameters as JSON members of the commit body.
    #[must_use]
    pub fn to_json_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Some(sheet_name) = &self.sheet_name {
            fields.insert("sheetName".to_owned(), Value::String(sheet_name.clone()));
        }
        if let Some(date_from) = self.date_from {
            fields.insert(
                "dateFrom".to_owned(),
                Value::String(date_from.format("%Y-%m-%d").to_string()),
            );
        }
        if let Some(date_to) = self.date_to {
            fields.insert(
                "dateTo".to_owned(),
                Value::String(date_to.format("%Y-%m-%d").to_string()),
            );
        }
        if !self.group_codes.is_empty() {
            fields.insert(
                "groupCodes".to_owned(),
                Value::Array(
                    self.group_codes
                        .iter()
                        .cloned()
                        .map(Value::String)
                        .collect(),
                ),
            );
        }
        fields.insert("overwrite".to_owned(), Value::Bool(self.overwrite));
        fields
    }
}

/// One row of a server-side import preview.
///
/// The backend payload is kept verbatim so committed rows match what the
/// server staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow(Map<String, Value>);

impl ImportRow {
    /// Wraps a backend row object.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Returns the validation message; blank messages count as absent.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.0
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }

    /// Returns whether the row may be committed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.message().is_none()
    }

    /// Returns the 1-based spreadsheet row, when reported.
    #[must_use]
    pub fn row_number(&self) -> Option<u64> {
        self.0.get("rowNumber").and_then(Value::as_u64)
    }

    /// Returns the 1-based spreadsheet column, when reported.
    #[must_use]
    pub fn column_number(&self) -> Option<u64> {
        self.0.get("columnNumber").and_then(Value::as_u64)
    }

    /// Returns a payload field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns the row as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// Parsed staging response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageOutcome {
    /// Preview rows, valid and invalid.
    pub rows: Vec<ImportRow>,
    /// File-level errors reported by the backend.
    pub errors: Vec<Value>,
}

impl StageOutcome {
    /// Reads a staging response.
    ///
    /// Accepts either a bare array of rows or an object carrying rows under
    /// `data`, `rows` or `imports` and file-level problems under `errors`.
    pub fn from_response(body: Value) -> AppResult<Self> {
        match body {
            Value::Array(items) => Ok(Self {
                rows: rows_from(items)?,
                errors: Vec::new(),
            }),
            Value::Object(mut object) => {
                let rows = ["data", "rows", "imports"]
                    .iter()
                    .find_map(|key| match object.remove(*key) {
                        Some(Value::Array(items)) => Some(items),
                        _ => None,
                    })
                    .unwrap_or_default();
                let errors = match object.remove("errors") {
                    Some(Value::Array(errors)) => errors,
                    Some(Value::Null) | None => Vec::new(),
                    Some(other) => vec![other],
                };
                Ok(Self {
                    rows: rows_from(rows)?,
                    errors,
                })
            }
            other => Err(AppError::Internal(format!(
                "unexpected import staging response: {other}"
            ))),
        }
    }

    /// Returns the message to surface for file-level errors, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        let first = self.errors.first()?;
        let message = match first {
            Value::String(text) => Some(text.clone()),
            Value::Object(object) => object
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned),
            _ => None,
        };

        Some(
            message
                .filter(|text| !text.trim().is_empty())
                .unwrap_or_else(|| Value::Array(self.errors.clone()).to_string()),
        )
    }
}

fn rows_from(items: Vec<Value>) -> AppResult<Vec<ImportRow>> {
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(fields) => Ok(ImportRow::new(fields)),
            other => Err(AppError::Internal(format!(
                "import row must be an object, got {other}"
            ))),
        })
        .collect()
}

/// Returns the rows eligible for commit, in staging order.
#[must_use]
pub fn commit_eligible(rows: &[ImportRow]) -> Vec<&ImportRow> {
    rows.iter().filter(|row| row.is_valid()).collect()
}

/// Builds the commit body: the scalar parameters plus `imports`.
#[must_use]
pub fn commit_body(parameters: &ImportParameters, rows: &[ImportRow]) -> Value {
    let mut body = parameters.to_json_fields();
    body.insert(
        "imports".to_owned(),
        Value::Array(
            commit_eligible(rows)
                .into_iter()
                .map(ImportRow::to_value)
                .collect(),
        ),
    );
    Value::Object(body)
}
