use serde_json::{Map, Value};

use crate::search::columns_match;

/// Reference lists offered by search-select pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// Company divisions.
    Division,
    /// Employee masterfile.
    Employee,
    /// Timekeeping devices.
    Device,
    /// Overtime codes.
    OtCode,
    /// Daily time record flags.
    DtrFlag,
}

impl ReferenceKind {
    /// Returns the backend list resource path.
    #[must_use]
    pub fn resource_path(&self) -> &'static str {
        match self {
            Self::Division => "/Fs/Employment/Division",
            Self::Employee => "/Maintenance/EmployeeMasterFile",
            Self::Device => "/Fs/Process/Sdk",
            Self::OtCode => "/Fs/Process/OtCode",
            Self::DtrFlag => "/Fs/Process/DtrFlag",
        }
    }

    /// Returns the keys tried, in order, for the entry code.
    #[must_use]
    pub fn code_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Division => &["divCode", "DivCode", "divisionCode", "code", "Code"],
            Self::Employee => &["empCode", "EmpCode", "employeeCode", "code"],
            Self::Device => &["deviceName", "DeviceName", "code", "Code"],
            Self::OtCode => &["otCode", "OtCode", "OTCode", "code", "Code"],
            Self::DtrFlag => &["flagCode", "FlagCode", "dtrFlag", "DTRFlag", "code", "Code"],
        }
    }

    /// Returns the keys tried, in order, for the entry label.
    #[must_use]
    pub fn label_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Division => &["divDesc", "DivDesc", "description", "Description"],
            Self::Employee => &["empName", "EmpName", "fullName", "FullName", "name"],
            Self::Device => &["ipAddress", "IpAddress", "description", "Description"],
            Self::OtCode => &["description", "Description", "otDesc", "OTDesc"],
            Self::DtrFlag => &["description", "Description", "flagDesc", "FlagDesc"],
        }
    }

    /// Returns the picker page size.
    #[must_use]
    pub fn page_size(&self) -> usize {
        match self {
            Self::Employee => 20,
            Self::Division | Self::Device | Self::OtCode | Self::DtrFlag => 10,
        }
    }
}

/// Read-only entry of a reference list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    /// Value written into the target field.
    pub code: String,
    /// Human-readable label.
    pub label: String,
    /// Remaining backend fields, untouched.
    pub extra: Map<String, Value>,
}

impl ReferenceEntry {
    /// Normalizes one backend row; rows without a code are dropped.
    #[must_use]
    pub fn from_wire(kind: ReferenceKind, row: Map<String, Value>) -> Option<Self> {
        let code = first_text(&row, kind.code_keys())?;
        let label = first_text(&row, kind.label_keys()).unwrap_or_default();
        Some(Self {
            code,
            label,
            extra: row,
        })
    }

    /// Returns whether the code or label contains `term`, ignoring case.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        columns_match([self.code.as_str(), self.label.as_str()], term)
    }
}

fn first_text(row: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| row.get(*key))
        .filter_map(|value| match value {
            Value::String(text) => Some(text.trim().to_owned()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        })
        .find(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ReferenceEntry, ReferenceKind};

    #[test]
    fn employee_rows_use_employee_keys() {
        let row = json!({"EmpCode": "E01", "fullName": "Ana Cruz"});
        let entry = row
            .as_object()
            .cloned()
            .and_then(|row| ReferenceEntry::from_wire(ReferenceKind::Employee, row));
        assert!(matches!(entry, Some(ref value) if value.code == "E01" && value.label == "Ana Cruz"));
        assert!(entry.is_some_and(|value| value.matches("cruz")));
    }

    #[test]
    fn rows_without_code_are_dropped() {
        let row = json!({"description": "orphan"});
        let entry = row
            .as_object()
            .cloned()
            .and_then(|row| ReferenceEntry::from_wire(ReferenceKind::OtCode, row));
        assert!(entry.is_none());
    }
}
