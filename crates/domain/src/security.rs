use std::collections::BTreeSet;
use std::str::FromStr;

use chronopay_core::AppError;
use serde::{Deserialize, Serialize};

/// Operations a page may allow for the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AccessType {
    /// Allows opening the page and listing records.
    View,
    /// Allows creating records.
    Add,
    /// Allows editing records.
    Edit,
    /// Allows deleting records.
    Delete,
}

impl AccessType {
    /// Returns the stable access type name used in permission entries.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "View",
            Self::Add => "Add",
            Self::Edit => "Edit",
            Self::Delete => "Delete",
        }
    }

    /// Returns all known access types.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[AccessType] = &[
            AccessType::View,
            AccessType::Add,
            AccessType::Edit,
            AccessType::Delete,
        ];

        ALL
    }
}

impl FromStr for AccessType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "View" => Ok(Self::View),
            "Add" => Ok(Self::Add),
            "Edit" => Ok(Self::Edit),
            "Delete" => Ok(Self::Delete),
            other => Err(AppError::Validation(format!(
                "unknown access type name '{other}'"
            ))),
        }
    }
}

/// Capabilities granted to the current user on one form.
///
/// Built once when a page is entered. An access type that was never granted
/// is denied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityMap {
    form_name: String,
    granted: BTreeSet<AccessType>,
}

impl CapabilityMap {
    /// Creates an empty map for a form; every capability is denied.
    #[must_use]
    pub fn denied(form_name: impl Into<String>) -> Self {
        Self {
            form_name: form_name.into(),
            granted: BTreeSet::new(),
        }
    }

    /// Creates a map with the given grants.
    #[must_use]
    pub fn with_grants(
        form_name: impl Into<String>,
        grants: impl IntoIterator<Item = AccessType>,
    ) -> Self {
        Self {
            form_name: form_name.into(),
            granted: grants.into_iter().collect(),
        }
    }

    /// Marks an access type as granted.
    pub fn grant(&mut self, access_type: AccessType) {
        self.granted.insert(access_type);
    }

    /// Returns whether the access type is granted.
    #[must_use]
    pub fn allows(&self, access_type: AccessType) -> bool {
        self.granted.contains(&access_type)
    }

    /// Fails with [`AppError::Forbidden`] when the access type is not granted.
    pub fn require(&self, access_type: AccessType) -> Result<(), AppError> {
        if self.allows(access_type) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "'{}' access is not granted on form '{}'",
            access_type.as_str(),
            self.form_name
        )))
    }

    /// Returns the form this map was resolved for.
    #[must_use]
    pub fn form_name(&self) -> &str {
        self.form_name.as_str()
    }

    /// Returns whether no capability is granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }

    /// Iterates granted access types in declaration order.
    pub fn granted(&self) -> impl Iterator<Item = AccessType> + '_ {
        self.granted.iter().copied()
    }
}
