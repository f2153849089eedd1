use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Storage key under which the login payload is persisted.
pub const LOGIN_PAYLOAD_KEY: &str = "loginPayload";

/// One access-control entry as persisted after login.
///
/// Both fields are ciphertext; they are decrypted independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedPermissionEntry {
    /// Encrypted form name.
    #[serde(default)]
    pub form_name: String,
    /// Encrypted access type name.
    #[serde(default)]
    pub access_type_name: String,
}

/// Login payload stored in local persistent state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    /// Encrypted permission entries granted to the signed-in user.
    #[serde(default)]
    pub permissions: Vec<EncryptedPermissionEntry>,
    /// Signed-in employee code, when the backend includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emp_code: Option<String>,
    /// Signed-in user display name, when the backend includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

impl LoginPayload {
    /// Parses a stored JSON payload.
    pub fn parse(raw: &str) -> AppResult<Self> {
        serde_json::from_str(raw)
            .map_err(|error| AppError::Validation(format!("invalid login payload: {error}")))
    }
}
