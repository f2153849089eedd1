use std::str::FromStr;
use std::sync::Arc;

use chronopay_core::{LOGIN_PAYLOAD_KEY, LoginPayload};
use chronopay_domain::{AccessType, CapabilityMap};
use tracing::{debug, warn};

use crate::{SecretDecryptor, SessionStore};

/// Resolves the capabilities of the signed-in user on a form.
///
/// Failures never surface to the user: an unreadable or undecryptable
/// payload degrades to "nothing granted" and is logged.
#[derive(Clone)]
pub struct PermissionResolver {
    session_store: Arc<dyn SessionStore>,
    decryptor: Arc<dyn SecretDecryptor>,
}

impl PermissionResolver {
    /// Creates a resolver over the session store and decryptor.
    #[must_use]
    pub fn new(session_store: Arc<dyn SessionStore>, decryptor: Arc<dyn SecretDecryptor>) -> Self {
        Self {
            session_store,
            decryptor,
        }
    }

    /// Builds the capability map for `form_name`.
    #[must_use]
    pub fn resolve(&self, form_name: &str) -> CapabilityMap {
        let mut capabilities = CapabilityMap::denied(form_name);

        let raw_payload = match self.session_store.read(LOGIN_PAYLOAD_KEY) {
            Ok(Some(raw_payload)) => raw_payload,
            Ok(None) => {
                debug!(form_name, "no login payload stored");
                return capabilities;
            }
            Err(error) => {
                warn!(form_name, error = %error, "failed to read login payload");
                return capabilities;
            }
        };

        let payload = match LoginPayload::parse(raw_payload.as_str()) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(form_name, error = %error, "failed to parse login payload");
                return capabilities;
            }
        };

        for entry in &payload.permissions {
            let entry_form = match self.decryptor.decrypt_text(entry.form_name.as_str()) {
                Ok(entry_form) => entry_form,
                Err(error) => {
                    warn!(error = %error, "skipping permission entry with undecryptable form name");
                    continue;
                }
            };

            if entry_form.trim() != form_name {
                continue;
            }

            let access_type = self
                .decryptor
                .decrypt_text(entry.access_type_name.as_str())
                .and_then(|name| AccessType::from_str(name.as_str()));

            match access_type {
                Ok(access_type) => capabilities.grant(access_type),
                Err(error) => {
                    warn!(form_name, error = %error, "skipping unusable access type entry");
                }
            }
        }

        debug!(
            form_name,
            emp_code = payload.emp_code.as_deref().unwrap_or("unknown"),
            user_name = payload.user_name.as_deref().unwrap_or("unknown"),
            granted = ?capabilities.granted().collect::<Vec<_>>(),
            "resolved page capabilities"
        );
        capabilities
    }
}
